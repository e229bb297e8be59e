//! Command registry: name/alias lookup and help listing.

use std::collections::HashMap;
use std::sync::Arc;

use retrobot_core::{CommandContext, CommandHandler};
use thiserror::Error;

/// Permission predicate applied before a handler runs.
pub type PermissionCheck = fn(&CommandContext) -> bool;

/// Immutable descriptor for one registered command.
/// Created at startup registration time; lives for the process lifetime.
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub help: &'static str,
    /// Shown in help output, e.g. `ask <question>`.
    pub usage: &'static str,
    /// Logical module that registered the command; groups the help listing.
    pub category: &'static str,
    /// When true, an empty argument remainder yields `MissingArgument`
    /// without invoking the handler.
    pub requires_args: bool,
    pub permission: Option<PermissionCheck>,
    pub handler: Arc<dyn CommandHandler>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate command or alias: {0}")]
    Duplicate(String),
}

/// Maps command names and aliases to their descriptors.
/// Built once at startup, immutable afterwards; lookups are case-sensitive.
#[derive(Default)]
pub struct CommandRegistry {
    lookup: HashMap<&'static str, Arc<CommandSpec>>,
    ordered: Vec<Arc<CommandSpec>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its name and every alias. Names and aliases
    /// share one namespace; any collision rejects the whole registration.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), RegistryError> {
        let spec = Arc::new(spec);
        for token in std::iter::once(spec.name).chain(spec.aliases.iter().copied()) {
            if self.lookup.contains_key(token) {
                return Err(RegistryError::Duplicate(token.to_string()));
            }
        }
        for token in std::iter::once(spec.name).chain(spec.aliases.iter().copied()) {
            self.lookup.insert(token, Arc::clone(&spec));
        }
        self.ordered.push(spec);
        Ok(())
    }

    /// Case-sensitive lookup over names and aliases.
    pub fn resolve(&self, token: &str) -> Option<Arc<CommandSpec>> {
        self.lookup.get(token).cloned()
    }

    /// Commands in registration order, each spec once regardless of aliases.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandSpec>> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Commands grouped by category, categories in first-registration order.
    pub fn by_category(&self) -> Vec<(&'static str, Vec<Arc<CommandSpec>>)> {
        let mut groups: Vec<(&'static str, Vec<Arc<CommandSpec>>)> = Vec::new();
        for spec in &self.ordered {
            match groups.iter_mut().find(|(name, _)| *name == spec.category) {
                Some((_, specs)) => specs.push(Arc::clone(spec)),
                None => groups.push((spec.category, vec![Arc::clone(spec)])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use retrobot_core::HandlerError;

    struct NoopHandler;

    #[async_trait]
    impl CommandHandler for NoopHandler {
        async fn run(&self, _ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
            Ok(None)
        }
    }

    fn spec(
        name: &'static str,
        aliases: &'static [&'static str],
        category: &'static str,
    ) -> CommandSpec {
        CommandSpec {
            name,
            aliases,
            help: "",
            usage: name,
            category,
            requires_args: false,
            permission: None,
            handler: Arc::new(NoopHandler),
        }
    }

    #[test]
    fn resolves_name_and_every_alias() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("hello", &["hi", "hey"], "Fun")).unwrap();

        for token in ["hello", "hi", "hey"] {
            let resolved = registry.resolve(token).expect(token);
            assert_eq!(resolved.name, "hello");
        }
        assert!(registry.resolve("Hello").is_none());
        assert!(registry.resolve("greet").is_none());
    }

    #[test]
    fn rejects_duplicate_name() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("flip", &[], "Fun")).unwrap();
        let err = registry.register(spec("flip", &[], "Fun")).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("flip".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_alias_colliding_with_existing_name() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("hello", &[], "Fun")).unwrap();
        let err = registry
            .register(spec("greet", &["hello"], "Fun"))
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("hello".to_string()));
        // The failed registration must not leave partial lookup entries behind.
        assert!(registry.resolve("greet").is_none());
    }

    #[test]
    fn groups_by_category_in_registration_order() {
        let mut registry = CommandRegistry::new();
        registry.register(spec("hello", &[], "Fun")).unwrap();
        registry.register(spec("ping", &[], "Utility")).unwrap();
        registry.register(spec("flip", &[], "Fun")).unwrap();

        let groups = registry.by_category();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Fun");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Utility");
    }
}
