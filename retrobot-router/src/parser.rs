//! Prefix command parser.

/// A parsed command invocation borrowed from the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub name: &'a str,
    /// Everything after the first separating whitespace, with leading
    /// whitespace stripped. Not re-split; handlers decide further parsing.
    pub args: &'a str,
}

/// Splits a raw message body into a command name and its argument remainder.
///
/// Returns `None` when `content` does not start with `prefix`, or when the
/// prefix is followed by nothing but whitespace; neither is an error, the
/// router just ignores the message. Parsing itself never fails; an
/// unresolvable name surfaces later as `CommandNotFound`.
pub fn parse<'a>(prefix: &str, content: &'a str) -> Option<Invocation<'a>> {
    let body = content.strip_prefix(prefix)?;
    let body = body.trim_start();
    let (name, args) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (body, ""),
    };
    if name.is_empty() {
        return None;
    }
    Some(Invocation { name, args })
}
