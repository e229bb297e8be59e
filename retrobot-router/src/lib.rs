//! # retrobot-router
//!
//! The dispatch core: command registry, prefix parser, handler executor,
//! response tracker, and the event router that ties them together.
//!
//! The router consumes platform events through two entry points
//! ([`EventRouter::handle_created`] and [`EventRouter::handle_edited`]) and
//! drives parse → resolve → execute per event, spawning one task per command
//! so a handler suspended on external I/O never blocks the next event.

pub mod error;
pub mod executor;
pub mod parser;
pub mod registry;
pub mod router;
pub mod tracker;

pub use error::DispatchError;
pub use parser::{parse, Invocation};
pub use registry::{CommandRegistry, CommandSpec, PermissionCheck, RegistryError};
pub use router::EventRouter;
pub use tracker::{ResponseTracker, TrackedReply};
