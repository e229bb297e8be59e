//! # retrobot-clients
//!
//! Generative service clients: Gemini text, Stability image, Retro Diffusion
//! image. Plain reqwest clients with a fixed request ceiling; every failure
//! is normalized to [`ServiceError`] before it leaves this crate.

use std::time::Duration;

use retrobot_core::ServiceError;

pub mod gemini;
pub mod retro;
pub mod stability;

pub use gemini::{GeminiClient, GenerationConfig};
pub use retro::{RetroClient, RetroImage};
pub use stability::StabilityClient;

/// Default ceiling applied to every outbound request; slow services surface
/// as `ServiceError::Timeout` instead of hanging a handler indefinitely.
/// Adjustable per client via `with_timeout`.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maps a transport-level reqwest failure into the service taxonomy.
/// `timeout` is the ceiling the failing request ran under.
pub(crate) fn request_error(err: reqwest::Error, timeout: Duration) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(timeout)
    } else {
        ServiceError::Network(err.to_string())
    }
}

/// Masks an API key for request logs: first 7 and last 4 characters for long
/// keys, fully masked otherwise. Counts characters, not bytes, so keys with
/// multi-byte content never split a character.
pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        "***".to_string()
    } else {
        let head: String = chars[..7].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}***{tail}")
    }
}
