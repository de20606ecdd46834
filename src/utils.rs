//! Utility functions for accident-rs.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::OnceLock;

/// Global set of warned messages (for warn_once).
static WARNED_MESSAGES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Emit a `tracing` warning only once per distinct message.
///
/// Evaluation runs repeatedly during training; a data problem is reported the
/// first time and then stays quiet. Returns whether the warning was emitted.
pub fn warn_once(message: &str) -> bool {
    let warned = WARNED_MESSAGES.get_or_init(|| Mutex::new(HashSet::new()));
    let mut guard = warned.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if guard.contains(message) {
        return false;
    }

    tracing::warn!("{}", message);
    guard.insert(message.to_string());
    true
}
