use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Prefix of every store-assigned id.
pub const TASK_ID_PREFIX: &str = "task-";

const TASK_ID_HEX_LEN: usize = 12;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh task id: `task-` plus 12 hex characters.
///
/// The hash input mixes the task name, the current time, the process id and
/// a process-local counter, so two calls never repeat within a process.
/// Stores still check for collisions before using an id.
#[must_use]
pub fn generate_task_id(name: &str) -> String {
    let now = Utc::now();
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&now.timestamp().to_le_bytes());
    hasher.update(&now.timestamp_subsec_nanos().to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.update(&ID_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());

    let hash = hasher.finalize().to_hex();
    format!("{TASK_ID_PREFIX}{}", &hash.as_str()[..TASK_ID_HEX_LEN])
}
