use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as unix epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Milliseconds elapsed between two epoch timestamps, saturating at zero.
pub fn elapsed_ms(earlier_ms: u64, now_ms: u64) -> u64 {
    now_ms.saturating_sub(earlier_ms)
}
