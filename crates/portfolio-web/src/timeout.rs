#![forbid(unsafe_code)]

use core::time::Duration;

/// `setTimeout` delay reaching `deadline` from `now`, rounded up to whole
/// milliseconds so the callback never fires early.
#[must_use]
pub fn delay_ms(deadline: Duration, now: Duration) -> i32 {
    let remaining = deadline.saturating_sub(now);
    let mut ms = remaining.as_millis();
    if remaining > Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX)) {
        ms += 1;
    }
    i32::try_from(ms).unwrap_or(i32::MAX)
}
