//! Microsecond timestamps for log entries.

/// Microseconds since boot (ESP-IDF high resolution timer).
#[cfg(target_os = "espidf")]
#[inline]
pub fn now_us() -> i64 {
    // SAFETY: esp_timer_get_time is always safe to call after boot
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

/// Microseconds since the first call in this process.
#[cfg(all(not(target_os = "espidf"), any(test, feature = "std")))]
pub fn now_us() -> i64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_micros() as i64
}

/// No time source without std on a foreign target.
#[cfg(all(not(target_os = "espidf"), not(any(test, feature = "std"))))]
#[inline]
pub fn now_us() -> i64 {
    0
}
