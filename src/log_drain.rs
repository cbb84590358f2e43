//! Console log drain.
//!
//! Empties [`RT_LOG_STREAM`] and [`BG_LOG_STREAM`] into a text sink.
//! On ESP-IDF the sink is stdout (UART0 console).
//!
//! ```text
//! RT_LOG_STREAM ──┐
//!                 ├──▶ drain ──▶ [timestamp_us] LEVEL: message
//! BG_LOG_STREAM ──┘
//! ```

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::hal::now_us;
use crate::log_globals::{BG_LOG_STREAM, RT_LOG_STREAM};
use crate::logging::{LogEntry, LogStream};
use crate::signal::StopSignal;
use crate::worker::WorkerExit;

/// Interval between dropped-message reports (µs).
pub const DROP_REPORT_INTERVAL_US: i64 = 10_000_000;

/// Idle wait when both streams are empty (ms).
pub const IDLE_WAIT_MS: u32 = 10;

/// Write one entry as `[timestamp_us] LEVEL: message\n`.
pub fn write_entry<W: Write>(out: &mut W, entry: &LogEntry) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    )
}

/// Drains the two global streams.
pub struct LogDrain<'s> {
    rt: &'s LogStream,
    bg: &'s LogStream,
    last_drop_report_us: i64,
}

impl LogDrain<'static> {
    /// Drain for the global streams.
    pub fn global() -> Self {
        Self::new(&RT_LOG_STREAM, &BG_LOG_STREAM)
    }
}

impl<'s> LogDrain<'s> {
    pub fn new(rt: &'s LogStream, bg: &'s LogStream) -> Self {
        Self {
            rt,
            bg,
            last_drop_report_us: 0,
        }
    }

    /// Write everything pending, RT stream first. Returns entries drained.
    ///
    /// Sink write errors are ignored; the entry is consumed either way.
    pub fn drain_once<W: Write>(&mut self, out: &mut W) -> usize {
        let mut written = 0;

        while let Some(entry) = self.rt.drain() {
            let _ = write_entry(out, &entry);
            written += 1;
        }

        while let Some(entry) = self.bg.drain() {
            let _ = write_entry(out, &entry);
            written += 1;
        }

        written
    }

    /// Report and reset drop counters if the report interval elapsed.
    pub fn report_drops<W: Write>(&mut self, out: &mut W, now_us: i64) {
        if now_us - self.last_drop_report_us < DROP_REPORT_INTERVAL_US {
            return;
        }
        self.last_drop_report_us = now_us;

        let rt_dropped = self.rt.dropped();
        let bg_dropped = self.bg.dropped();
        if rt_dropped > 0 || bg_dropped > 0 {
            let _ = writeln!(out, "[WARN] Dropped: RT={}, BG={}", rt_dropped, bg_dropped);
            self.rt.reset_dropped();
            self.bg.reset_dropped();
        }
    }

    /// Drain until `stop` is raised, then flush what is left.
    pub fn run<W: Write, D: DelayNs>(&mut self, out: &mut W, delay: &mut D, stop: &StopSignal) -> WorkerExit {
        while !stop.is_raised() {
            let written = self.drain_once(out);
            self.report_drops(out, now_us());

            if written == 0 {
                delay.delay_ms(IDLE_WAIT_MS);
            }
        }

        self.drain_once(out);
        WorkerExit::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn test_write_entry_format() {
        let mut entry = LogEntry {
            timestamp_us: 1234567,
            level: LogLevel::Info,
            ..LogEntry::default()
        };
        entry.msg[..8].copy_from_slice(b"Idx: 512");
        entry.len = 8;

        let mut out = String::new();
        write_entry(&mut out, &entry).unwrap();
        assert_eq!(out, "[   1234567] INFO: Idx: 512\n");
    }

    #[test]
    fn test_drain_order_rt_first() {
        let rt: LogStream = LogStream::new();
        let bg: LogStream = LogStream::new();
        bg.push(1, LogLevel::Info, b"monitor");
        rt.push(2, LogLevel::Error, b"generator");

        let mut drain = LogDrain::new(&rt, &bg);
        let mut out = String::new();
        assert_eq!(drain.drain_once(&mut out), 2);

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("ERROR: generator"));
        assert!(lines[1].ends_with("INFO: monitor"));
    }

    #[test]
    fn test_drop_report() {
        let rt: LogStream = LogStream::new();
        let bg: LogStream = LogStream::new();
        for i in 0..(crate::logging::LOG_BUFFER_SIZE as i64 + 3) {
            rt.push(i, LogLevel::Info, b"x");
        }

        let mut drain = LogDrain::new(&rt, &bg);
        let mut out = String::new();

        // Too early: nothing reported yet
        drain.report_drops(&mut out, 1);
        assert!(out.is_empty());

        drain.report_drops(&mut out, DROP_REPORT_INTERVAL_US);
        assert_eq!(out, "[WARN] Dropped: RT=3, BG=0\n");
        assert_eq!(rt.dropped(), 0);
    }

    #[test]
    fn test_run_flushes_after_stop() {
        struct NoDelay;
        impl DelayNs for NoDelay {
            fn delay_ns(&mut self, _ns: u32) {}
        }

        let rt: LogStream = LogStream::new();
        let bg: LogStream = LogStream::new();
        let stop = StopSignal::new();
        stop.raise();
        bg.push(5, LogLevel::Warn, b"late line");

        let mut out = String::new();
        let exit = LogDrain::new(&rt, &bg).run(&mut out, &mut NoDelay, &stop);
        assert_eq!(exit, WorkerExit::Stopped);
        assert!(out.ends_with("WARN: late line\n"));
    }
}
