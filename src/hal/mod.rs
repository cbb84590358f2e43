//! Hardware Abstraction Layer for RustSinePwm.
//!
//! Workers only see `embedded-hal` traits (`OutputPin`, `DelayNs`).
//! On ESP-IDF those are `PinDriver` and `FreeRtos`; on the host the
//! simulated types below stand in for them.

pub mod clock;

#[cfg(any(test, feature = "std"))]
pub mod sim;

pub use clock::now_us;
