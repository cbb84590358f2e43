//! Sine lookup table for duty-cycle modulation
//!
//! 2048-entry table covering one full period.
//! Values are i16, full signed range.

/// Index width of the table (2^11 entries)
pub const TABLE_BITS: u32 = 11;

/// Number of entries in the sine table
pub const TABLE_SIZE: usize = 1 << TABLE_BITS;

/// Mask that folds any value into a valid table index
pub const INDEX_MASK: u32 = (TABLE_SIZE as u32) - 1;

/// Pre-computed sine table
///
/// 2048 samples covering 0 to 2π
/// Amplitude: -32767 to +32767
/// Index 0 = 0°, 512 = 90°, 1024 = 180°, 1536 = 270°
pub static SINE_TABLE: [i16; TABLE_SIZE] = {
    let mut table = [0i16; TABLE_SIZE];
    let mut i = 0;
    while i < TABLE_SIZE {
        let angle = (i as f64) * core::f64::consts::PI * 2.0 / (TABLE_SIZE as f64);
        let scaled = const_sin(angle) * 32767.0;
        // Round half away from zero, `as` truncates toward zero
        table[i] = if scaled >= 0.0 {
            (scaled + 0.5) as i16
        } else {
            (scaled - 0.5) as i16
        };
        i += 1;
    }
    table
};

/// Read one sample.
///
/// Out-of-range indices are folded back with [`INDEX_MASK`], so this never panics.
#[inline]
pub fn sample(index: u32) -> i16 {
    SINE_TABLE[(index & INDEX_MASK) as usize]
}

/// Const-compatible sine approximation using Taylor series
///
/// The argument is folded into [-π/2, π/2] first, where the 9th-order
/// series stays well under one LSB of error at i16 scale.
const fn const_sin(x: f64) -> f64 {
    const PI: f64 = core::f64::consts::PI;

    // Normalize to [-π, π]
    let mut x = x;
    while x > PI {
        x -= 2.0 * PI;
    }
    while x < -PI {
        x += 2.0 * PI;
    }

    // sin(π - x) = sin(x)
    if x > PI / 2.0 {
        x = PI - x;
    } else if x < -PI / 2.0 {
        x = -PI - x;
    }

    let x2 = x * x;
    let x3 = x2 * x;
    let x5 = x3 * x2;
    let x7 = x5 * x2;
    let x9 = x7 * x2;

    x - x3 / 6.0 + x5 / 120.0 - x7 / 5040.0 + x9 / 362880.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_points() {
        assert_eq!(SINE_TABLE[0], 0);
        assert_eq!(SINE_TABLE[512], 32767);
        assert_eq!(SINE_TABLE[1024], 0);
        assert_eq!(SINE_TABLE[1536], -32767);
    }

    #[test]
    fn test_sample_masks_index() {
        assert_eq!(sample(2048), SINE_TABLE[0]);
        assert_eq!(sample(2048 + 512), SINE_TABLE[512]);
        assert_eq!(sample(u32::MAX), SINE_TABLE[2047]);
    }
}
