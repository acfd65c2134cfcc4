//! Unit conversion utilities.
//!
//! DrawingML positions everything in EMUs, 914 400 per inch.
//! Layout maths is done in `f64` inches or EMUs and rounded once, when a shape
//! is emitted.

pub const EMUS_PER_INCH: i64 = 914_400;

/// A length in EMUs.
pub type Emu = i64;

/// Convert inches to EMUs, rounding to the nearest unit.
#[inline]
pub fn inches(value: f64) -> Emu {
    (value * EMUS_PER_INCH as f64).round() as Emu
}

/// Font sizes in DrawingML runs are hundredths of a point (`sz="2000"` is 20pt).
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * 100.0).round() as u32
}

/// Round an `f64` EMU value produced by layout arithmetic.
#[inline]
pub fn round_emu(value: f64) -> Emu {
    value.round() as Emu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches() {
        assert_eq!(inches(1.0), 914_400);
        assert_eq!(inches(0.5), 457_200);
        assert_eq!(inches(7.5), 6_858_000);
    }

    #[test]
    fn test_points() {
        assert_eq!(pt_to_centipoints(20.0), 2000);
        assert_eq!(pt_to_centipoints(10.5), 1050);
    }

    #[test]
    fn test_round_emu() {
        assert_eq!(round_emu(10.4), 10);
        assert_eq!(round_emu(10.5), 11);
    }
}
