//! Integer and bit helpers from the board's core library.

/// Re-map `x` from one range to another with integer math (truncating).
/// An empty input range maps everything to `out_min`. The product is
/// taken in 128 bits and the result saturates at the `i64` bounds.
pub fn map(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    if in_max == in_min {
        return out_min;
    }
    let (x, in_min, in_max) = (x as i128, in_min as i128, in_max as i128);
    let (out_min, out_max) = (out_min as i128, out_max as i128);
    let scaled = (x - in_min).saturating_mul(out_max - out_min) / (in_max - in_min);
    scaled.saturating_add(out_min).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

pub fn constrain<T: PartialOrd>(x: T, low: T, high: T) -> T {
    if x < low {
        low
    } else if x > high {
        high
    } else {
        x
    }
}

pub fn low_byte(w: u16) -> u8 {
    (w & 0xff) as u8
}

pub fn high_byte(w: u16) -> u8 {
    (w >> 8) as u8
}

pub fn make_word(high: u8, low: u8) -> u16 {
    (high as u16) << 8 | low as u16
}

pub fn bit_read(value: u32, bit: u8) -> u8 {
    ((value >> bit) & 1) as u8
}

pub fn bit_set(value: u32, bit: u8) -> u32 {
    value | (1 << bit)
}

pub fn bit_clear(value: u32, bit: u8) -> u32 {
    value & !(1 << bit)
}

pub fn bit_write(value: u32, bit: u8, bit_value: u8) -> u32 {
    if bit_value != 0 {
        bit_set(value, bit)
    } else {
        bit_clear(value, bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map() {
        assert_eq!(map(512, 0, 1023, 0, 255), 127);
        assert_eq!(map(1023, 0, 1023, 0, 255), 255);
        assert_eq!(map(0, 0, 1023, 10, 20), 10);
        // inverted output range
        assert_eq!(map(0, 0, 10, 100, 0), 100);
        assert_eq!(map(5, 3, 3, 7, 9), 7);
    }

    #[test]
    fn test_map_wide_ranges() {
        assert_eq!(map(i64::MAX / 2, 0, i64::MAX, 0, 1000), 499);
        assert_eq!(map(1000, 0, 1000, 0, i64::MAX), i64::MAX);
        assert_eq!(map(4_000_000_000, 0, 4_000_000_000, -4_000_000_000, 4_000_000_000), 4_000_000_000);
        assert_eq!(map(i64::MAX, 0, 1, 0, i64::MAX), i64::MAX);
    }

    #[test]
    fn test_constrain() {
        assert_eq!(constrain(-4, 0, 10), 0);
        assert_eq!(constrain(14, 0, 10), 10);
        assert_eq!(constrain(2.5, 0.0, 10.0), 2.5);
    }

    #[test]
    fn test_bytes_and_bits() {
        assert_eq!(low_byte(0xbeef), 0xef);
        assert_eq!(high_byte(0xbeef), 0xbe);
        assert_eq!(make_word(0xbe, 0xef), 0xbeef);
        assert_eq!(bit_read(0b100, 2), 1);
        assert_eq!(bit_set(0, 3), 8);
        assert_eq!(bit_clear(0xff, 0), 0xfe);
        assert_eq!(bit_write(0, 1, 1), 2);
        assert_eq!(bit_write(2, 1, 0), 0);
    }
}
