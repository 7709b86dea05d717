/// Decides when a dense bitmap is worth its memory compared to a row list.
///
/// A bitmap over `max - min` rows is accepted when the expected population,
/// rounded up to a power of two, times `density` covers the span. With the
/// default density of 32 a bitmap needs roughly one row per 32 bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BitmapPolicy {
    pub density: u32,
}

impl Default for BitmapPolicy {
    fn default() -> Self {
        Self { density: 32 }
    }
}

impl BitmapPolicy {
    pub fn new(density: u32) -> Self {
        Self { density }
    }

    pub fn fits(&self, min_row: u32, max_row: u32, expected_rows: u32) -> bool {
        let span = u64::from(max_row.saturating_sub(min_row));
        capacity(expected_rows) * u64::from(self.density) >= span
    }
}

// Smallest power of two >= n, with 0 staying 0.
fn capacity(n: u32) -> u64 {
    if n == 0 {
        0
    } else {
        u64::from(n).next_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::{capacity, BitmapPolicy};

    #[test]
    fn test_capacity() {
        assert_eq!(capacity(0), 0);
        assert_eq!(capacity(1), 1);
        assert_eq!(capacity(3), 4);
        assert_eq!(capacity(64), 64);
        assert_eq!(capacity(65), 128);
        assert_eq!(capacity(u32::MAX), 1 << 32);
    }

    #[test]
    fn test_default_density() {
        let p = BitmapPolicy::default();
        // 4 rows -> capacity 4 -> 128 rows of span.
        assert!(p.fits(0, 128, 3));
        assert!(!p.fits(0, 129, 3));
        assert!(p.fits(1000, 1000, 0));
        assert!(!p.fits(0, 1, 0));
        assert!(p.fits(0, u32::MAX, u32::MAX));
    }

    #[test]
    fn test_custom_density() {
        let p = BitmapPolicy::new(1);
        assert!(p.fits(10, 18, 8));
        assert!(!p.fits(10, 19, 8));
    }
}
