//! Human readable byte sizes
//!
//! Binary (1024-based) units. A size is shown in a unit only when it is
//! strictly greater than that unit, so exactly 1024 bytes is still `1024B`.

const KB: u64 = 1 << 10;
const MB: u64 = KB << 10;
const GB: u64 = MB << 10;
const TB: u64 = GB << 10;
const PB: u64 = TB << 10;

/// Unit thresholds, largest first
const UNITS: [(u64, &str); 5] = [(PB, "PB"), (TB, "TB"), (GB, "GB"), (MB, "MB"), (KB, "KB")];

/// Format a byte count for the directory index
///
/// # Examples
/// ```
/// use filewalker::walker::size::human_size;
/// assert_eq!(human_size(1024), "1024B");
/// assert_eq!(human_size(1025), "1.001KB");
/// assert_eq!(human_size(3 * 1024 * 1024), "3.000MB");
/// ```
pub fn human_size(size: u64) -> String {
    for (threshold, suffix) in UNITS {
        if size > threshold {
            #[allow(clippy::cast_precision_loss)]
            let scaled = size as f64 / threshold as f64;
            return format!("{scaled:.3}{suffix}");
        }
    }
    format!("{size}B")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_bytes() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(1), "1B");
        assert_eq!(human_size(1023), "1023B");
    }

    #[test]
    fn test_boundary_is_strictly_greater() {
        assert_eq!(human_size(KB), "1024B");
        assert_eq!(human_size(KB + 1), "1.001KB");
        assert_eq!(human_size(MB), "1024.000KB");
        assert_eq!(human_size(MB + 1), "1.000MB");
        assert_eq!(human_size(GB), "1024.000MB");
        assert_eq!(human_size(TB), "1024.000GB");
        assert_eq!(human_size(PB), "1024.000TB");
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(human_size(2048), "2.000KB");
        assert_eq!(human_size(1536), "1.500KB");
        assert_eq!(human_size(5 * GB / 2), "2.500GB");
        assert_eq!(human_size(3 * TB), "3.000TB");
        assert_eq!(human_size(2 * PB), "2.000PB");
    }

    #[test]
    fn test_u64_max_does_not_overflow() {
        assert!(human_size(u64::MAX).ends_with("PB"));
    }

    #[test]
    fn test_unit_never_decreases_as_size_grows() {
        fn rank(formatted: &str) -> usize {
            ["PB", "TB", "GB", "MB", "KB"]
                .iter()
                .position(|s| formatted.ends_with(s))
                .map_or(0, |i| 5 - i)
        }

        let mut last = 0;
        let mut size = 1u64;
        while size < u64::MAX / 3 {
            let current = rank(&human_size(size));
            assert!(current >= last, "unit went down at {size}");
            last = current;
            size = size * 3 + 1;
        }
    }
}
