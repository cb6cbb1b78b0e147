//! Human-readable file-size formatting.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count the way the file picker labels expect.
///
/// Zero is special-cased to `"0 Bytes"`. Otherwise the value is divided by
/// 1024 per unit step, rendered with up to two decimals, and trailing zeros
/// (and a dangling decimal point) are trimmed: `1024` → `"1 KB"`,
/// `1536` → `"1.5 KB"`. Sizes beyond the table render in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rendered = format!("{value:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_zero() {
        assert_eq!(format_file_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_file_size_bytes() {
        assert_eq!(format_file_size(1), "1 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_format_file_size_kilobytes() {
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024), "10 KB");
    }

    #[test]
    fn test_format_file_size_fractional() {
        // 1075 / 1024 = 1.0498…, rendered with two decimals
        assert_eq!(format_file_size(1075), "1.05 KB");
    }

    #[test]
    fn test_format_file_size_larger_units() {
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn test_format_file_size_clamps_to_gb() {
        // Past the unit table everything stays in GB
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }
}
