//! Utility functions for formatting and file operations.
//!
//! Duration and byte formatting used by the per-file and end-of-run reports,
//! plus the size-ratio arithmetic shared by the accept policy and the summary.

use std::path::Path;

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with binary units (B, KiB, MiB, ... ZiB, falling back to YiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2} YiB")
}

/// Output size divided by input size. An empty input yields infinity so it never counts as smaller.
#[must_use]
pub fn compression_ratio(input_size: u64, output_size: u64) -> f64 {
    if input_size == 0 {
        f64::INFINITY
    } else {
        output_size as f64 / input_size as f64
    }
}

/// Formats a ratio as a percentage with two decimals (0.5 -> "50.00%").
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.2}%", ratio * 100.0)
    } else {
        "n/a".to_string()
    }
}

/// Safely extracts filename from a path with consistent error handling.
/// Returns the filename as a String, or an error if the path has no filename component.
pub fn get_filename_safe(path: &Path) -> crate::CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            crate::CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.0), "00:00:59");
        assert_eq!(format_duration(60.0), "00:01:00");
        assert_eq!(format_duration(3599.0), "00:59:59");
        assert_eq!(format_duration(3600.0), "01:00:00");
        assert_eq!(format_duration(3661.0), "01:01:01");
        assert_eq!(format_duration(90061.0), "25:01:01");

        // Fractional seconds truncate
        assert_eq!(format_duration(59.9), "00:00:59");

        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::INFINITY), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MiB");
        assert_eq!(format_bytes(6_000_000), "5.72 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024 * 2), "2.00 GiB");
        assert_eq!(format_bytes(1024_u64.pow(4)), "1.00 TiB");
        assert_eq!(format_bytes(1024_u64.pow(5) * 3), "3.00 PiB");
        assert_eq!(format_bytes(1024_u64.pow(6)), "1.00 EiB");
        assert_eq!(format_bytes(u64::MAX), "16.00 EiB");
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(10_000_000, 6_000_000), 0.6);
        assert_eq!(compression_ratio(2_000_000, 2_500_000), 1.25);
        assert_eq!(compression_ratio(100, 100), 1.0);
        assert!(compression_ratio(0, 0).is_infinite());
        assert!(compression_ratio(0, 10).is_infinite());
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.5), "50.00%");
        assert_eq!(format_percent(2.0 / 3.0), "66.67%");
        assert_eq!(format_percent(1.25), "125.00%");
        assert_eq!(format_percent(f64::INFINITY), "n/a");
    }

    #[test]
    fn test_get_filename_safe() {
        assert_eq!(get_filename_safe(Path::new("/path/to/file.mp4")).unwrap(), "file.mp4");
        assert_eq!(get_filename_safe(Path::new("file.wmv")).unwrap(), "file.wmv");
        assert!(get_filename_safe(Path::new("/")).is_err());
        assert!(get_filename_safe(Path::new("")).is_err());
    }
}
