// src/ui/utils.rs
// Common UI utilities and formatting functions

use crate::units::{convert, Unit};

/// Format a byte quantity in the selected unit, e.g. `1.50 MB`.
pub fn format_in_unit(bytes: f64, unit: Unit) -> String {
    format!("{:.2} {}", convert(bytes, unit.index()), unit.label())
}

/// Format a run duration as `Nd HH:MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    let days = secs / 86_400;
    let rem = secs % 86_400;
    format!(
        "{}d {:02}:{:02}:{:02}",
        days,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_in_unit() {
        assert_eq!(format_in_unit(1_572_864.0, Unit::Megabytes), "1.50 MB");
        assert_eq!(format_in_unit(1024.0, Unit::Kilobits), "8.00 Kbit");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0d 00:00:00");
        assert_eq!(format_elapsed(3_723), "0d 01:02:03");
        assert_eq!(format_elapsed(90_061), "1d 01:01:01");
    }
}
