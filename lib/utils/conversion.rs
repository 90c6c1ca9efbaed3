//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const BINARY_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Renders a byte count with the largest binary unit giving a value of at
/// least 1, with fractional noise trimmed to one decimal place.
///
/// Human-facing listing modes use this; the structured output keeps raw
/// decimal byte counts instead.
///
/// ## Examples
///
/// ```
/// use corral::utils::human_bytes;
///
/// assert_eq!(human_bytes(0), "0B");
/// assert_eq!(human_bytes(512), "512B");
/// assert_eq!(human_bytes(2_147_483_648), "2GiB");
/// assert_eq!(human_bytes(11_811_160_064), "11GiB");
/// assert_eq!(human_bytes(1_610_612_736), "1.5GiB");
/// ```
pub fn human_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < BINARY_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{:.1}", value);
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);

    format!("{}{}", rendered, BINARY_UNITS[unit])
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_bytes_exact_units() {
        assert_eq!(human_bytes(1024), "1KiB");
        assert_eq!(human_bytes(1024 * 1024), "1MiB");
        assert_eq!(human_bytes(2048 * 1024 * 1024), "2GiB");
        assert_eq!(human_bytes(11 * 1024 * 1024 * 1024), "11GiB");
        assert_eq!(human_bytes(3 * 1024 * 1024 * 1024 * 1024), "3TiB");
    }

    #[test]
    fn test_human_bytes_below_one_unit_keeps_smaller_unit() {
        assert_eq!(human_bytes(1023), "1023B");
        assert_eq!(human_bytes(1536), "1.5KiB");
    }

    #[test]
    fn test_human_bytes_huge_values_stay_in_tebibytes() {
        assert_eq!(human_bytes(2048 * 1024 * 1024 * 1024 * 1024), "2048TiB");
    }
}
