/// Compact rendering of large figures: `15.00B`, `10.00M`, `500.00K`, `999`.
pub fn format_large_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

/// Whole dollars with thousands separators, e.g. `$2,258,226`.
pub fn format_dollars(value: f64) -> String {
    format!("${}", group_thousands(value.round() as i128))
}

pub fn format_count(value: f64) -> String {
    group_thousands(value.round() as i128)
}

fn group_thousands(n: i128) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    if n < 0 {
        result.insert(0, '-');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(15_000_000_000.0), "15.00B");
        assert_eq!(format_large_number(10_000_000.0), "10.00M");
        assert_eq!(format_large_number(500_000.0), "500.00K");
        assert_eq!(format_large_number(1_000.0), "1.00K");
        assert_eq!(format_large_number(999.0), "999");
    }

    #[test]
    fn test_format_dollars_and_counts() {
        assert_eq!(format_dollars(2_258_226.0), "$2,258,226");
        assert_eq!(format_dollars(16_666_666.67), "$16,666,667");
        assert_eq!(format_count(1_233_653.0), "1,233,653");
        assert_eq!(format_count(12.0), "12");
    }
}
