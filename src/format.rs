//! Display strings for prices, volumes and percent changes.

use itertools::Itertools;

/// Formats a USD price, keeping significant digits for sub-cent prices.
///
/// - `None` is `N/A`
/// - from one cent up: four decimals with thousands separators
/// - from 0.0001 up: six decimals
/// - below that: ten decimals with trailing zeros stripped, keeping at least
///   one fractional digit
pub fn format_price(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return "N/A".to_owned(),
    };
    if value >= 0.01 {
        format!("${}", group_thousands(&format!("{:.4}", value)))
    } else if value >= 0.0001 {
        format!("${:.6}", value)
    } else {
        let mut digits = format!("{:.10}", value);
        let trimmed = digits.trim_end_matches('0').len();
        digits.truncate(trimmed);
        if digits.ends_with('.') {
            digits.push('0');
        }
        format!("${}", digits)
    }
}

/// Whole dollars with thousands separators, e.g. `$1,234,567`.
pub fn format_volume(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_owned();
    }
    format!("${}", group_thousands(&format!("{:.0}", value)))
}

pub fn format_change(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Inserts `,` between every three digits of the integer part of `number`.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, fraction) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };
    let digits: Vec<char> = int_part.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(",");
    format!("{}{}{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_cent_format(s: &str) -> bool {
        let body = match s.strip_prefix('$') {
            Some(body) => body,
            None => return false,
        };
        let (int_part, fraction) = match body.split_once('.') {
            Some(parts) => parts,
            None => return false,
        };
        !int_part.is_empty()
            && int_part.chars().all(|c| c.is_ascii_digit() || c == ',')
            && fraction.len() == 4
            && fraction.chars().all(|c| c.is_ascii_digit())
    }

    #[test]
    fn cent_and_above_use_four_decimals() {
        assert_eq!(format_price(Some(0.01)), "$0.0100");
        assert_eq!(format_price(Some(1.5)), "$1.5000");
        assert_eq!(format_price(Some(999.99999)), "$1,000.0000");
        assert_eq!(format_price(Some(64_123.456789)), "$64,123.4568");
        assert_eq!(format_price(Some(1_234_567.0)), "$1,234,567.0000");
        for p in [0.01, 0.5, 12.0, 123.45, 1_000.0, 98_765.4321, 1e12].iter() {
            let s = format_price(Some(*p));
            assert!(is_cent_format(&s), "{}", s);
        }
    }

    #[test]
    fn sub_cent_uses_six_decimals() {
        assert_eq!(format_price(Some(0.0001)), "$0.000100");
        assert_eq!(format_price(Some(0.00123456789)), "$0.001235");
        assert_eq!(format_price(Some(0.0099)), "$0.009900");
    }

    #[test]
    fn dust_strips_trailing_zeros() {
        assert_eq!(format_price(Some(0.00001234)), "$0.00001234");
        assert_eq!(format_price(Some(0.000000001)), "$0.000000001");
        assert_eq!(format_price(Some(0.0000000001)), "$0.0000000001");
        assert_eq!(format_price(Some(0.0)), "$0.0");
        assert_eq!(format_price(Some(0.00000000001)), "$0.0");
        let s = format_price(Some(0.000000001));
        assert!(s.chars().any(|c| ('1'..='9').contains(&c)));
        assert!(!s.ends_with('.'));
    }

    #[test]
    fn missing_price_is_not_available() {
        assert_eq!(format_price(None), "N/A");
        assert_eq!(format_price(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn volume_and_change() {
        assert_eq!(format_volume(0.0), "$0");
        assert_eq!(format_volume(999.4), "$999");
        assert_eq!(format_volume(1_234_567_890.6), "$1,234,567,891");
        assert_eq!(format_change(-3.14159), "-3.14%");
        assert_eq!(format_change(12.0), "12.00%");
    }

    #[test]
    fn grouping_keeps_sign_and_fraction() {
        assert_eq!(group_thousands("-1234.50"), "-1,234.50");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1000000"), "1,000,000");
    }
}
