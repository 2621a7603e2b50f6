//! Number and expression formatting.
//!
//! Two policies live here. Display formatting is what the calculator
//! shows after a result arrives; operand formatting is what the history
//! ledger uses inside expression strings. Both are pure.

use super::operator::Operator;
use chrono::{DateTime, Utc};

/// Results smaller than this (and nonzero) switch to exponential notation.
const EXPONENTIAL_THRESHOLD: f64 = 1e-6;

/// Magnitudes at or above this print in exponential notation everywhere.
const LARGE_EXPONENTIAL_THRESHOLD: f64 = 1e21;

/// Plain renderings longer than this are rounded to `DISPLAY_SIGNIFICANT_DIGITS`.
const MAX_PLAIN_DISPLAY_LEN: usize = 12;

const DISPLAY_SIGNIFICANT_DIGITS: usize = 10;

/// Fractional digits kept for non-integral operands in expressions.
const OPERAND_FRACTION_DIGITS: usize = 6;

/// Format a result for the calculator display.
///
/// # Example
///
/// ```rust
/// use keycalc::core::format_display;
///
/// assert_eq!(format_display(8.0), "8");
/// assert_eq!(format_display(1.0 / 3.0), "0.3333333333");
/// assert_eq!(format_display(0.000000123), "1.230000e-7");
/// assert_eq!(format_display(2f64.powi(100)), "1.2676506e30");
/// ```
pub fn format_display(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    if value != 0.0 && value.abs() < EXPONENTIAL_THRESHOLD {
        return format!("{value:.6e}");
    }

    if value.abs() >= LARGE_EXPONENTIAL_THRESHOLD {
        return trimmed_exponential(value, DISPLAY_SIGNIFICANT_DIGITS);
    }

    let plain = value.to_string();
    if plain.chars().count() > MAX_PLAIN_DISPLAY_LEN {
        round_significant(value, DISPLAY_SIGNIFICANT_DIGITS).to_string()
    } else {
        plain
    }
}

/// Format an operand or result inside a history expression.
///
/// Integral values print without a decimal point. Everything else is
/// rounded to six fractional digits with trailing zeros trimmed. Huge
/// magnitudes use the shortest exponential form that reparses exactly.
pub fn format_operand(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    if value.abs() >= LARGE_EXPONENTIAL_THRESHOLD {
        return format!("{value:e}");
    }

    if value.fract() == 0.0 {
        return normalize_zero(value).to_string();
    }

    let rounded: f64 = format!("{value:.prec$}", prec = OPERAND_FRACTION_DIGITS)
        .parse()
        .unwrap_or(value);
    normalize_zero(rounded).to_string()
}

/// Build the human-readable expression for a completed operation.
///
/// # Example
///
/// ```rust
/// use keycalc::core::{format_expression, Operator};
///
/// assert_eq!(format_expression(Operator::Add, 5.0, Some(3.0), 8.0), "5 + 3 = 8");
/// assert_eq!(format_expression(Operator::Sqrt, 9.0, None, 3.0), "√9 = 3");
/// ```
pub fn format_expression(
    operator: Operator,
    operand1: f64,
    operand2: Option<f64>,
    result: f64,
) -> String {
    let lhs = format_operand(operand1);
    let result = format_operand(result);

    match (operator, operand2) {
        (Operator::Sqrt, _) => format!("√{lhs} = {result}"),
        (op, Some(rhs)) => format!("{lhs} {} {} = {result}", op.symbol(), format_operand(rhs)),
        (_, None) => format!("{lhs} = {result}"),
    }
}

/// Short relative age of a history entry, as shown next to it.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if hours < 24 {
        format!("{hours} h ago")
    } else if days < 7 {
        format!("{days} d ago")
    } else {
        timestamp.format("%d.%m %H:%M").to_string()
    }
}

/// Parse display text into an operand. Unparseable text counts as zero.
pub fn parse_display(text: &str) -> f64 {
    text.parse().unwrap_or(0.0)
}

fn round_significant(value: f64, digits: usize) -> f64 {
    format!("{value:.prec$e}", prec = digits.saturating_sub(1))
        .parse()
        .unwrap_or(value)
}

/// Exponential notation with at most `digits` significant digits and no
/// trailing mantissa zeros, e.g. `1.2676506e30`.
fn trimmed_exponential(value: f64, digits: usize) -> String {
    let formatted = format!("{value:.prec$e}", prec = digits.saturating_sub(1));
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{mantissa}e{exponent}")
        }
        _ => formatted,
    }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_sign_negative() {
        "-Infinity".to_string()
    } else {
        "Infinity".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn display_keeps_short_values_plain() {
        assert_eq!(format_display(0.0), "0");
        assert_eq!(format_display(42.5), "42.5");
        assert_eq!(format_display(-7.0), "-7");
    }

    #[test]
    fn display_rounds_long_values_to_ten_significant_digits() {
        assert_eq!(format_display(0.1 + 0.2), "0.3");
        assert_eq!(format_display(2.0_f64.sqrt()), "1.414213562");
        assert_eq!(format_display(123456789.123456), "123456789.1");
    }

    #[test]
    fn display_uses_exponential_for_tiny_values() {
        assert_eq!(format_display(1e-7), "1.000000e-7");
        assert_eq!(format_display(-2.5e-9), "-2.500000e-9");
    }

    #[test]
    fn display_uses_exponential_for_huge_values() {
        assert_eq!(format_display(2f64.powi(100)), "1.2676506e30");
        assert_eq!(format_display(1e300), "1e300");
        assert_eq!(format_display(-4.5e21), "-4.5e21");
        assert_eq!(format_display(1e21), "1e21");
        assert_eq!(format_display(1e20), "100000000000000000000");
    }

    #[test]
    fn display_names_non_finite_values() {
        assert_eq!(format_display(f64::INFINITY), "Infinity");
        assert_eq!(format_display(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_display(f64::NAN), "NaN");
    }

    #[test]
    fn operand_drops_decimal_point_for_integers() {
        assert_eq!(format_operand(8.0), "8");
        assert_eq!(format_operand(-12.0), "-12");
        assert_eq!(format_operand(-0.0), "0");
    }

    #[test]
    fn operand_uses_exponential_for_huge_values() {
        assert_eq!(format_operand(1e300), "1e300");
        assert_eq!(format_operand(-1e21), "-1e21");
        assert_eq!(format_operand(2f64.powi(100)), "1.2676506002282294e30");
    }

    #[test]
    fn operand_rounds_to_six_fraction_digits() {
        assert_eq!(format_operand(1.0 / 3.0), "0.333333");
        assert_eq!(format_operand(2.5), "2.5");
        assert_eq!(format_operand(0.1 + 0.2), "0.3");
        assert_eq!(format_operand(-0.0000001), "0");
    }

    #[test]
    fn expression_uses_operator_symbols() {
        assert_eq!(
            format_expression(Operator::Subtract, 10.0, Some(4.0), 6.0),
            "10 − 4 = 6"
        );
        assert_eq!(
            format_expression(Operator::Multiply, 2.5, Some(4.0), 10.0),
            "2.5 × 4 = 10"
        );
        assert_eq!(
            format_expression(Operator::Divide, 1.0, Some(3.0), 1.0 / 3.0),
            "1 ÷ 3 = 0.333333"
        );
        assert_eq!(
            format_expression(Operator::Power, 2.0, Some(10.0), 1024.0),
            "2 ^ 10 = 1024"
        );
        assert_eq!(
            format_expression(Operator::Power, 10.0, Some(300.0), 1e300),
            "10 ^ 300 = 1e300"
        );
    }

    #[test]
    fn expression_ignores_second_operand_for_sqrt() {
        let expression = format_expression(Operator::Sqrt, 2.0, Some(0.0), 2.0_f64.sqrt());
        assert_eq!(expression, "√2 = 1.414214");
    }

    #[test]
    fn binary_expression_without_rhs_falls_back() {
        assert_eq!(format_expression(Operator::Add, 5.0, None, 5.0), "5 = 5");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();

        assert_eq!(relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 min ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2 d ago");
        assert_eq!(relative_time(now - Duration::days(10), now), "10.03 12:00");
    }

    #[test]
    fn parse_display_treats_garbage_as_zero() {
        assert_eq!(parse_display("12.5"), 12.5);
        assert_eq!(parse_display("7."), 7.0);
        assert_eq!(parse_display("-"), 0.0);
        assert_eq!(parse_display(""), 0.0);
    }
}
