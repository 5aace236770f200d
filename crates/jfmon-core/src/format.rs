//! Display formatting for status values.
//!
//! Timings are reported by the instrument in seconds and rendered with a
//! unit-scaling rule; pedestal means are rendered with a fixed number of
//! significant digits. Significant-digit rendering matches the browser's
//! `Number.prototype.toPrecision`, so operators see the same strings the
//! instrument's own web UI has always shown.

use serde_json::Value;

/// Placeholder for a field absent from the status payload.
pub const MISSING_VALUE: &str = "n/a";

/// Values below this (in seconds) are rendered in microseconds.
const MICROSECOND_THRESHOLD_S: f64 = 0.001;

const TIME_SIG_DIGITS: usize = 3;
const PEDESTAL_SIG_DIGITS: usize = 5;

/// Enough fractional digits in `{:e}` to print any f64 exactly.
const EXACT_DIGITS: usize = 766;

/// Render `value` with `precision` significant digits.
///
/// Rounding is decided on the exact binary value, with ties going away
/// from zero (`2.5` at one digit is `"3"`). Fixed notation is used when
/// the decimal exponent lies in `[-6, precision)`, exponential notation
/// (`1.23e+5`) otherwise.
pub fn to_precision(value: f64, precision: usize) -> String {
    let precision = precision.clamp(1, 100);

    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return if precision == 1 {
            "0".to_string()
        } else {
            format!("0.{}", "0".repeat(precision - 1))
        };
    }

    let (digits, exponent) = round_significant(value.abs(), precision);
    let sign = if value < 0.0 { "-" } else { "" };

    if exponent < -6 || exponent >= precision as i32 {
        let (lead, rest) = digits.split_at(1);
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{sign}{lead}e{exp_sign}{}", exponent.abs())
        } else {
            format!("{sign}{lead}.{rest}e{exp_sign}{}", exponent.abs())
        }
    } else if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    } else {
        let (int, frac) = digits.split_at(exponent as usize + 1);
        if frac.is_empty() {
            format!("{sign}{int}")
        } else {
            format!("{sign}{int}.{frac}")
        }
    }
}

/// Round a positive finite value to `precision` significant digits.
///
/// Returns the digit string (exactly `precision` long) and the decimal
/// exponent of its first digit.
fn round_significant(value: f64, precision: usize) -> (String, i32) {
    let scientific = format!("{:.*e}", EXACT_DIGITS, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    let all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).map(|b| b - b'0').collect();
    let mut kept: Vec<u8> = all.iter().copied().take(precision).collect();
    kept.resize(precision, 0);
    let mut exponent = exponent;

    if all.get(precision).is_some_and(|&next| next >= 5) {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            // 9.99 -> 10.0
            kept.insert(0, 1);
            kept.truncate(precision);
            exponent += 1;
        }
    }

    let digits = kept.iter().map(|d| char::from(b'0' + d)).collect();
    (digits, exponent)
}

/// Format a duration given in seconds.
///
/// `0.0005` renders as `"500 us"`, `0.002` as `"2.00 ms"`. Exactly `0.001`
/// takes the millisecond branch.
pub fn format_time(seconds: f64) -> String {
    if seconds < MICROSECOND_THRESHOLD_S {
        format!("{} us", to_precision(seconds * 1_000_000.0, TIME_SIG_DIGITS))
    } else {
        format!("{} ms", to_precision(seconds * 1_000.0, TIME_SIG_DIGITS))
    }
}

/// Format a mean pedestal value (ADU). Zero renders as the literal `"0"`.
pub fn format_pedestal(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        to_precision(value, PEDESTAL_SIG_DIGITS)
    }
}

/// Interpret a JSON scalar as a number.
///
/// Strings holding a number are accepted since some firmware revisions
/// report numeric settings as strings.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Render a JSON scalar verbatim.
pub fn display_scalar(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

/// Render a time-valued field, or the missing placeholder.
pub fn display_time(value: Option<&Value>) -> String {
    value
        .and_then(numeric)
        .map(format_time)
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Render a scalar followed by a unit, e.g. `"12400 eV"`.
pub fn display_with_unit(value: Option<&Value>, unit: &str) -> String {
    match value {
        None | Some(Value::Null) => MISSING_VALUE.to_string(),
        Some(v) => format!("{} {unit}", display_scalar(Some(v))),
    }
}

/// Render an optional pedestal mean.
pub fn display_pedestal(value: Option<f64>) -> String {
    value
        .map(format_pedestal)
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Render an optional bad-pixel count. Whole numbers drop the fraction.
pub fn display_count(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => v.to_string(),
        None => MISSING_VALUE.to_string(),
    }
}
