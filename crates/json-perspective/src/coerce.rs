//! Text conversion and index arithmetic shared by the operation traits.
//!
//! Text conversion follows the generic value-to-text rules of the data's
//! origin platform: integral numbers print without a fraction, very large and
//! very small magnitudes switch to exponent form, `undefined` and `null`
//! print as their names.

use serde_json::Number;

use crate::node::Scalar;

/// Text form of a mapping.
pub const MAPPING_TEXT: &str = "[object Object]";

/// Text form of a number.
///
/// ```
/// use json_perspective::coerce::number_text;
/// use serde_json::Number;
///
/// assert_eq!(number_text(&Number::from(42)), "42");
/// assert_eq!(number_text(&Number::from_f64(2.0).unwrap()), "2");
/// assert_eq!(number_text(&Number::from_f64(0.5).unwrap()), "0.5");
/// assert_eq!(number_text(&Number::from_f64(1e21).unwrap()), "1e+21");
/// ```
pub fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if !(1e-6..1e21).contains(&abs) {
        let exp = format!("{f:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Text form of a scalar at the top level of a conversion.
pub fn scalar_text(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Undefined => "undefined".to_string(),
        Scalar::Null => "null".to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Number(n) => number_text(n),
        Scalar::Text(s) => s.clone(),
    }
}

/// Numeric equality across integer and float representations.
pub fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    } else {
        a == b
    }
}

/// Resolve a relative position against `len`.
///
/// Negative positions count back from the end; the result is clamped to
/// `[0, len]`.
///
/// ```
/// use json_perspective::coerce::relative_index;
///
/// assert_eq!(relative_index(1, 4), 1);
/// assert_eq!(relative_index(-1, 4), 3);
/// assert_eq!(relative_index(-9, 4), 0);
/// assert_eq!(relative_index(9, 4), 4);
/// ```
pub fn relative_index(pos: i64, len: usize) -> usize {
    if pos < 0 {
        let back = pos.unsigned_abs();
        usize::try_from(back).map_or(0, |back| len.saturating_sub(back))
    } else {
        usize::try_from(pos).map_or(len, |pos| pos.min(len))
    }
}

/// Resolve an optional `[start, end)` pair of relative positions.
pub fn relative_range(start: i64, end: Option<i64>, len: usize) -> (usize, usize) {
    let from = relative_index(start, len);
    let to = end.map_or(len, |end| relative_index(end, len));
    (from, to.max(from))
}
