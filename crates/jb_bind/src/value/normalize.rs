use crate::value::Untyped;

/// Lower bound of `i64` as `f64`, exact.
const I64_MIN: f64 = -9_223_372_036_854_775_808.0;
/// `i64::MAX + 1` as `f64`, exact. The upper bound is exclusive.
const I64_END: f64 = 9_223_372_036_854_775_808.0;

/// Rewrites integral floating values into the narrowest exact integer.
///
/// - A [`Float`](Untyped::Float) with no fractional part becomes
///   [`Int`](Untyped::Int) if it fits `i32`, else [`Long`](Untyped::Long) if it
///   fits `i64`, else stays a `Float`.
/// - Lists and maps are rebuilt with normalized elements.
/// - Everything else is returned unchanged.
///
/// The input is never modified and the function is idempotent.
///
/// # Examples
///
/// ```
/// use jb_bind::value::{Untyped, normalize};
///
/// let value = Untyped::List(vec![Untyped::Float(10.0), Untyped::Float(12.5)]);
/// assert_eq!(
///     normalize(&value),
///     Untyped::List(vec![Untyped::Int(10), Untyped::Float(12.5)]),
/// );
/// ```
pub fn normalize(value: &Untyped) -> Untyped {
    match value {
        Untyped::Float(val) => normalize_float(*val),
        Untyped::List(items) => Untyped::List(items.iter().map(normalize).collect()),
        Untyped::Map(entries) => Untyped::Map(
            entries
                .iter()
                .map(|(key, val)| (key.clone(), normalize(val)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Normalizes a single floating scalar, see [`normalize`].
pub fn normalize_float(val: f64) -> Untyped {
    if !val.is_finite() || val.trunc() != val {
        return Untyped::Float(val);
    }
    if val >= i32::MIN as f64 && val <= i32::MAX as f64 {
        Untyped::Int(val as i32)
    } else if (I64_MIN..I64_END).contains(&val) {
        Untyped::Long(val as i64)
    } else {
        Untyped::Float(val)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use indexmap::IndexMap;

    use super::{normalize, normalize_float};
    use crate::value::Untyped;

    fn map(entries: &[(&str, Untyped)]) -> Untyped {
        Untyped::Map(
            entries
                .iter()
                .map(|(key, val)| (String::from(*key), val.clone()))
                .collect::<IndexMap<_, _>>(),
        )
    }

    #[test]
    fn integral_floats_narrow() {
        let input = map(&[
            ("x", Untyped::Float(10.0)),
            ("y", Untyped::Float(12.5)),
            ("z", Untyped::Float(100000000000.0)),
        ]);
        let expected = map(&[
            ("x", Untyped::Int(10)),
            ("y", Untyped::Float(12.5)),
            ("z", Untyped::Long(100000000000)),
        ]);
        assert_eq!(normalize(&input), expected);
    }

    #[test]
    fn bounds() {
        assert_eq!(normalize_float(2147483647.0), Untyped::Int(i32::MAX));
        assert_eq!(normalize_float(2147483648.0), Untyped::Long(2147483648));
        assert_eq!(normalize_float(-2147483648.0), Untyped::Int(i32::MIN));
        assert_eq!(normalize_float(-9223372036854775808.0), Untyped::Long(i64::MIN));
        assert_eq!(
            normalize_float(9223372036854775808.0),
            Untyped::Float(9223372036854775808.0)
        );
        assert_eq!(normalize_float(1e300), Untyped::Float(1e300));
        assert_eq!(normalize_float(-0.5), Untyped::Float(-0.5));
    }

    #[test]
    fn non_finite_pass_through() {
        assert!(matches!(normalize_float(f64::NAN), Untyped::Float(v) if v.is_nan()));
        assert_eq!(normalize_float(f64::INFINITY), Untyped::Float(f64::INFINITY));
    }

    #[test]
    fn nested_and_idempotent() {
        let input = Untyped::List(vec![
            Untyped::Null,
            Untyped::String(String::from("s")),
            map(&[("n", Untyped::List(vec![Untyped::Float(3.0)]))]),
        ]);
        let once = normalize(&input);
        assert_eq!(
            once,
            Untyped::List(vec![
                Untyped::Null,
                Untyped::String(String::from("s")),
                map(&[("n", Untyped::List(vec![Untyped::Int(3)]))]),
            ])
        );
        assert_eq!(normalize(&once), once);
        // input untouched
        assert_eq!(
            input,
            Untyped::List(vec![
                Untyped::Null,
                Untyped::String(String::from("s")),
                map(&[("n", Untyped::List(vec![Untyped::Float(3.0)]))]),
            ])
        );
    }
}
