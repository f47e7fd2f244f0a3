use alloc::string::{String, ToString};

use crate::value::{Value, ValueError, ValueKind};

// -----------------------------------------------------------------------------
// Traits

/// Types that can be stored in a [`Value`].
pub trait IntoValue {
    /// The kind produced by [`into_value`](IntoValue::into_value).
    const KIND: ValueKind;

    fn into_value(self) -> Value;
}

/// Types that can be extracted from a [`Value`], converting between kinds
/// where no information is lost.
pub trait FromValue: Sized {
    /// The kind this type is natively stored as.
    const KIND: ValueKind;

    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

// -----------------------------------------------------------------------------
// Helpers

#[cold]
#[inline(never)]
fn bad_type(value: &Value, to: &'static str) -> ValueError {
    ValueError::BadType {
        from: value.kind(),
        to,
    }
}

#[cold]
#[inline(never)]
fn parse_error(text: &str, to: &'static str) -> ValueError {
    ValueError::Parse {
        text: text.to_string(),
        to,
    }
}

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_int {
    ($($ty:ty),+) => {$(
        impl FromValue for $ty {
            const KIND: ValueKind = ValueKind::Int;

            fn from_value(value: &Value) -> Result<Self, ValueError> {
                const NAME: &str = stringify!($ty);
                let wide = match value {
                    Value::Int(v) => *v,
                    Value::Bool(v) => i128::from(*v),
                    Value::Real(v) => return real_to_int::<$ty>(*v, value, NAME),
                    Value::Str(s) => {
                        return s.trim().parse::<$ty>().map_err(|_| parse_error(s, NAME));
                    }
                    Value::None => return Err(bad_type(value, NAME)),
                };
                <$ty>::try_from(wide).map_err(|_| ValueError::Overflow {
                    value: wide.to_string(),
                    to: NAME,
                })
            }
        }
    )+};
}

trait RealBounds: Sized {
    const MIN: f64;
    const MAX: f64;

    fn saturate(real: f64) -> Self;
}

macro_rules! impl_real_bounds {
    ($($ty:ty),+) => {$(
        impl RealBounds for $ty {
            const MIN: f64 = <$ty>::MIN as f64;
            // Rounds up to a power of two for the wide types; that value saturates to `MAX`.
            const MAX: f64 = <$ty>::MAX as f64;

            #[inline]
            fn saturate(real: f64) -> Self {
                real as $ty
            }
        }
    )+};
}

impl_real_bounds!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

fn real_to_int<T: RealBounds>(real: f64, value: &Value, to: &'static str) -> Result<T, ValueError> {
    if real.fract() != 0.0 || real.is_nan() {
        return Err(bad_type(value, to));
    }
    if real < T::MIN || real > T::MAX {
        return Err(ValueError::Overflow {
            value: real.to_string(),
            to,
        });
    }
    Ok(T::saturate(real))
}

// Always fit in `i128`.
macro_rules! impl_into_narrow_int {
    ($($ty:ty),+) => {$(
        impl IntoValue for $ty {
            const KIND: ValueKind = ValueKind::Int;

            #[inline]
            fn into_value(self) -> Value {
                Value::Int(i128::from(self))
            }
        }

        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                value.into_value()
            }
        }
    )+};
}

// Values above `i128::MAX` are stored as reals.
macro_rules! impl_into_wide_int {
    ($($ty:ty),+) => {$(
        impl IntoValue for $ty {
            const KIND: ValueKind = ValueKind::Int;

            #[inline]
            fn into_value(self) -> Value {
                match i128::try_from(self) {
                    Ok(v) => Value::Int(v),
                    Err(_) => Value::Real(self as f64),
                }
            }
        }

        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                value.into_value()
            }
        }
    )+};
}

impl_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_into_narrow_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);
impl_into_wide_int!(isize, usize, u128);

// -----------------------------------------------------------------------------
// Reals

macro_rules! impl_real {
    ($($ty:ty),+) => {$(
        impl FromValue for $ty {
            const KIND: ValueKind = ValueKind::Real;

            fn from_value(value: &Value) -> Result<Self, ValueError> {
                const NAME: &str = stringify!($ty);
                let real = match value {
                    Value::Real(v) => *v,
                    Value::Int(v) => *v as f64,
                    Value::Bool(v) => f64::from(u8::from(*v)),
                    Value::Str(s) => {
                        return s.trim().parse::<$ty>().map_err(|_| parse_error(s, NAME));
                    }
                    Value::None => return Err(bad_type(value, NAME)),
                };
                let narrowed = real as $ty;
                if real.is_finite() && narrowed.is_infinite() {
                    return Err(ValueError::Overflow {
                        value: real.to_string(),
                        to: NAME,
                    });
                }
                Ok(narrowed)
            }
        }

        impl IntoValue for $ty {
            const KIND: ValueKind = ValueKind::Real;

            #[inline]
            fn into_value(self) -> Value {
                Value::Real(f64::from(self))
            }
        }

        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                value.into_value()
            }
        }
    )+};
}

impl_real!(f32, f64);

// -----------------------------------------------------------------------------
// bool

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(v) => Ok(*v),
            Value::Int(v) => Ok(*v != 0),
            Value::Real(v) => Ok(*v != 0.0),
            Value::Str(s) => match s.trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(parse_error(s, "bool")),
            },
            Value::None => Err(bad_type(value, "bool")),
        }
    }
}

impl IntoValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    #[inline]
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

// -----------------------------------------------------------------------------
// Strings

impl FromValue for String {
    const KIND: ValueKind = ValueKind::Str;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            Value::None => Err(bad_type(value, "String")),
            other => Ok(other.to_string()),
        }
    }
}

impl IntoValue for String {
    const KIND: ValueKind = ValueKind::Str;

    #[inline]
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &'static str {
    const KIND: ValueKind = ValueKind::Str;

    #[inline]
    fn into_value(self) -> Value {
        Value::Str(String::from(self))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(String::from(value))
    }
}

// -----------------------------------------------------------------------------
// Unit

impl FromValue for () {
    const KIND: ValueKind = ValueKind::None;

    #[inline]
    fn from_value(_: &Value) -> Result<Self, ValueError> {
        Ok(())
    }
}

impl IntoValue for () {
    const KIND: ValueKind = ValueKind::None;

    #[inline]
    fn into_value(self) -> Value {
        Value::None
    }
}

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Value::None
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::value::{Value, ValueError, ValueKind};

    #[test]
    fn integers() {
        assert_eq!(Value::from(7_u16), Value::Int(7));
        assert_eq!(Value::Int(-3).to::<i8>(), Ok(-3));
        assert_eq!(Value::Bool(true).to::<u32>(), Ok(1));
        assert_eq!(Value::Real(4.0).to::<i32>(), Ok(4));
        assert_eq!(Value::from(" 12 ").to::<u8>(), Ok(12));

        assert!(matches!(
            Value::Int(300).to::<u8>(),
            Err(ValueError::Overflow { to: "u8", .. })
        ));
        assert!(matches!(
            Value::Int(-1).to::<usize>(),
            Err(ValueError::Overflow { .. })
        ));
        assert!(matches!(
            Value::Real(1.5).to::<i64>(),
            Err(ValueError::BadType {
                from: ValueKind::Real,
                ..
            })
        ));
        assert!(matches!(
            Value::from("x").to::<i32>(),
            Err(ValueError::Parse { .. })
        ));
    }

    #[test]
    fn wide_integers_round_trip() {
        assert_eq!(Value::from(u64::MAX), Value::Int(i128::from(u64::MAX)));
        assert_eq!(Value::from(u64::MAX).to::<u64>(), Ok(u64::MAX));
        assert_eq!(Value::from(usize::MAX).to::<usize>(), Ok(usize::MAX));
        assert_eq!(Value::from(i128::MIN).to::<i128>(), Ok(i128::MIN));
        assert_eq!(Value::from(5_usize), Value::Int(5));

        let big = u128::from(u64::MAX) << 32;
        assert_eq!(Value::from(big).to::<u128>(), Ok(big));

        // Above `i128::MAX` the value is a real.
        assert_eq!(Value::from(u128::MAX).kind(), ValueKind::Real);
        assert_eq!(Value::from(u128::MAX).to::<u128>(), Ok(u128::MAX));
        assert!(matches!(
            Value::from(u128::MAX).to::<u64>(),
            Err(ValueError::Overflow { to: "u64", .. })
        ));
    }

    #[test]
    fn reals_check_the_target_range() {
        assert_eq!(Value::Real(1e19).to::<u64>(), Ok(10_000_000_000_000_000_000));
        assert!(matches!(
            Value::Real(1e19).to::<i64>(),
            Err(ValueError::Overflow { to: "i64", .. })
        ));
        assert!(matches!(
            Value::Real(-1.0).to::<u8>(),
            Err(ValueError::Overflow { to: "u8", .. })
        ));
        assert_eq!(Value::Real(-128.0).to::<i8>(), Ok(-128));
    }

    #[test]
    fn reals_and_bools() {
        assert_eq!(Value::Int(2).to::<f64>(), Ok(2.0));
        assert_eq!(Value::from(0.5_f32), Value::Real(0.5));
        assert!(matches!(
            Value::Real(1e300).to::<f32>(),
            Err(ValueError::Overflow { .. })
        ));
        assert_eq!(Value::Real(0.0).to::<bool>(), Ok(false));
        assert_eq!(Value::from("true").to::<bool>(), Ok(true));
        assert!(Value::None.to::<bool>().is_err());
    }

    #[test]
    fn strings() {
        assert_eq!(Value::Bool(false).to::<String>().unwrap(), "false");
        assert_eq!(Value::Real(1.5).to::<String>().unwrap(), "1.5");
        assert!(Value::None.to::<String>().is_err());
        assert_eq!(Value::from(()), Value::None);
        assert!(Value::None.is_none());
    }
}
