//! Coercion of resolved strings into field types

use std::fmt;

/// A type that can be parsed from a single resolved environment value.
///
/// Implemented for `String`, `bool`, `char`, every integer and float type,
/// `Vec<T>` of [`Element`] types and `Option<T>`. Implement it for your own
/// types and register them with [`impl_field!`](crate::impl_field).
pub trait Scalar: Sized {
    /// Error describing why a value was rejected.
    type Err: fmt::Display;

    /// Parse a non-empty resolved value.
    fn parse_scalar(value: &str) -> Result<Self, Self::Err>;
}

/// A scalar allowed as the element of a comma-separated `Vec<T>`.
pub trait Element: Scalar {}

/// Error for values that are not one of the accepted boolean spellings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid boolean value '{0}'")]
pub struct InvalidBool(pub String);

impl Scalar for bool {
    type Err = InvalidBool;

    fn parse_scalar(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(InvalidBool(value.to_string())),
        }
    }
}

impl Element for bool {}

macro_rules! from_str_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                type Err = <$ty as std::str::FromStr>::Err;

                fn parse_scalar(value: &str) -> Result<Self, Self::Err> {
                    value.parse()
                }
            }
        )*
    };
}

from_str_scalar!(
    String, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

macro_rules! element {
    ($($ty:ty),* $(,)?) => {
        $(impl Element for $ty {})*
    };
}

element!(String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: Element> Scalar for Vec<T> {
    type Err = T::Err;

    fn parse_scalar(value: &str) -> Result<Self, Self::Err> {
        value.split(',').map(T::parse_scalar).collect()
    }
}

impl<T: Scalar> Scalar for Option<T> {
    type Err = T::Err;

    fn parse_scalar(value: &str) -> Result<Self, Self::Err> {
        T::parse_scalar(value).map(Some)
    }
}
