//! Per-field dispatch between nested structs and scalar values

use crate::error::Error;
use crate::scalar::{Element, Scalar};
use crate::schema::FieldSchema;
use crate::walker::{Unmarshal, Walker};

/// A struct field the walker knows how to populate.
///
/// Every [`Unmarshal`] struct is a `Field` that recurses with an extended
/// prefix. Scalars, `Option<T>` and `Vec<T>` resolve and coerce a value.
/// Register additional [`Scalar`] types with [`impl_field!`](crate::impl_field).
pub trait Field {
    /// Schema of the field's type when it is a nested struct.
    const NESTED: Option<&'static [FieldSchema]> = None;

    /// Populate `self` from the annotation `tag` under `prefix`.
    fn populate_field(&mut self, walker: &Walker<'_>, prefix: &str, tag: &str)
        -> Result<(), Error>;
}

impl<T: Unmarshal> Field for T {
    const NESTED: Option<&'static [FieldSchema]> = Some(T::SCHEMA);

    fn populate_field(&mut self, walker: &Walker<'_>, prefix: &str, tag: &str) -> Result<(), Error> {
        walker.nested(self, prefix, tag)
    }
}

/// Implement [`Field`] for types that implement [`Scalar`].
///
/// ```rust
/// use envtag::{Scalar, Unmarshal};
///
/// #[derive(Debug, Default, PartialEq)]
/// enum Mode {
///     #[default]
///     Standalone,
///     Cluster,
/// }
///
/// impl Scalar for Mode {
///     type Err = String;
///
///     fn parse_scalar(value: &str) -> Result<Self, Self::Err> {
///         match value {
///             "standalone" => Ok(Mode::Standalone),
///             "cluster" => Ok(Mode::Cluster),
///             other => Err(format!("unknown mode '{other}'")),
///         }
///     }
/// }
///
/// envtag::impl_field!(Mode);
///
/// #[derive(Default, Unmarshal)]
/// struct Config {
///     #[env("REDIS_MODE,default=cluster")]
///     mode: Mode,
/// }
///
/// let env = std::collections::HashMap::<String, String>::new();
/// let config = Config::from_source(&env).unwrap();
/// assert_eq!(config.mode, Mode::Cluster);
/// ```
#[macro_export]
macro_rules! impl_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Field for $ty {
                fn populate_field(
                    &mut self,
                    walker: &$crate::Walker<'_>,
                    prefix: &str,
                    tag: &str,
                ) -> ::core::result::Result<(), $crate::Error> {
                    walker.assign(self, prefix, tag)
                }
            }
        )*
    };
}

crate::impl_field!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl<T: Element> Field for Vec<T> {
    fn populate_field(&mut self, walker: &Walker<'_>, prefix: &str, tag: &str) -> Result<(), Error> {
        walker.assign(self, prefix, tag)
    }
}

impl<T: Scalar> Field for Option<T> {
    fn populate_field(&mut self, walker: &Walker<'_>, prefix: &str, tag: &str) -> Result<(), Error> {
        walker.assign(self, prefix, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    struct Inner {
        f: String,
    }

    impl Unmarshal for Inner {
        const SCHEMA: &'static [FieldSchema] = &[FieldSchema {
            ident: "f",
            tag: "F",
            nested: <String as Field>::NESTED,
        }];

        fn populate(&mut self, walker: &Walker<'_>, prefix: &str) -> Result<(), Error> {
            Field::populate_field(&mut self.f, walker, prefix, Self::SCHEMA[0].tag)
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_nested_schema_exposed() {
        assert_eq!(<Inner as Field>::NESTED, Some(Inner::SCHEMA));
        assert_eq!(<u16 as Field>::NESTED, None);
        assert_eq!(<Vec<String> as Field>::NESTED, None);
    }

    #[test]
    fn test_nested_extends_prefix() {
        let env = env(&[("INNER_F", "value"), ("F", "wrong")]);
        let walker = Walker::new(&env, &[]);

        let mut inner = Inner::default();
        inner.populate_field(&walker, "", "INNER").unwrap();
        assert_eq!(inner.f, "value");
    }

    #[test]
    fn test_untagged_nested_keeps_prefix() {
        let env = env(&[("APP_F", "embedded")]);
        let walker = Walker::new(&env, &[]);

        let mut inner = Inner::default();
        inner.populate_field(&walker, "APP_", "").unwrap();
        assert_eq!(inner.f, "embedded");
    }

    #[test]
    fn test_option_set_only_when_present() {
        let env = env(&[("TIMEOUT", "30")]);
        let walker = Walker::new(&env, &[]);

        let mut timeout: Option<u64> = None;
        timeout.populate_field(&walker, "", "TIMEOUT").unwrap();
        assert_eq!(timeout, Some(30));

        let mut retries: Option<u8> = None;
        retries.populate_field(&walker, "", "RETRIES").unwrap();
        assert_eq!(retries, None);
    }

    #[test]
    fn test_vec_field() {
        let env = env(&[("PORTS", "80,443")]);
        let walker = Walker::new(&env, &[]);

        let mut ports: Vec<u16> = Vec::new();
        ports.populate_field(&walker, "", "PORTS").unwrap();
        assert_eq!(ports, [80, 443]);
    }
}
