//! Single-variable helpers over the process environment
//!
//! For one-off reads where declaring a struct is overkill. These always use
//! the real process environment; struct population goes through a
//! [`Source`](crate::Source) instead.

use std::env;

use crate::error::Error;
use crate::scalar::Scalar;
use crate::source::{ProcessEnv, Source};

/// Value of `key`, or `None` when it is not set.
///
/// Fails with [`Error::NotUnicode`] when the value is not valid Unicode.
pub fn lookup(key: &str) -> Result<Option<String>, Error> {
    ProcessEnv.lookup(key)
}

/// Value of `key`, failing with [`Error::Missing`] when it is not set.
pub fn get(key: &str) -> Result<String, Error> {
    lookup(key)?.ok_or_else(|| Error::required(key))
}

/// Value of `key`, or `fallback` when it is not set.
pub fn get_or(key: &str, fallback: &str) -> Result<String, Error> {
    Ok(lookup(key)?.unwrap_or_else(|| fallback.to_string()))
}

/// Parse `key` as `T` using the same rules as struct fields.
///
/// ```rust
/// # fn main() -> anyhow::Result<()> {
/// envtag::getters::set("WORKERS", "4")?;
/// let workers: usize = envtag::getters::parse("WORKERS")?;
/// assert_eq!(workers, 4);
///
/// envtag::getters::set("FEATURES", "a,b")?;
/// let features: Vec<String> = envtag::getters::parse("FEATURES")?;
/// assert_eq!(features, ["a", "b"]);
/// # Ok(())
/// # }
/// ```
pub fn parse<T: Scalar>(key: &str) -> Result<T, Error> {
    let value = get(key)?;
    T::parse_scalar(&value).map_err(|e| Error::coercion::<T>(key, e))
}

/// Parse `key` as `T`, returning `fallback` when it is unset, not Unicode, or
/// rejected by `T`.
pub fn parse_or<T: Scalar>(key: &str, fallback: T) -> T {
    parse(key).unwrap_or(fallback)
}

/// Fail with [`Error::Missing`] unless `key` is set.
///
/// A variable set to the empty string counts as set.
pub fn require(key: &str) -> Result<(), Error> {
    get(key).map(drop)
}

/// Set `key` in the process environment.
///
/// The environment is shared by every thread; sequencing concurrent writes
/// is up to the caller.
pub fn set(key: &str, value: &str) -> Result<(), Error> {
    validate_key(key)?;
    if value.contains('\0') {
        return Err(Error::InvalidKey {
            name: key.to_string(),
        });
    }
    env::set_var(key, value);
    Ok(())
}

/// Remove `key` from the process environment.
pub fn unset(key: &str) -> Result<(), Error> {
    validate_key(key)?;
    env::remove_var(key);
    Ok(())
}

fn validate_key(key: &str) -> Result<(), Error> {
    if key.is_empty() || key.contains(['=', '\0']) {
        return Err(Error::InvalidKey {
            name: key.to_string(),
        });
    }
    Ok(())
}
