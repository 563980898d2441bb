//! Populate configuration structs from environment variables
//!
//! `envtag` fills the fields of a struct from environment variables according
//! to a short annotation on each field. The annotation lists the keys to try,
//! a fallback, and a few options:
//!
//! ```text
//! #[env("DATABASE_HOST|DB_HOST,default=localhost,required")]
//! ```
//!
//! # Features
//!
//! - **Alternate keys**: `KEY|ALT|LEGACY`, first present key wins
//! - **Fallbacks**: `default=value` or `fallback=value`; use `[a,b]` for values with commas
//! - **Required fields**: `required` fails when the value is still empty after the fallback
//! - **File-based secrets**: `file` reads the file whose path the variable holds
//! - **Interpolation**: `expand` substitutes `${NAME}` and `$NAME`
//! - **Nested structs**: a tag on a struct field becomes a `TAG_` prefix
//! - **Injectable environment**: populate from any [`Source`], not just the process
//!
//! # Value Parsing
//!
//! - Strings: assigned as-is
//! - Booleans: `true`/`1`/`yes` and `false`/`0`/`no`, case-insensitive
//! - Numbers: every integer and float type, base 10
//! - Lists: `Vec<T>` split on `,`, e.g. `REDIS_HOSTS=host1,host2`
//! - Optional: `Option<T>` becomes `Some` when a value resolves
//!
//! An empty resolved value leaves the field untouched, so values set in code
//! before population act as defaults.
//!
//! # Example
//!
//! ```rust
//! use envtag::Unmarshal;
//!
//! #[derive(Debug, Default, Unmarshal)]
//! struct DatabaseConfig {
//!     #[env("HOST|DB_HOST,default=localhost")]
//!     host: String,
//!     #[env("PORT,default=5432")]
//!     port: u16,
//! }
//!
//! #[derive(Debug, Default, Unmarshal)]
//! struct Config {
//!     #[env("DEBUG")]
//!     debug: bool,
//!     #[env("REDIS_HOSTS,default=[localhost:6379,localhost:6380]")]
//!     redis_hosts: Vec<String>,
//!     #[env("DATABASE")]
//!     database: DatabaseConfig,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! // `Config::from_env()` reads the process environment; any `Source` works
//! let env = std::collections::HashMap::from([
//!     ("DATABASE_HOST".to_string(), "db.internal".to_string()),
//! ]);
//! let config = Config::from_source(&env)?;
//! assert_eq!(config.database.host, "db.internal");
//! assert_eq!(config.database.port, 5432);
//! assert_eq!(config.redis_hosts, ["localhost:6379", "localhost:6380"]);
//! #     Ok(())
//! # }
//! ```
//!
//! # Options
//!
//! ## `file`
//!
//! The variable holds a path; the field receives the file's content with one
//! trailing line ending removed. Fallbacks are used as-is, never read as paths.
//!
//! ```rust
//! # use envtag::Unmarshal;
//! #[derive(Default, Unmarshal)]
//! struct Config {
//!     // API_KEY=/run/secrets/api_key
//!     #[env("API_KEY,file,required")]
//!     api_key: String,
//! }
//! ```
//!
//! ## `expand`
//!
//! Placeholders are looked up in the environment first, then in the fallback
//! of any field in the same struct tree whose first key matches, then replaced
//! with the empty string.
//!
//! ```rust
//! # use envtag::Unmarshal;
//! #[derive(Default, Unmarshal)]
//! struct Config {
//!     #[env("HOST,default=localhost")]
//!     host: String,
//!     #[env("PORT,default=8080")]
//!     port: u16,
//!     #[env("ADDR,default=${HOST}:${PORT},expand")]
//!     addr: String,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let env = std::collections::HashMap::from([("PORT".to_string(), "9090".to_string())]);
//! let config = Config::from_source(&env)?;
//! assert_eq!(config.addr, "localhost:9090");
//! #     Ok(())
//! # }
//! ```
//!
//! ## `#[env(skip)]`
//!
//! Every field must be a [`Field`]; mark fields of other types with
//! `#[env(skip)]`. Fields with no `#[env]` attribute are populated only if
//! they are nested structs.

mod error;
mod expand;
mod field;
pub mod getters;
mod scalar;
mod schema;
mod source;
mod tag;
mod walker;

pub use envtag_derive::Unmarshal;
pub use error::Error;
pub use field::Field;
pub use scalar::{Element, InvalidBool, Scalar};
pub use schema::{variables, FieldSchema, Variable};
pub use source::{ProcessEnv, Source};
pub use tag::{parse_tag, FieldSpec};
pub use walker::{Origin, Resolved, Unmarshal, Walker};

/// Populate `target` from the process environment.
///
/// Returns the first error encountered. Fields visited before the failure keep
/// their new values.
pub fn unmarshal<T: Unmarshal>(target: &mut T) -> Result<(), Error> {
    unmarshal_from(target, &ProcessEnv)
}

/// Populate `target` from `source`.
///
/// ```rust
/// use std::collections::HashMap;
/// use envtag::Unmarshal;
///
/// #[derive(Default, Unmarshal)]
/// struct Config {
///     #[env("HOST")]
///     host: String,
/// }
///
/// let mut config = Config { host: "preset".into() };
/// envtag::unmarshal_from(&mut config, &HashMap::<String, String>::new()).unwrap();
/// assert_eq!(config.host, "preset");
/// ```
pub fn unmarshal_from<T: Unmarshal>(target: &mut T, source: &dyn Source) -> Result<(), Error> {
    let walker = Walker::new(source, T::SCHEMA);
    target.populate(&walker, "")
}
