//! Struct traversal and value resolution

use tracing::{debug, trace};

use crate::error::Error;
use crate::expand::expand;
use crate::scalar::Scalar;
use crate::schema::{self, FieldSchema};
use crate::source::{ProcessEnv, Source};
use crate::tag::{nested_prefix, parse_tag, FieldSpec};

/// A struct whose fields can be populated from environment variables.
///
/// Usually implemented with `#[derive(Unmarshal)]`.
pub trait Unmarshal {
    /// Static description of the annotated fields, in declaration order.
    const SCHEMA: &'static [FieldSchema];

    /// Populate every field of `self`, looking keys up under `prefix`.
    ///
    /// Stops at the first error. Fields visited before the failing one keep
    /// their new values.
    fn populate(&mut self, walker: &Walker<'_>, prefix: &str) -> Result<(), Error>;

    /// Build from `Default` and populate from the process environment.
    fn from_env() -> Result<Self, Error>
    where
        Self: Default + Sized,
    {
        Self::from_source(&ProcessEnv)
    }

    /// Build from `Default` and populate from `source`.
    fn from_source(source: &dyn Source) -> Result<Self, Error>
    where
        Self: Default + Sized,
    {
        let mut target = Self::default();
        crate::unmarshal_from(&mut target, source)?;
        Ok(target)
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// One of the declared keys was present.
    Environment,
    /// A declared key was present and named a file that was read.
    File,
    /// No key was present; the fallback expression was used.
    Fallback,
}

/// Final string for a field, before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Full key the value came from, or the first declared key for fallbacks.
    pub key: String,
    pub value: String,
    pub origin: Origin,
}

/// Drives one population call.
///
/// Holds the injected [`Source`] and the schema of the root type, which
/// placeholder expansion searches for other fields' fallbacks.
pub struct Walker<'a> {
    source: &'a dyn Source,
    root: &'static [FieldSchema],
}

impl<'a> Walker<'a> {
    pub fn new(source: &'a dyn Source, root: &'static [FieldSchema]) -> Self {
        Self { source, root }
    }

    /// Recurse into a nested struct.
    ///
    /// A non-empty `tag` extends the prefix with its key-spec and `_`; an
    /// empty one keeps the parent's prefix, as for an embedded struct.
    /// Options on a nested struct's tag are ignored.
    pub fn nested<T>(&self, target: &mut T, prefix: &str, tag: &str) -> Result<(), Error>
    where
        T: Unmarshal + ?Sized,
    {
        let child = nested_prefix(prefix, tag);
        if tag.contains(',') {
            debug!(tag, prefix = %child, "ignoring options on nested struct tag");
        }
        trace!(prefix = %child, "entering nested struct");
        target.populate(self, &child)
    }

    /// Resolve `tag` under `prefix` and store the coerced value in `slot`.
    ///
    /// An empty tag or an empty resolved value leaves `slot` untouched.
    pub fn assign<T: Scalar>(&self, slot: &mut T, prefix: &str, tag: &str) -> Result<(), Error> {
        if tag.is_empty() {
            return Ok(());
        }

        let spec = parse_tag(tag);
        let resolved = self.resolve(&spec, prefix)?;
        if resolved.value.is_empty() {
            return Ok(());
        }

        *slot = T::parse_scalar(&resolved.value)
            .map_err(|e| Error::coercion::<T>(&resolved.key, e))?;
        Ok(())
    }

    /// Produce the final string for a field.
    ///
    /// Order: key lookup, file indirection, fallback, expansion, required
    /// check.
    pub fn resolve(&self, spec: &FieldSpec, prefix: &str) -> Result<Resolved, Error> {
        let mut found = None;
        for key in &spec.keys {
            let full = format!("{prefix}{key}");
            if let Some(value) = self.source.lookup(&full)? {
                found = Some((full, value));
                break;
            }
        }

        let (key, value, origin) = match found {
            Some((key, path)) if spec.file => {
                let content = self
                    .source
                    .read_file(&path)
                    .map_err(|source| Error::FileRead {
                        name: key.clone(),
                        path: path.clone(),
                        source,
                    })?;
                (key, strip_line_ending(content), Origin::File)
            }
            Some((key, value)) => (key, value, Origin::Environment),
            None => (
                format!("{prefix}{}", spec.primary_key()),
                spec.fallback.clone(),
                Origin::Fallback,
            ),
        };

        let value = if spec.expand {
            expand(&value, |name| self.placeholder(name))?
        } else {
            value
        };

        if spec.required && value.is_empty() {
            return Err(Error::required(format!("{prefix}{}", spec.primary_key())));
        }

        debug!(key = %key, origin = ?origin, empty = value.is_empty(), "resolved variable");
        Ok(Resolved { key, value, origin })
    }

    /// Value for `$NAME`: the environment, then the fallback of the first
    /// field anywhere in the root schema whose primary key is `NAME`.
    fn placeholder(&self, name: &str) -> Result<String, Error> {
        let value = match self.source.lookup(name)? {
            Some(value) => Some(value),
            None => schema::fallback_for(self.root, name),
        };
        Ok(value.unwrap_or_default())
    }
}

fn strip_line_ending(mut content: String) -> String {
    if content.ends_with('\n') {
        content.pop();
        if content.ends_with('\r') {
            content.pop();
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn source(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(env: &HashMap<String, String>, tag: &str, prefix: &str) -> Result<Resolved, Error> {
        Walker::new(env, &[]).resolve(&parse_tag(tag), prefix)
    }

    #[test]
    fn test_lookup_beats_fallback() {
        let env = source(&[("PORT", "9090")]);
        let r = resolve(&env, "PORT,default=8080", "").unwrap();
        assert_eq!(r.value, "9090");
        assert_eq!(r.origin, Origin::Environment);
    }

    #[test]
    fn test_fallback_when_absent() {
        let env = source(&[]);
        let r = resolve(&env, "PORT,default=8080", "").unwrap();
        assert_eq!(r.value, "8080");
        assert_eq!(r.key, "PORT");
        assert_eq!(r.origin, Origin::Fallback);
    }

    #[test]
    fn test_first_present_key_wins_even_if_empty() {
        let env = source(&[("DB_HOST", "db"), ("DATABASE_HOST", "")]);
        let r = resolve(&env, "DATABASE_HOST|DB_HOST,default=localhost", "").unwrap();
        assert_eq!(r.key, "DATABASE_HOST");
        assert_eq!(r.value, "");
    }

    #[test]
    fn test_alternate_key() {
        let env = source(&[("DB_HOST", "db")]);
        let r = resolve(&env, "DATABASE_HOST|DB_HOST", "").unwrap();
        assert_eq!(r.key, "DB_HOST");
        assert_eq!(r.value, "db");
    }

    #[test]
    fn test_prefix_applies_to_every_key() {
        let env = source(&[("APP_DB_HOST", "db"), ("DB_HOST", "wrong")]);
        let r = resolve(&env, "DATABASE_HOST|DB_HOST", "APP_").unwrap();
        assert_eq!(r.key, "APP_DB_HOST");
        assert_eq!(r.value, "db");
    }

    #[test]
    fn test_required_missing_then_present() {
        let mut env = source(&[]);
        let err = resolve(&env, "API_KEY|TOKEN,required", "SVC_").unwrap_err();
        assert!(matches!(&err, Error::Missing { name } if name == "SVC_API_KEY"));

        env.insert("SVC_TOKEN".into(), "t0k3n".into());
        let r = resolve(&env, "API_KEY|TOKEN,required", "SVC_").unwrap();
        assert_eq!(r.value, "t0k3n");
    }

    #[test]
    fn test_required_satisfied_by_fallback() {
        let env = source(&[]);
        let r = resolve(&env, "MODE,default=standalone,required", "").unwrap();
        assert_eq!(r.value, "standalone");
    }

    #[test]
    fn test_required_checked_after_expansion() {
        let env = source(&[]);
        let err = resolve(&env, "URL,default=${HOST},expand,required", "").unwrap_err();
        assert!(matches!(err, Error::Missing { .. }));
    }

    #[test]
    fn test_file_indirection() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "secret123").unwrap();
        let env = source(&[("KEY", file.path().to_str().unwrap())]);

        let r = resolve(&env, "KEY,file", "").unwrap();
        assert_eq!(r.value, "secret123");
        assert_eq!(r.origin, Origin::File);
    }

    #[test]
    fn test_file_not_read_for_fallback() {
        let env = source(&[]);
        let r = resolve(&env, "KEY,file,default=/not/a/file", "").unwrap();
        assert_eq!(r.value, "/not/a/file");
    }

    #[test]
    fn test_file_read_error() {
        let env = source(&[("KEY", "/nonexistent/envtag/secret")]);
        let err = resolve(&env, "KEY,file", "").unwrap_err();
        match err {
            Error::FileRead { name, path, source } => {
                assert_eq!(name, "KEY");
                assert_eq!(path, "/nonexistent/envtag/secret");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected FileRead error, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_environment_value() {
        let env = source(&[
            ("HOST", "localhost"),
            ("PORT", "8080"),
            ("BASE_URL", "http://${HOST}:${PORT}"),
        ]);
        let r = resolve(&env, "BASE_URL,expand", "").unwrap();
        assert_eq!(r.value, "http://localhost:8080");
    }

    #[test]
    fn test_expand_default() {
        let env = source(&[("HOST", "localhost"), ("PORT", "8080")]);
        let r = resolve(&env, "ADDR,default=${HOST}:${PORT},expand", "").unwrap();
        assert_eq!(r.value, "localhost:8080");
    }

    #[test]
    fn test_without_expand_placeholders_stay() {
        let env = source(&[("HOST", "localhost")]);
        let r = resolve(&env, "ADDR,default=${HOST}", "").unwrap();
        assert_eq!(r.value, "${HOST}");
    }

    #[test]
    fn test_expand_uses_schema_fallbacks() {
        static ROOT: &[FieldSchema] = &[
            FieldSchema {
                ident: "host",
                tag: "HOST,default=example.com",
                nested: None,
            },
            FieldSchema {
                ident: "addr",
                tag: "ADDR,default=${HOST}:${PORT},expand",
                nested: None,
            },
        ];
        let env = source(&[("PORT", "443")]);
        let walker = Walker::new(&env, ROOT);
        let r = walker.resolve(&parse_tag(ROOT[1].tag), "").unwrap();
        assert_eq!(r.value, "example.com:443");
    }

    #[test]
    fn test_assign_empty_is_noop() {
        let env = source(&[("HOST", "")]);
        let walker = Walker::new(&env, &[]);

        let mut host = "preset".to_string();
        walker.assign(&mut host, "", "HOST").unwrap();
        assert_eq!(host, "preset");

        let mut port = 3306u16;
        walker.assign(&mut port, "", "PORT").unwrap();
        assert_eq!(port, 3306);
    }

    #[test]
    fn test_assign_untagged_is_skipped() {
        let env = source(&[("", "oops")]);
        let mut value = 7i32;
        Walker::new(&env, &[]).assign(&mut value, "", "").unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_assign_parse_error_names_key() {
        let env = source(&[("APP_PORT", "eighty")]);
        let mut port = 0u16;
        let err = Walker::new(&env, &[])
            .assign(&mut port, "APP_", "PORT")
            .unwrap_err();
        match err {
            Error::Parse { name, type_name, .. } => {
                assert_eq!(name, "APP_PORT");
                assert!(type_name.contains("u16"));
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    struct Unreadable(&'static str);

    impl Source for Unreadable {
        fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
            if key == self.0 {
                return Err(Error::NotUnicode {
                    name: key.to_string(),
                });
            }
            Ok(None)
        }
    }

    #[test]
    fn test_lookup_error_is_returned() {
        let env = Unreadable("APP_SECRET");
        let err = Walker::new(&env, &[])
            .resolve(&parse_tag("SECRET,default=fallback"), "APP_")
            .unwrap_err();
        assert!(matches!(&err, Error::NotUnicode { name } if name == "APP_SECRET"));
    }

    #[test]
    fn test_placeholder_lookup_error_is_returned() {
        let env = Unreadable("HOST");
        let err = Walker::new(&env, &[])
            .resolve(&parse_tag("ADDR,default=${HOST}:80,expand"), "")
            .unwrap_err();
        assert!(matches!(&err, Error::NotUnicode { name } if name == "HOST"));
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("a\n".into()), "a");
        assert_eq!(strip_line_ending("a\r\n".into()), "a");
        assert_eq!(strip_line_ending("a\n\n".into()), "a\n");
        assert_eq!(strip_line_ending("a".into()), "a");
    }
}
