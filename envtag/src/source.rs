//! Where variable values come from

use std::collections::{BTreeMap, HashMap};
use std::env::{self, VarError};
use std::{fs, io};

use crate::error::Error;

/// A source of environment variables.
///
/// The walker never touches the process environment directly; it asks a
/// `Source`. Use [`ProcessEnv`] for the real environment or a map in tests.
pub trait Source {
    /// Value of `key`, or `None` when it is not present.
    ///
    /// A value that is present but cannot be represented as a `String` is an
    /// error, never a substitute value.
    fn lookup(&self, key: &str) -> Result<Option<String>, Error>;

    /// Content of the file at `path`, used by fields marked `file`.
    fn read_file(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        // Keys with `=` or NUL make `env::var` panic on some platforms
        if key.is_empty() || key.contains(['=', '\0']) {
            return Ok(None);
        }
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(Error::NotUnicode {
                name: key.to_string(),
            }),
        }
    }
}

impl Source for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get(key).cloned())
    }
}

impl Source for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get(key).cloned())
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn lookup(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).lookup(key)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        (**self).read_file(path)
    }
}
