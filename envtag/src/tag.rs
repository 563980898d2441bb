//! Parsing of `#[env("...")]` annotation strings.
//!
//! ```text
//! tag      := key-spec ["," option ("," option)*]
//! key-spec := key ("|" key)*
//! option   := "default=" value | "fallback=" value | "required" | "file" | "expand"
//! value    := "[" item ("," item)* "]" | scalar
//! ```

/// Options parsed from one field annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    /// Candidate keys, tried in order; the first one present wins.
    pub keys: Vec<String>,
    /// Raw fallback expression used when no key is present.
    pub fallback: String,
    /// Fail when the value is still empty after fallback and expansion.
    pub required: bool,
    /// Treat the looked-up value as a path and read the file behind it.
    pub file: bool,
    /// Substitute `${NAME}` / `$NAME` placeholders.
    pub expand: bool,
}

impl FieldSpec {
    /// First declared key, used in error messages.
    pub fn primary_key(&self) -> &str {
        self.keys.first().map(String::as_str).unwrap_or_default()
    }
}

/// Parse an annotation string into a [`FieldSpec`].
///
/// Never fails. Unknown options are ignored so that newer annotations keep
/// working with older versions of the parser.
pub fn parse_tag(tag: &str) -> FieldSpec {
    let (key_spec, options) = match tag.split_once(',') {
        Some((keys, options)) => (keys, Some(options)),
        None => (tag, None),
    };

    let mut spec = FieldSpec {
        keys: key_spec.split('|').map(str::to_string).collect(),
        ..FieldSpec::default()
    };

    if let Some(options) = options {
        for option in split_options(options) {
            apply_option(&mut spec, option.trim());
        }
    }

    spec
}

/// Prefix for the fields of a nested struct tagged `tag` under `prefix`.
///
/// Only the key-spec becomes part of the prefix; options after the first
/// comma do not apply to a nested struct and are dropped. An empty key-spec
/// keeps the parent's prefix.
pub(crate) fn nested_prefix(prefix: &str, tag: &str) -> String {
    let key_spec = tag.split_once(',').map_or(tag, |(keys, _)| keys);
    if key_spec.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}{key_spec}_")
    }
}

/// Split on commas that are not nested inside `[...]`.
fn split_options(options: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in options.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&options[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&options[start..]);

    parts
}

fn apply_option(spec: &mut FieldSpec, option: &str) {
    if let Some(value) = option
        .strip_prefix("default=")
        .or_else(|| option.strip_prefix("fallback="))
    {
        spec.fallback = strip_brackets(value).to_string();
        return;
    }

    match option {
        "required" => spec.required = true,
        "file" => spec.file = true,
        "expand" => spec.expand = true,
        _ => {}
    }
}

fn strip_brackets(value: &str) -> &str {
    value
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(value)
}
