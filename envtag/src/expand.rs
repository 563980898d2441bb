//! `${NAME}` / `$NAME` placeholder substitution

/// Replace every placeholder in `input` with `resolve(NAME)`.
///
/// Substituted text is not scanned again. A `$` that does not start a valid
/// placeholder, and an unterminated `${`, are copied through unchanged. The
/// first error from `resolve` aborts the substitution.
pub(crate) fn expand<F, E>(input: &str, mut resolve: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<String, E>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) if is_name(&braced[..end]) => {
                    out.push_str(&resolve(&braced[..end])?);
                    rest = &braced[end + 1..];
                }
                _ => {
                    out.push('$');
                    rest = after;
                }
            }
            continue;
        }

        let len = after
            .find(|c: char| !is_name_char(c))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&resolve(&after[..len])?);
        }
        rest = &after[len..];
    }
    out.push_str(rest);

    Ok(out)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_name_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn run(input: &str) -> String {
        expand(input, |name| Ok::<_, Infallible>(env(name))).unwrap()
    }

    fn env(name: &str) -> String {
        match name {
            "HOST" => "localhost".into(),
            "PORT" => "8080".into(),
            "LOOP" => "${HOST}".into(),
            _ => String::new(),
        }
    }

    #[test]
    fn test_braced() {
        assert_eq!(run("http://${HOST}:${PORT}/api"), "http://localhost:8080/api");
    }

    #[test]
    fn test_bare() {
        assert_eq!(run("http://$HOST:$PORT/api"), "http://localhost:8080/api");
    }

    #[test]
    fn test_missing_becomes_empty() {
        assert_eq!(run("http://${NOPE}:$NADA/api"), "http://:/api");
    }

    #[test]
    fn test_not_recursive() {
        assert_eq!(run("$LOOP"), "${HOST}");
    }

    #[test]
    fn test_literal_dollars() {
        assert_eq!(run("cost: $5 $"), "cost:  $");
        assert_eq!(run("a $-b"), "a $-b");
        assert_eq!(run("${HOST"), "${HOST");
        assert_eq!(run("${}"), "${}");
    }

    #[test]
    fn test_resolve_error_aborts() {
        let mut seen = Vec::new();
        let result = expand("$A-$B-$C", |name| {
            seen.push(name.to_string());
            if name == "B" {
                Err("bad placeholder")
            } else {
                Ok(name.to_lowercase())
            }
        });
        assert_eq!(result, Err("bad placeholder"));
        assert_eq!(seen, ["A", "B"]);
    }

    #[test]
    fn test_no_placeholders() {
        assert_eq!(run("plain value"), "plain value");
    }
}
