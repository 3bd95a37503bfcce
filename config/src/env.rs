use std::env;

/// Expand `${VAR}` references from the process environment.
///
/// Unset variables expand to the empty string; an unterminated `${` is kept
/// verbatim.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

pub(crate) fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::expand_with;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOST" => Some("example.org".to_string()),
            "PORT" => Some("8080".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expands_known_variables() {
        assert_eq!(
            expand_with("https://${HOST}:${PORT}/", lookup),
            "https://example.org:8080/"
        );
    }

    #[test]
    fn unknown_variables_become_empty() {
        assert_eq!(expand_with("a${NOPE}b", lookup), "ab");
        assert_eq!(expand_with("a${}b", lookup), "ab");
    }

    #[test]
    fn unterminated_reference_is_kept() {
        assert_eq!(expand_with("x${HOST", lookup), "x${HOST");
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(expand_with("Père ${HOST} ≠ E", lookup), "Père example.org ≠ E");
    }
}
