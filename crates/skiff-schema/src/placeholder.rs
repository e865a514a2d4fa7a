//! Tokenizer for `#{id}` and `#{id:key}` placeholder tokens.
//!
//! Tokens are found by splitting on the literal `#{` and the first `}` that
//! follows it; no regular expression is built from an id, so ids are compared
//! byte-for-byte. Expansion is a single left-to-right pass and the expanded
//! text is never scanned again.

/// A placeholder token found in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub id: &'a str,
    pub key: Option<&'a str>,
}

/// Interpret the text between `#{` and `}` as a token.
///
/// `inner` never contains `}`. Returns `None` for text that is not a
/// well-formed token: a `{` anywhere, an empty key, or more than one `:`.
pub fn parse_token(inner: &str) -> Option<Token<'_>> {
    if inner.contains('{') {
        return None;
    }
    match inner.split_once(':') {
        None => Some(Token {
            id: inner,
            key: None,
        }),
        Some((_, key)) if key.is_empty() || key.contains(':') => None,
        Some((id, key)) => Some(Token { id, key: Some(key) }),
    }
}

/// Replace every token for which `resolve` returns `Some`.
///
/// Tokens `resolve` declines (returns `Ok(None)`) and malformed tokens are
/// copied through untouched. The first error aborts the whole expansion.
pub fn expand_with<E, F>(value: &str, mut resolve: F) -> Result<String, E>
where
    F: FnMut(Token<'_>) -> Result<Option<String>, E>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("#{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        if let Some(end) = after.find('}') {
            if let Some(token) = parse_token(&after[..end]) {
                if let Some(expansion) = resolve(token)? {
                    out.push_str(&expansion);
                    rest = &after[end + 1..];
                    continue;
                }
            }
        }

        out.push_str("#{");
        rest = after;
    }

    out.push_str(rest);
    Ok(out)
}

/// Collect every well-formed token in `value`, in order of appearance.
pub fn tokens(value: &str) -> Vec<Token<'_>> {
    let mut found = Vec::new();
    let mut rest = value;
    while let Some(start) = rest.find("#{") {
        let after = &rest[start + 2..];
        match after.find('}').and_then(|end| Some((end, parse_token(&after[..end])?))) {
            Some((end, token)) => {
                found.push(token);
                rest = &after[end + 1..];
            }
            None => rest = after,
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(value: &str) -> String {
        expand_with(value, |t| {
            Ok::<_, ()>(Some(match t.key {
                Some(k) => format!("[{}/{}]", t.id.to_uppercase(), k),
                None => format!("[{}]", t.id.to_uppercase()),
            }))
        })
        .unwrap()
    }

    #[test]
    fn parses_plain_and_keyed_tokens() {
        assert_eq!(
            parse_token("node"),
            Some(Token {
                id: "node",
                key: None
            })
        );
        assert_eq!(
            parse_token("node:npm"),
            Some(Token {
                id: "node",
                key: Some("npm")
            })
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(parse_token("node:"), None);
        assert_eq!(parse_token("a:b:c"), None);
        assert_eq!(parse_token("a{b"), None);
    }

    #[test]
    fn expands_all_tokens_in_one_pass() {
        assert_eq!(upper("#{a} and #{b:c}!"), "[A] and [B/c]!");
    }

    #[test]
    fn malformed_text_is_copied_through() {
        assert_eq!(upper("#{unclosed"), "#{unclosed");
        assert_eq!(upper("#{a:}"), "#{a:}");
        assert_eq!(upper("{a} #a #"), "{a} #a #");
        assert_eq!(upper("#{#{a}}"), "#{[A]}");
    }

    #[test]
    fn expansion_is_not_rescanned() {
        let out = expand_with("#{a}", |_| Ok::<_, ()>(Some("#{a}".to_owned()))).unwrap();
        assert_eq!(out, "#{a}");
    }

    #[test]
    fn declined_tokens_are_left_alone() {
        let out = expand_with("#{a} #{b}", |t| {
            Ok::<_, ()>((t.id == "b").then(|| "B".to_owned()))
        })
        .unwrap();
        assert_eq!(out, "#{a} B");
    }

    #[test]
    fn errors_abort_expansion() {
        let result = expand_with("#{a} #{b}", |t| {
            if t.id == "b" {
                Err(t.id.to_owned())
            } else {
                Ok(None)
            }
        });
        assert_eq!(result.unwrap_err(), "b");
    }

    #[test]
    fn tokens_lists_well_formed_tokens() {
        let found = tokens("#{a} #{bad:} #{b:k} #{c");
        let ids: Vec<&str> = found.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(found[1].key, Some("k"));
    }
}
