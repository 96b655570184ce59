use anyhow::{Context, Result};
use serde::Serialize;

/// A request body prepared for signing.
pub struct CanonicalBody {
    /// Serialized JSON as it goes on the wire.
    pub serialized: Vec<u8>,
    /// Whitespace-stripped text that enters the signing payload.
    pub canonical: String,
}

/// Serializes `value` in field declaration order and derives the signing
/// text from it.
pub fn canonicalize<T: Serialize>(value: &T) -> Result<CanonicalBody> {
    let serialized = serde_json::to_vec(value).context("serializing request body")?;
    let canonical = canonicalize_raw(&serialized);
    Ok(CanonicalBody {
        serialized,
        canonical,
    })
}

/// Signing text for a body that is forwarded byte-for-byte.
pub fn canonicalize_raw(body: &[u8]) -> String {
    strip_whitespace(&String::from_utf8_lossy(body))
}

/// Removes every space, tab and newline, string contents included.
///
/// The backend applies the same literal removal before verifying, so this
/// must not become a structural minifier.
pub fn strip_whitespace(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Ordered {
        zeta: u32,
        alpha: &'static str,
    }

    #[test]
    fn amount_body_is_compact() {
        let body = canonicalize(&json!({"amount": 100})).unwrap();
        assert_eq!(body.canonical, r#"{"amount":100}"#);
        assert_eq!(body.serialized, br#"{"amount":100}"#.to_vec());
    }

    #[test]
    fn struct_fields_keep_declaration_order() {
        let body = canonicalize(&Ordered { zeta: 1, alpha: "a" }).unwrap();
        assert_eq!(body.canonical, r#"{"zeta":1,"alpha":"a"}"#);
    }

    #[test]
    fn whitespace_inside_strings_is_stripped_for_signing_only() {
        let body = canonicalize(&json!({"memo": "two words"})).unwrap();
        assert_eq!(body.canonical, r#"{"memo":"twowords"}"#);
        assert_eq!(body.serialized, br#"{"memo":"two words"}"#.to_vec());
    }

    #[test]
    fn strips_space_tab_and_newline_only() {
        assert_eq!(strip_whitespace("a b\tc\nd\re"), "abcd\re");
    }

    #[test]
    fn stripping_is_idempotent() {
        let once = strip_whitespace("{ \"a\" :\n\t1 }");
        assert_eq!(strip_whitespace(&once), once);
    }

    #[test]
    fn raw_body_is_stripped_verbatim() {
        let raw = b"{\n  \"currency\": \"BTC\",\n  \"limit\": 5\n}";
        assert_eq!(canonicalize_raw(raw), r#"{"currency":"BTC","limit":5}"#);
    }

    #[test]
    fn empty_raw_body_is_empty() {
        assert_eq!(canonicalize_raw(b""), "");
    }
}
