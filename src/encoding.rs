use std::borrow::Cow;

use anyhow::Context;
use percent_encoding::{percent_decode_str, AsciiSet, NON_ALPHANUMERIC};

/// https://www.rfc-editor.org/rfc/rfc3986#section-2.3
///
/// Everything outside of the unreserved set is escaped, including `=`, `;`,
/// `,`, whitespace and `%` itself.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a cookie name or value.
pub(crate) fn encode(string: &str) -> impl std::fmt::Display + '_ {
    percent_encoding::utf8_percent_encode(string, UNRESERVED)
}

/// Percent-decode a cookie name or value.
///
/// Malformed escape sequences (e.g. a lone `%`) are kept verbatim; the only
/// failure mode is a decoded byte sequence that is not valid UTF-8.
pub(crate) fn decode(string: &str) -> Result<Cow<'_, str>, DecodingError> {
    percent_decode_str(string)
        .decode_utf8()
        .context("The percent-decoded bytes are not valid UTF-8")
        .map_err(|e| DecodingError {
            raw_value: string.to_string(),
            source: e,
        })
}

/// Percent-decode `string`, falling back to the raw text if it doesn't decode.
pub(crate) fn decode_or_raw(string: &str) -> Cow<'_, str> {
    match decode(string) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!(error = %e, "Using the raw cookie text as is");
            Cow::Borrowed(string)
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to percent-decode `{raw_value}`")]
/// An error that occurred while decoding a percent-encoded cookie name or value.
pub struct DecodingError {
    pub(crate) raw_value: String,
    #[source]
    pub(crate) source: anyhow::Error,
}

impl DecodingError {
    /// The text that failed to decode, as it appeared in the cookie string.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_or_raw, encode};
    use googletest::prelude::*;

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(encode("a b").to_string(), "a%20b");
        assert_eq!(encode("k=v; x").to_string(), "k%3Dv%3B%20x");
        assert_eq!(encode("100%").to_string(), "100%25");
        assert_eq!(encode("a,b").to_string(), "a%2Cb");
        assert_eq!(encode("safe-._~AZaz09").to_string(), "safe-._~AZaz09");
    }

    #[test]
    fn non_ascii_is_escaped_as_utf8() {
        assert_eq!(encode("é").to_string(), "%C3%A9");
        assert_eq!(decode("%C3%A9").unwrap(), "é");
    }

    #[test]
    fn lenient_decoding() {
        // A lone `%` is not an escape sequence.
        assert_eq!(decode("50%").unwrap(), "50%");
        // Characters a legacy encoder left alone decode to themselves.
        assert_eq!(decode("it's(ok)!").unwrap(), "it's(ok)!");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let err = decode("%F1%F2%F3%C0%C1%C2").unwrap_err();
        assert_that!(err, displays_as(eq("Failed to percent-decode `%F1%F2%F3%C0%C1%C2`")));
        assert_eq!(decode_or_raw("%F1%F2%F3%C0%C1%C2"), "%F1%F2%F3%C0%C1%C2");
    }
}
