use std::fmt;

/// The `SameSite` cookie attribute.
///
/// It restricts when the browser attaches the cookie to cross-site requests:
///
/// - `Strict`: never.
/// - `Lax`: only for top-level navigations using "safe" HTTP methods.
/// - `None`: always, but only if the cookie is also `secure`.
///
/// When a [`SetCookie`] uses `SameSite::None`, the `secure` flag is emitted
/// as well unless `secure` was explicitly set to `false`.
///
/// [`SetCookie`]: crate::SetCookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SameSite {
    #[cfg_attr(feature = "serde", serde(alias = "strict"))]
    Strict,
    #[cfg_attr(feature = "serde", serde(alias = "lax"))]
    Lax,
    #[cfg_attr(feature = "serde", serde(alias = "none"))]
    None,
}

impl SameSite {
    /// Returns the attribute value as written into the cookie string.
    ///
    /// ```rust
    /// use crumb::SameSite;
    ///
    /// assert_eq!(SameSite::Lax.as_str(), "Lax");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match *self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<SameSite> {
        if s.eq_ignore_ascii_case("strict") {
            Some(SameSite::Strict)
        } else if s.eq_ignore_ascii_case("lax") {
            Some(SameSite::Lax)
        } else if s.eq_ignore_ascii_case("none") {
            Some(SameSite::None)
        } else {
            None
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
