//! Configuration for a [`CookieStore`].
//!
//! Check out the [`StoreConfig`] struct for more information.
//!
//! [`CookieStore`]: crate::CookieStore
use crate::SameSite;

/// `StoreConfig` specifies how a [`CookieStore`] encodes cookies and which
/// attributes it applies to a write when the caller doesn't specify them.
///
/// Check out the documentation for the fields of this struct for more information.
///
/// ```rust
/// use crumb::{CookieStore, MemoryJar, StoreConfig, SameSite};
///
/// let mut config = StoreConfig::default();
/// config.secure = true;
/// config.same_site = Some(SameSite::Strict);
/// let store = CookieStore::with_config(MemoryJar::new(), config);
/// ```
///
/// [`CookieStore`]: crate::CookieStore
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StoreConfig {
    /// If `true`, cookie names and values are automatically:
    ///
    /// - percent-encoded, when written;
    /// - percent-decoded, when read.
    ///
    /// If `false`, cookie values and names are used as is. It is then up to
    /// the caller to make sure they don't contain `;`, `=` or whitespace.
    ///
    /// By default, this field is `true`.
    pub percent_encode: bool,
    /// The `path` used by writes and removals that don't specify one.
    ///
    /// If `None`, the `path` attribute is left out and the browser scopes
    /// the cookie to the directory of the current document. Removing such
    /// a cookie from a different page then requires knowing that directory.
    ///
    /// By default, this field is `Some("/")`.
    pub default_path: Option<String>,
    /// The `domain` used by writes and removals that don't specify one.
    ///
    /// If `None`, cookies are scoped to the current host only.
    ///
    /// By default, this field is `None`.
    pub default_domain: Option<String>,
    /// Whether writes that don't specify `secure` should be restricted to
    /// encrypted transports.
    ///
    /// By default, this field is `false`.
    pub secure: bool,
    /// The `SameSite` attribute for writes that don't specify one.
    ///
    /// By default, this field is `None`: no attribute is written.
    pub same_site: Option<SameSite>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            percent_encode: true,
            default_path: Some("/".to_string()),
            default_domain: None,
            secure: false,
            same_site: None,
        }
    }
}
