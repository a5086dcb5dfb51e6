use crate::SetCookie;
use std::borrow::Cow;
use std::fmt::Debug;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A [`SetCookie`] that, when written, removes the cookie with the same
/// name, path and domain from the ambient cookie string, if it exists.
///
/// # Scope
///
/// The browser only removes a cookie if **both** path and domain match those
/// used when the cookie was created. A `RemovalCookie` with the wrong scope is
/// silently ignored by the environment.
///
/// ```rust
/// use crumb::{RemovalCookie, SetCookie};
///
/// let removal = RemovalCookie::new("session").set_path("/app");
/// let raw: SetCookie = removal.into();
/// assert_eq!(raw.to_string(), "session=;expires=Thu, 01 Jan 1970 00:00:00 GMT;path=/app;");
/// ```
pub struct RemovalCookie<'c> {
    /// The cookie's name.
    pub(crate) name: Cow<'c, str>,
    /// The cookie's domain, if any.
    pub(crate) domain: Option<Cow<'c, str>>,
    /// The cookie's path, if any.
    pub(crate) path: Option<Cow<'c, str>>,
}

impl<'c> RemovalCookie<'c> {
    /// Creates a new [`RemovalCookie`] with the given name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::RemovalCookie;
    ///
    /// let removal = RemovalCookie::new("name")
    ///     .set_path("/");
    /// assert_eq!(removal.name(), "name");
    /// assert_eq!(removal.path(), Some("/"));
    /// assert_eq!(removal.domain(), None);
    /// ```
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Cow<'c, str>>,
    {
        Self {
            name: name.into(),
            domain: None,
            path: None,
        }
    }

    /// Returns the name of `self`.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the path of the [`RemovalCookie`] if one was specified.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the domain of the [`RemovalCookie`] if one was specified,
    /// without its leading `.`.
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(|domain| domain.strip_prefix('.').unwrap_or(domain))
    }

    /// Sets the path property of the removal cookie to `path`.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Unsets the `path` property of the removal cookie.
    pub fn unset_path(mut self) -> Self {
        self.path = None;
        self
    }

    /// Sets the `domain` of `self` to `domain`.
    ///
    /// # Example
    ///
    /// ```
    /// use crumb::RemovalCookie;
    ///
    /// let mut c = RemovalCookie::new("name");
    /// assert_eq!(c.domain(), None);
    ///
    /// c = c.set_domain("rust-lang.org");
    /// assert_eq!(c.domain(), Some("rust-lang.org"));
    ///
    /// c = c.unset_domain();
    /// assert_eq!(c.domain(), None);
    /// ```
    pub fn set_domain<D: Into<Cow<'c, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Unsets the `domain` of `self`.
    pub fn unset_domain(mut self) -> Self {
        self.domain = None;
        self
    }
}

impl<'c> From<RemovalCookie<'c>> for SetCookie<'c> {
    fn from(value: RemovalCookie<'c>) -> Self {
        let mut c = SetCookie::new(value.name, "");
        if let Some(domain) = value.domain {
            c = c.set_domain(domain);
        }
        if let Some(path) = value.path {
            c = c.set_path(path);
        }
        // A date in the past: the browser drops the cookie as soon as it's written.
        c.set_expires(OffsetDateTime::UNIX_EPOCH)
    }
}

impl<'a> From<&'a str> for RemovalCookie<'a> {
    fn from(value: &'a str) -> RemovalCookie<'a> {
        RemovalCookie::new(value)
    }
}

impl From<String> for RemovalCookie<'static> {
    fn from(value: String) -> RemovalCookie<'static> {
        RemovalCookie::new(value)
    }
}
