use crate::encoding::encode;
use crate::{Expiration, RemovalCookie, SameSite};
use std::borrow::Cow;
use std::fmt;
use time::format_description::BorrowedFormatItem;
use time::macros::{datetime, format_description};
use time::{OffsetDateTime, UtcOffset};

/// RFC 6265 requires dates not to exceed 9999 years.
const MAX_DATETIME: OffsetDateTime = datetime!(9999-12-31 23:59:59.999_999 UTC);

/// The IMF-fixdate flavour of HTTP-date, from https://www.rfc-editor.org/rfc/rfc7231#section-7.1.1.1.
pub(crate) static HTTP_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT"
);

/// A cookie to be written into the ambient cookie string, together with the
/// write-time attributes that control its lifetime and scope.
///
/// ## Constructing a `SetCookie`
///
/// To construct a cookie with only a name/value, use [`SetCookie::new()`]:
///
/// ```rust
/// use crumb::SetCookie;
///
/// let cookie = SetCookie::new("name", "value");
/// assert_eq!(cookie.to_string(), "name=value;");
/// ```
///
/// ## Building a `SetCookie`
///
/// To set attributes, use `SetCookie`'s `set_*` methods.
///
/// ```rust
/// use crumb::{Expiration, SetCookie};
///
/// let cookie = SetCookie::new("name", "value")
///     .set_expires(Expiration::days(30))
///     .set_domain("www.rust-lang.org")
///     .set_path("/")
///     .set_secure(true);
/// ```
///
/// Names and values are written as they are: percent-encoding is applied by
/// [`CookieStore`] when configured to do so.
///
/// [`CookieStore`]: crate::CookieStore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) value: Cow<'c, str>,
    /// The cookie's expiration, if any.
    pub(crate) expires: Option<Expiration>,
    /// The cookie's domain, if any.
    pub(crate) domain: Option<Cow<'c, str>>,
    /// The cookie's path, if any.
    pub(crate) path: Option<Cow<'c, str>>,
    /// Whether this cookie was marked secure.
    pub(crate) secure: Option<bool>,
    pub(crate) same_site: Option<SameSite>,
}

impl<'c> SetCookie<'c> {
    /// Creates a new [`SetCookie`] with the given name and value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::SetCookie;
    ///
    /// let cookie = SetCookie::new("name", "value");
    /// assert_eq!(cookie.name_value(), ("name", "value"));
    ///
    /// // This is equivalent to `from` with a `(name, value)` tuple:
    /// let cookie = SetCookie::from(("name", "value"));
    /// assert_eq!(cookie.name_value(), ("name", "value"));
    /// ```
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        SetCookie {
            name: name.into(),
            value: value.into(),
            expires: None,
            domain: None,
            path: None,
            secure: None,
            same_site: None,
        }
    }

    /// Returns the name of `self`.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the value of `self`.
    #[inline]
    pub fn value(&self) -> &str {
        self.value.as_ref()
    }

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    #[inline]
    pub fn name_value(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// Returns whether this cookie was marked secure or not. Returns
    /// `Some(true)` when the cookie was explicitly set as secure,
    /// `Some(false)` when `secure` was explicitly set to `false`, and
    /// `None` otherwise.
    #[inline]
    pub fn secure(&self) -> Option<bool> {
        self.secure
    }

    /// Returns the `SameSite` attribute of this cookie if one was specified.
    #[inline]
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }

    /// Returns the `path` of the cookie if one was specified.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `domain` of the cookie if one was specified.
    ///
    /// This does not consider whether the domain is valid; the browser
    /// rejects domains that don't match the document. However, if the domain
    /// starts with a leading `.`, the leading `.` is stripped.
    ///
    /// # Example
    ///
    /// ```
    /// use crumb::SetCookie;
    ///
    /// let mut c = SetCookie::new("name", "value");
    /// assert_eq!(c.domain(), None);
    ///
    /// c = c.set_domain(".crates.io");
    /// assert_eq!(c.domain(), Some("crates.io"));
    ///
    /// // Note that `..crates.io` is not a valid domain.
    /// c = c.set_domain("..crates.io");
    /// assert_eq!(c.domain(), Some(".crates.io"));
    /// ```
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(|domain| domain.strip_prefix('.').unwrap_or(domain))
    }

    /// Returns the [`Expiration`] of the cookie if one was specified.
    #[inline]
    pub fn expires(&self) -> Option<Expiration> {
        self.expires
    }

    /// Returns the absolute expiration date-time that would be written if
    /// `self` were serialized at `now`.
    ///
    /// It returns `None` if the cookie is a session cookie or if the expiration
    /// was not specified. Date-times past the end of year 9999 are clamped.
    ///
    /// # Example
    ///
    /// ```
    /// use crumb::{Expiration, SetCookie};
    /// use crumb::time::{Duration, OffsetDateTime};
    ///
    /// let now = OffsetDateTime::now_utc();
    /// let c = SetCookie::new("name", "value").set_expires(Expiration::days(1));
    /// assert_eq!(c.expires_at(now), Some(now + Duration::days(1)));
    ///
    /// let c = c.set_expires(Expiration::Session);
    /// assert_eq!(c.expires_at(now), None);
    /// ```
    pub fn expires_at(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        self.expires
            .and_then(|e| e.resolve(now))
            .map(|time| std::cmp::min(time, MAX_DATETIME))
    }

    /// Sets the name of `self` to `name`.
    pub fn set_name<N: Into<Cow<'c, str>>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the value of `self` to `value`.
    pub fn set_value<V: Into<Cow<'c, str>>>(mut self, value: V) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the value of `secure` in `self` to `value`. If `value` is `None`,
    /// the field is unset.
    ///
    /// # Example
    ///
    /// ```
    /// use crumb::SetCookie;
    ///
    /// let mut c = SetCookie::new("name", "value");
    /// assert_eq!(c.secure(), None);
    ///
    /// c = c.set_secure(true);
    /// assert_eq!(c.secure(), Some(true));
    ///
    /// c = c.set_secure(None);
    /// assert_eq!(c.secure(), None);
    /// ```
    #[inline]
    pub fn set_secure<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.secure = value.into();
        self
    }

    /// Sets the value of `same_site` in `self` to `value`. If `value` is
    /// `None`, the field is unset.
    ///
    /// If `value` is `SameSite::None`, the `secure` flag is written as well
    /// unless `secure` is explicitly set to `false`.
    ///
    /// ```
    /// use crumb::{SameSite, SetCookie};
    ///
    /// let mut c = SetCookie::new("name", "value").set_same_site(SameSite::Strict);
    /// assert_eq!(c.to_string(), "name=value;samesite=Strict;");
    ///
    /// c = c.set_same_site(SameSite::None);
    /// assert_eq!(c.to_string(), "name=value;samesite=None;secure;");
    ///
    /// c = c.set_secure(false);
    /// assert_eq!(c.to_string(), "name=value;samesite=None;");
    /// ```
    #[inline]
    pub fn set_same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }

    /// Sets the `path` of `self` to `path`.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Unsets the `path` of `self`.
    pub fn unset_path(mut self) -> Self {
        self.path = None;
        self
    }

    /// Sets the `domain` of `self` to `domain`.
    pub fn set_domain<D: Into<Cow<'c, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Unsets the `domain` of `self`.
    pub fn unset_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    /// Sets the expiration of `self`. If `time` is `None`, an
    /// expiration of [`Session`](Expiration::Session) is set.
    ///
    /// # Example
    ///
    /// ```
    /// use crumb::{SetCookie, Expiration};
    /// use crumb::time::{Duration, OffsetDateTime};
    ///
    /// let mut c = SetCookie::new("name", "value");
    /// assert_eq!(c.expires(), None);
    ///
    /// c = c.set_expires(OffsetDateTime::now_utc() + Duration::weeks(52));
    /// assert!(c.expires().is_some());
    ///
    /// c = c.set_expires(Expiration::days(3));
    /// assert_eq!(c.expires(), Some(Expiration::days(3)));
    ///
    /// c = c.set_expires(None);
    /// assert_eq!(c.expires(), Some(Expiration::Session));
    /// ```
    pub fn set_expires<T: Into<Expiration>>(mut self, time: T) -> Self {
        self.expires = Some(time.into());
        self
    }

    /// Unsets the `expires` of `self`.
    pub fn unset_expires(mut self) -> Self {
        self.expires = None;
        self
    }

    /// Turn `self` into a [`RemovalCookie`] with the same name, path and domain.
    pub fn into_removal(self) -> RemovalCookie<'c> {
        let mut c = RemovalCookie::new(self.name);
        if let Some(path) = self.path {
            c = c.set_path(path);
        }
        if let Some(domain) = self.domain {
            c = c.set_domain(domain);
        }
        c
    }

    /// Percent-encode the name and value of `self`.
    pub(crate) fn encoded(self) -> Self {
        let name = encode(&self.name).to_string();
        let value = encode(&self.value).to_string();
        self.set_name(name).set_value(value)
    }

    /// Serialize `self` as an assignment to the ambient cookie string,
    /// resolving relative expirations against `now`.
    pub(crate) fn serialize_at(&self, now: OffsetDateTime) -> Result<String, fmt::Error> {
        use std::fmt::Write;

        let mut out = String::new();
        write!(out, "{}={};", self.name(), self.value())?;

        if let Some(time) = self.expires_at(now) {
            let time = time.to_offset(UtcOffset::UTC);
            write!(
                out,
                "expires={};",
                time.format(&HTTP_DATE).map_err(|_| fmt::Error)?
            )?;
        }

        if let Some(path) = self.path() {
            write!(out, "path={};", path)?;
        }

        if let Some(domain) = self.domain() {
            write!(out, "domain={};", domain)?;
        }

        if let Some(same_site) = self.same_site() {
            write!(out, "samesite={};", same_site)?;
        }

        if self.secure() == Some(true)
            || self.secure().is_none() && self.same_site() == Some(SameSite::None)
        {
            write!(out, "secure;")?;
        }

        Ok(out)
    }
}

impl fmt::Display for SetCookie<'_> {
    /// Formats `self` as an assignment to the ambient cookie string.
    ///
    /// Relative expirations are resolved against the current time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::SetCookie;
    ///
    /// let cookie = SetCookie::new("foo", "bar").set_path("/");
    /// assert_eq!(cookie.to_string(), "foo=bar;path=/;");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.serialize_at(OffsetDateTime::now_utc())?)
    }
}

impl<'a, N, V> From<(N, V)> for SetCookie<'a>
where
    N: Into<Cow<'a, str>>,
    V: Into<Cow<'a, str>>,
{
    fn from((name, value): (N, V)) -> Self {
        SetCookie::new(name, value)
    }
}
