use std::cell::RefCell;

use time::{Duration, OffsetDateTime, PrimitiveDateTime};

use crate::jar::{CookieJar, UnavailableContext};
use crate::set_cookie::HTTP_DATE;
use crate::SameSite;

/// An in-memory [`CookieJar`] that behaves like `document.cookie` for a
/// document at a given host and path.
///
/// It follows the browser's storage rules (RFC 6265, section 5.3):
///
/// - a cookie is identified by its name, domain and path: writing the same
///   triple again replaces the previous value;
/// - writing a cookie whose expiration is not in the future removes the
///   matching cookie, if any, and stores nothing;
/// - a missing `path` defaults to the directory of the document's path;
/// - a `domain` that doesn't match the document's host is rejected.
///
/// Reads only return cookies that are visible from the document (matching
/// domain and path, not expired), more specific paths first.
///
/// ```rust
/// use crumb::{CookieJar, MemoryJar};
///
/// let jar = MemoryJar::new();
/// jar.write("a=1;path=/;").unwrap();
/// jar.write("b=2;path=/;").unwrap();
/// assert_eq!(jar.read().unwrap(), "a=1; b=2");
///
/// // An expiration in the past deletes the cookie.
/// jar.write("a=;expires=Thu, 01 Jan 1970 00:00:00 GMT;path=/;").unwrap();
/// assert_eq!(jar.read().unwrap(), "b=2");
/// ```
#[derive(Debug)]
pub struct MemoryJar {
    host: String,
    path: String,
    cookies: RefCell<Vec<StoredCookie>>,
}

#[derive(Debug, Clone)]
struct StoredCookie {
    name: String,
    value: String,
    domain: String,
    host_only: bool,
    path: String,
    expires: Option<OffsetDateTime>,
    secure: bool,
    same_site: Option<SameSite>,
}

impl StoredCookie {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

impl MemoryJar {
    /// A jar for a document at `http://localhost/`.
    pub fn new() -> Self {
        Self::for_document("localhost", "/")
    }

    /// A jar for a document served from `host` at `path`.
    ///
    /// ```rust
    /// use crumb::{CookieJar, MemoryJar};
    ///
    /// let jar = MemoryJar::for_document("app.example.com", "/admin/users");
    /// // No `path`: the cookie is scoped to `/admin`.
    /// jar.write("a=1;").unwrap();
    /// jar.write("b=2;domain=example.com;path=/;").unwrap();
    /// // Rejected: the domain doesn't match the document's host.
    /// jar.write("c=3;domain=rust-lang.org;").unwrap();
    /// assert_eq!(jar.read().unwrap(), "a=1; b=2");
    /// ```
    pub fn for_document<H, P>(host: H, path: P) -> Self
    where
        H: Into<String>,
        P: Into<String>,
    {
        MemoryJar {
            host: host.into().to_ascii_lowercase(),
            path: path.into(),
            cookies: RefCell::new(Vec::new()),
        }
    }

    /// The number of cookies visible from the document.
    pub fn len(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        self.cookies
            .borrow()
            .iter()
            .filter(|c| self.is_visible(c, now))
            .count()
    }

    /// Returns `true` if no cookie is visible from the document.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The expiration of the first visible cookie with the given raw name.
    ///
    /// It returns `None` if there is no such cookie, or if it is a session cookie.
    pub fn expiry_of(&self, name: &str) -> Option<OffsetDateTime> {
        self.inspect(name, |c| c.expires)
    }

    /// Whether the first visible cookie with the given raw name was marked secure.
    pub fn is_secure(&self, name: &str) -> Option<bool> {
        self.inspect(name, |c| Some(c.secure))
    }

    /// The `SameSite` attribute of the first visible cookie with the given raw name.
    pub fn same_site_of(&self, name: &str) -> Option<SameSite> {
        self.inspect(name, |c| c.same_site)
    }

    fn inspect<T>(&self, name: &str, f: impl FnOnce(&StoredCookie) -> Option<T>) -> Option<T> {
        let now = OffsetDateTime::now_utc();
        self.visible(now)
            .into_iter()
            .find(|c| c.name == name)
            .and_then(|c| f(&c))
    }

    /// The cookies visible from the document at `now`, in read order.
    fn visible(&self, now: OffsetDateTime) -> Vec<StoredCookie> {
        let mut visible: Vec<_> = self
            .cookies
            .borrow()
            .iter()
            .filter(|c| self.is_visible(c, now))
            .cloned()
            .collect();
        // Stable: cookies with paths of equal length keep their creation order.
        visible.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        visible
    }

    fn is_visible(&self, cookie: &StoredCookie, now: OffsetDateTime) -> bool {
        let domain_ok = if cookie.host_only {
            self.host == cookie.domain
        } else {
            domain_match(&self.host, &cookie.domain)
        };
        domain_ok && path_match(&self.path, &cookie.path) && !cookie.is_expired(now)
    }

    fn parse_assignment(&self, cookie: &str, now: OffsetDateTime) -> Option<StoredCookie> {
        let mut fragments = cookie.split(';');
        let (name, value) = match fragments.next().and_then(|pair| pair.split_once('=')) {
            Some((name, value)) => (name.trim(), value.trim()),
            None => {
                tracing::debug!(cookie, "Ignoring a cookie assignment without a name-value pair");
                return None;
            }
        };
        if name.is_empty() {
            tracing::debug!(cookie, "Ignoring a cookie assignment with an empty name");
            return None;
        }

        let mut expires = None;
        let mut max_age = None;
        let mut domain = None;
        let mut path = None;
        let mut secure = false;
        let mut same_site = None;
        for attribute in fragments {
            let (key, value) = match attribute.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (attribute.trim(), ""),
            };
            if key.eq_ignore_ascii_case("expires") {
                match PrimitiveDateTime::parse(value, &HTTP_DATE) {
                    Ok(datetime) => expires = Some(datetime.assume_utc()),
                    Err(e) => {
                        tracing::debug!(error = %e, value, "Ignoring an unparseable `expires` attribute")
                    }
                }
            } else if key.eq_ignore_ascii_case("max-age") {
                if let Ok(seconds) = value.parse::<i64>() {
                    max_age = Some(now.saturating_add(Duration::seconds(seconds)));
                }
            } else if key.eq_ignore_ascii_case("domain") {
                let value = value.strip_prefix('.').unwrap_or(value);
                if !value.is_empty() {
                    domain = Some(value.to_ascii_lowercase());
                }
            } else if key.eq_ignore_ascii_case("path") {
                if value.starts_with('/') {
                    path = Some(value.to_string());
                }
            } else if key.eq_ignore_ascii_case("secure") {
                secure = true;
            } else if key.eq_ignore_ascii_case("samesite") {
                same_site = SameSite::parse(value);
            }
        }

        let (domain, host_only) = match domain {
            Some(domain) if domain_match(&self.host, &domain) => (domain, false),
            Some(domain) => {
                tracing::debug!(
                    %domain,
                    host = %self.host,
                    "Rejecting a cookie whose domain doesn't match the document"
                );
                return None;
            }
            None => (self.host.clone(), true),
        };

        Some(StoredCookie {
            name: name.to_string(),
            value: value.to_string(),
            domain,
            host_only,
            path: path.unwrap_or_else(|| default_path(&self.path).to_string()),
            // `max-age` wins over `expires`.
            expires: max_age.or(expires),
            secure,
            same_site,
        })
    }
}

impl Default for MemoryJar {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieJar for MemoryJar {
    fn read(&self) -> Result<String, UnavailableContext> {
        let now = OffsetDateTime::now_utc();
        let pairs: Vec<_> = self
            .visible(now)
            .into_iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        Ok(pairs.join("; "))
    }

    fn write(&self, cookie: &str) -> Result<(), UnavailableContext> {
        let now = OffsetDateTime::now_utc();
        let Some(new) = self.parse_assignment(cookie, now) else {
            return Ok(());
        };

        let mut cookies = self.cookies.borrow_mut();
        let existing = cookies
            .iter()
            .position(|c| c.name == new.name && c.domain == new.domain && c.path == new.path);
        match (existing, new.is_expired(now)) {
            (Some(i), true) => {
                cookies.remove(i);
            }
            (None, true) => {}
            (Some(i), false) => cookies[i] = new,
            (None, false) => cookies.push(new),
        }
        Ok(())
    }
}

/// https://www.rfc-editor.org/rfc/rfc6265#section-5.1.3
fn domain_match(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// https://www.rfc-editor.org/rfc/rfc6265#section-5.1.4
fn default_path(document_path: &str) -> &str {
    if !document_path.starts_with('/') {
        return "/";
    }
    match document_path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &document_path[..i],
    }
}

/// https://www.rfc-editor.org/rfc/rfc6265#section-5.1.4
fn path_match(request_path: &str, cookie_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}
