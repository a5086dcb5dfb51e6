use std::borrow::Cow;

use time::OffsetDateTime;

use crate::cookies::pairs;
use crate::encoding::decode_or_raw;
use crate::{CookieJar, Cookies, DocumentJar, RemovalCookie, SetCookie, StoreConfig};

/// Structured access to an ambient cookie string.
///
/// `CookieStore` holds no state of its own: every operation reads or writes
/// the underlying [`CookieJar`]. In a browser, that's [`DocumentJar`]
/// (`document.cookie`); in tests, you'll usually inject a [`MemoryJar`].
///
/// # Failures
///
/// No operation returns an error. If the jar reports that there is no
/// cookie context (e.g. the code is not running in a browser), reads behave as
/// if there were no cookies and writes are dropped with a warning.
///
/// # Example
///
/// ```rust
/// use crumb::{CookieStore, Expiration, MemoryJar, SetCookie};
///
/// let store = CookieStore::new(MemoryJar::new());
///
/// store.set(("session", "abc123"));
/// store.set(SetCookie::new("theme", "dark mode").set_expires(Expiration::days(30)));
///
/// assert!(store.exists("session"));
/// assert_eq!(store.get("theme"), "dark mode");
/// assert_eq!(store.get_all().len(), 2);
///
/// store.delete("session");
/// assert!(!store.exists("session"));
/// ```
///
/// [`MemoryJar`]: crate::MemoryJar
#[derive(Debug, Clone)]
pub struct CookieStore<J = DocumentJar> {
    jar: J,
    config: StoreConfig,
}

impl CookieStore<DocumentJar> {
    /// A store over `document.cookie`, with the default configuration.
    pub fn document() -> Self {
        Self::new(DocumentJar)
    }
}

impl Default for CookieStore<DocumentJar> {
    fn default() -> Self {
        Self::document()
    }
}

impl<J: CookieJar> CookieStore<J> {
    /// Creates a store over `jar` with the default [`StoreConfig`].
    pub fn new(jar: J) -> Self {
        Self::with_config(jar, StoreConfig::default())
    }

    /// Creates a store over `jar` with a custom [`StoreConfig`].
    pub fn with_config(jar: J, config: StoreConfig) -> Self {
        CookieStore { jar, config }
    }

    /// The underlying jar.
    pub fn jar(&self) -> &J {
        &self.jar
    }

    /// The configuration of `self`.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns `true` if a cookie named `name` is currently visible.
    ///
    /// Names are compared after percent-decoding.
    /// It returns `false` if there is no cookie context.
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns the decoded value of the cookie named `name`.
    ///
    /// An absent cookie and a cookie with an empty value both yield `""`:
    /// use [`CookieStore::exists()`] or [`CookieStore::lookup()`] to tell
    /// them apart.
    ///
    /// ```rust
    /// use crumb::{CookieStore, MemoryJar};
    ///
    /// let store = CookieStore::new(MemoryJar::new());
    /// store.set(("empty", ""));
    ///
    /// assert_eq!(store.get("empty"), "");
    /// assert_eq!(store.get("missing"), "");
    /// assert_eq!(store.lookup("empty").as_deref(), Some(""));
    /// assert_eq!(store.lookup("missing"), None);
    /// ```
    pub fn get(&self, name: &str) -> String {
        self.lookup(name).unwrap_or_default()
    }

    /// Returns the decoded value of the cookie named `name`, or `None` if
    /// there is no such cookie.
    ///
    /// If the cookie string holds the name more than once, the first
    /// occurrence wins. Values that don't decode to valid UTF-8 are returned
    /// as they appear in the cookie string.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let cookie_string = self.read()?;
        let value = pairs(&cookie_string)
            .filter_map(Result::ok)
            .find(|(raw_name, _)| self.decode(raw_name) == name)
            .map(|(_, raw_value)| self.decode(raw_value).into_owned());
        value
    }

    /// Returns all visible cookies, decoded, in document order.
    ///
    /// It returns an empty map if there are no cookies or no cookie context.
    /// Malformed fragments of the cookie string are skipped.
    pub fn get_all(&self) -> Cookies<'static> {
        match self.read() {
            Some(cookie_string) => {
                Cookies::parse(&cookie_string, self.config.percent_encode).into_owned()
            }
            None => Cookies::new(),
        }
    }

    /// Writes a cookie.
    ///
    /// Attributes that `cookie` doesn't specify are taken from the [`StoreConfig`]:
    ///
    /// - no `expires` makes a session cookie;
    /// - no `path` uses [`StoreConfig::default_path`] (`/` by default);
    /// - no `domain` uses [`StoreConfig::default_domain`] (current host only by default);
    /// - no `secure` uses [`StoreConfig::secure`];
    /// - no `same_site` uses [`StoreConfig::same_site`].
    ///
    /// Setting a name that already exists in the same scope overwrites its value
    /// and attributes.
    ///
    /// ```rust
    /// use crumb::{CookieStore, Expiration, MemoryJar, SetCookie};
    /// use crumb::time::{Duration, OffsetDateTime};
    ///
    /// let store = CookieStore::new(MemoryJar::new());
    ///
    /// store.set(("a", "1"));
    /// store.set(SetCookie::new("b", "2").set_expires(Expiration::days(7)));
    /// store.set(
    ///     SetCookie::new("c", "3")
    ///         .set_expires(OffsetDateTime::now_utc() + Duration::hours(1))
    ///         .set_secure(true),
    /// );
    /// assert_eq!(store.get_all().len(), 3);
    ///
    /// // Already expired: nothing is stored.
    /// store.set(SetCookie::new("temp", "x").set_expires(Expiration::days(-1)));
    /// assert!(!store.exists("temp"));
    /// ```
    pub fn set<'c, C>(&self, cookie: C)
    where
        C: Into<SetCookie<'c>>,
    {
        let cookie = self.apply_defaults(cookie.into());
        self.write(&self.encode(cookie));
    }

    /// Removes a cookie, by writing it with an empty value and an expiration in the past.
    ///
    /// # Scope
    ///
    /// The path and domain **must** match those used when the cookie was
    /// created, otherwise the environment keeps the cookie. Defaults for path
    /// and domain are taken from the [`StoreConfig`], as for
    /// [`CookieStore::set()`], so cookies written and removed without an
    /// explicit scope match.
    ///
    /// ```rust
    /// use crumb::{CookieStore, MemoryJar, RemovalCookie, SetCookie};
    ///
    /// let store = CookieStore::new(MemoryJar::for_document("localhost", "/app/home"));
    /// store.set(SetCookie::new("a", "1").set_path("/app"));
    ///
    /// // Wrong path: `/` is used by default, so nothing happens.
    /// store.delete("a");
    /// assert!(store.exists("a"));
    ///
    /// store.delete(RemovalCookie::new("a").set_path("/app"));
    /// assert!(!store.exists("a"));
    /// ```
    pub fn delete<'c, C>(&self, cookie: C)
    where
        C: Into<RemovalCookie<'c>>,
    {
        let removal: RemovalCookie<'c> = cookie.into();
        let cookie = self.apply_defaults(SetCookie::from(removal));
        // Remove the cookie under the name it is stored with, which may have
        // been written by a different encoder.
        let cookie = match self.raw_name(cookie.name()) {
            Some(raw_name) => cookie.set_name(raw_name),
            None => self.encode(cookie),
        };
        self.write(&cookie);
    }

    /// Removes every visible cookie, using `path` and `domain` as the scope
    /// of each removal.
    ///
    /// Only cookies created with the same scope are actually removed: cookies
    /// whose path or domain differ stay in place.
    ///
    /// ```rust
    /// use crumb::{CookieStore, MemoryJar};
    ///
    /// let store = CookieStore::new(MemoryJar::new());
    /// store.set(("a", "1"));
    /// store.set(("b", "2"));
    ///
    /// store.delete_all(None, None);
    /// assert!(store.get_all().is_empty());
    /// ```
    pub fn delete_all(&self, path: Option<&str>, domain: Option<&str>) {
        let Some(cookie_string) = self.read() else {
            return;
        };
        let mut raw_names: Vec<&str> = Vec::new();
        for (raw_name, _) in pairs(&cookie_string).filter_map(Result::ok) {
            if !raw_names.contains(&raw_name) {
                raw_names.push(raw_name);
            }
        }
        for raw_name in raw_names {
            let mut removal = RemovalCookie::new(raw_name);
            if let Some(path) = path {
                removal = removal.set_path(path);
            }
            if let Some(domain) = domain {
                removal = removal.set_domain(domain);
            }
            // Raw names are written back as they are, without encoding.
            self.write(&self.apply_defaults(SetCookie::from(removal)));
        }
    }

    /// The name, as it appears in the cookie string, of the first cookie
    /// whose decoded name is `name`.
    fn raw_name(&self, name: &str) -> Option<String> {
        let cookie_string = self.read()?;
        let raw_name = pairs(&cookie_string)
            .filter_map(Result::ok)
            .find(|(raw_name, _)| self.decode(raw_name) == name)
            .map(|(raw_name, _)| raw_name.to_owned());
        raw_name
    }

    fn encode<'c>(&self, cookie: SetCookie<'c>) -> SetCookie<'c> {
        if self.config.percent_encode {
            cookie.encoded()
        } else {
            cookie
        }
    }

    fn apply_defaults<'c>(&self, mut cookie: SetCookie<'c>) -> SetCookie<'c> {
        if cookie.path.is_none() {
            cookie.path = self.config.default_path.clone().map(Cow::Owned);
        }
        if cookie.domain.is_none() {
            cookie.domain = self.config.default_domain.clone().map(Cow::Owned);
        }
        if cookie.secure.is_none() && self.config.secure {
            cookie.secure = Some(true);
        }
        if cookie.same_site.is_none() {
            cookie.same_site = self.config.same_site;
        }
        cookie
    }

    fn decode<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.config.percent_encode {
            decode_or_raw(raw)
        } else {
            Cow::Borrowed(raw)
        }
    }

    fn read(&self) -> Option<String> {
        match self.jar.read() {
            Ok(cookie_string) => Some(cookie_string),
            Err(e) => {
                tracing::debug!(error = %e, "Reading cookies without a cookie context");
                None
            }
        }
    }

    fn write(&self, cookie: &SetCookie<'_>) {
        if cookie.name().is_empty() {
            tracing::debug!("Skipping a cookie write with an empty name");
            return;
        }
        let serialized = match cookie.serialize_at(OffsetDateTime::now_utc()) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!(error = %e, cookie = cookie.name(), "Failed to serialize a cookie");
                return;
            }
        };
        tracing::trace!(cookie = %serialized, "Writing a cookie");
        if let Err(e) = self.jar.write(&serialized) {
            tracing::warn!(
                error = %e,
                cookie = cookie.name(),
                "Dropping a cookie write without a cookie context"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use googletest::prelude::*;
    use time::{Duration, OffsetDateTime};

    use crate::jar::UnavailableContext;
    use crate::{
        CookieJar, CookieStore, DocumentJar, Expiration, MemoryJar, RemovalCookie, SameSite,
        SetCookie, StoreConfig,
    };

    /// A jar that serves a fixed cookie string and records writes.
    #[derive(Default)]
    struct StaticJar {
        cookie_string: String,
        writes: RefCell<Vec<String>>,
    }

    impl StaticJar {
        fn new(cookie_string: &str) -> Self {
            StaticJar {
                cookie_string: cookie_string.to_string(),
                writes: RefCell::default(),
            }
        }
    }

    impl CookieJar for StaticJar {
        fn read(&self) -> std::result::Result<String, UnavailableContext> {
            Ok(self.cookie_string.clone())
        }

        fn write(&self, cookie: &str) -> std::result::Result<(), UnavailableContext> {
            self.writes.borrow_mut().push(cookie.to_string());
            Ok(())
        }
    }

    fn store() -> CookieStore<MemoryJar> {
        CookieStore::new(MemoryJar::new())
    }

    #[test]
    fn session_cookie_roundtrip() {
        let store = store();
        assert!(!store.exists("session"));

        store.set(("session", "abc123"));

        assert_eq!(store.get("session"), "abc123");
        assert!(store.exists("session"));
        assert_eq!(store.jar().expiry_of("session"), None);
    }

    #[test]
    fn values_needing_encoding_roundtrip() {
        let store = store();
        let cases = [
            ("semi", "a;b"),
            ("equals", "a=b=c"),
            ("spaces", "  padded value  "),
            ("percent", "100%"),
            ("unicode", "crème brûlée ☕"),
            ("comma", "a,b"),
            ("quotes", "\"quoted\""),
            ("name with = and ;", "value"),
        ];
        for (name, value) in cases {
            store.set((name, value));
        }
        for (name, value) in cases {
            assert_eq!(store.get(name), value, "Failed for {name}");
        }
        assert!(store.jar().read().unwrap().contains("name%20with%20%3D%20and%20%3B=value"));
    }

    #[test]
    fn get_all_returns_decoded_pairs_in_order() {
        let store = store();
        store.set(("pre", "existing"));
        store.set(("a", "1"));
        store.set(("b", "2"));

        let cookies = store.get_all();
        let pairs: Vec<_> = cookies.iter().map(|c| c.name_value()).collect();
        assert_eq!(pairs, [("pre", "existing"), ("a", "1"), ("b", "2")]);
    }

    #[test]
    fn get_all_on_an_empty_string_is_empty() {
        let store = CookieStore::new(StaticJar::new(""));
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn malformed_fragments_are_skipped() {
        let store = CookieStore::new(StaticJar::new("flag; a=1; =v; b=x%20y; a=2"));

        let cookies = store.get_all();
        let pairs: Vec<_> = cookies.iter().map(|c| c.name_value()).collect();
        assert_eq!(pairs, [("a", "1"), ("b", "x y")]);

        assert!(!store.exists("flag"));
        assert_eq!(store.get("a"), "1");
    }

    #[test]
    fn names_are_compared_decoded() {
        // `!` is left alone by some encoders and escaped by others.
        let store = CookieStore::new(StaticJar::new("hi%21=1; bye!=2"));
        assert!(store.exists("hi!"));
        assert!(store.exists("bye!"));
        assert_eq!(store.get("bye!"), "2");
    }

    #[test]
    fn cookies_written_by_other_encoders_can_be_deleted() {
        let jar = MemoryJar::new();
        for assignment in ["hi%21=1", "bye!=2", "it's=3", "raw%F1=4"] {
            jar.write(assignment).unwrap();
        }
        let store = CookieStore::new(&jar);
        assert!(store.exists("hi!"));
        assert!(store.exists("bye!"));
        assert!(store.exists("raw%F1"));

        store.delete("bye!");
        assert!(!store.exists("bye!"));
        store.delete("hi!");
        assert!(!store.exists("hi!"));
        store.delete("raw%F1");
        assert!(!store.exists("raw%F1"));

        assert_eq!(jar.read().unwrap(), "it's=3");
    }

    #[test]
    fn delete_all_removes_cookies_written_by_other_encoders() {
        let jar = MemoryJar::new();
        for assignment in ["bye!=2", "it's=3", "raw%F1=4", "plain=5"] {
            jar.write(assignment).unwrap();
        }
        let store = CookieStore::new(&jar);

        store.delete_all(None, None);

        assert!(store.get_all().is_empty());
        assert_eq!(jar.read().unwrap(), "");
    }

    #[test]
    fn cookies_with_an_empty_name_are_not_written() {
        let store = CookieStore::new(StaticJar::new(""));
        store.set(("", "value"));
        store.delete("");
        assert!(store.jar().writes.borrow().is_empty());
    }

    #[test]
    fn undecodable_values_are_returned_raw() {
        let store = CookieStore::new(StaticJar::new("a=%F1%F2"));
        assert_eq!(store.get("a"), "%F1%F2");
    }

    #[test]
    fn delete_removes_the_cookie() {
        let store = store();
        store.set(("a", "1"));
        store.delete("a");
        assert!(!store.exists("a"));
        assert_eq!(store.lookup("a"), None);
    }

    #[test]
    fn delete_needs_the_creation_scope() {
        let store = CookieStore::new(MemoryJar::for_document("app.example.com", "/app/page"));
        store.set(
            SetCookie::new("a", "1")
                .set_path("/app")
                .set_domain("example.com"),
        );

        store.delete("a");
        store.delete(RemovalCookie::new("a").set_path("/app"));
        assert!(store.exists("a"));

        store.delete(
            RemovalCookie::new("a")
                .set_path("/app")
                .set_domain("example.com"),
        );
        assert!(!store.exists("a"));
    }

    #[test]
    fn delete_all_clears_cookies_sharing_the_scope() {
        let store = store();
        store.set(("a", "1"));
        store.set(("b", "2"));
        store.set(SetCookie::new("c", "3").set_expires(Expiration::days(1)));

        store.delete_all(None, None);

        assert!(store.get_all().is_empty());
    }

    #[test]
    fn delete_all_leaves_cookies_with_another_scope() {
        let store = CookieStore::new(MemoryJar::for_document("localhost", "/app/page"));
        store.set(("root", "1"));
        store.set(SetCookie::new("scoped", "2").set_path("/app"));

        store.delete_all(None, None);

        let names: Vec<_> = store.get_all().names().map(str::to_owned).collect();
        assert_eq!(names, ["scoped"]);

        store.delete_all(Some("/app"), None);
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn expired_cookies_are_not_stored() {
        let store = store();
        store.set(SetCookie::new("temp", "x").set_expires(Expiration::days(-1)));
        assert!(!store.exists("temp"));

        store.set(("temp", "x"));
        store.set(SetCookie::new("temp", "y").set_expires(Expiration::days(-1)));
        assert!(!store.exists("temp"));
    }

    #[test]
    fn day_count_expiration() {
        let store = store();
        let days = 3;
        let expected = OffsetDateTime::now_utc() + Duration::milliseconds(days * 86_400_000);

        store.set(SetCookie::new("d", "v").set_expires(Expiration::days(days)));

        let actual = store.jar().expiry_of("d").unwrap();
        assert!((expected - actual).abs() <= Duration::seconds(1));
    }

    #[test]
    fn absolute_expiration() {
        let store = CookieStore::new(StaticJar::new(""));
        let expires = time::macros::datetime!(2099-10-21 07:28:00 UTC);

        store.set(SetCookie::new("a", "1").set_expires(expires));

        let writes = store.jar().writes.borrow();
        assert_that!(
            writes[0],
            contains_substring("expires=Wed, 21 Oct 2099 07:28:00 GMT;")
        );
    }

    #[test]
    fn default_attributes_follow_the_config() {
        let store = CookieStore::new(StaticJar::new(""));
        store.set(("a", "b c"));
        store.delete("a");
        assert_eq!(
            *store.jar().writes.borrow(),
            [
                "a=b%20c;path=/;",
                "a=;expires=Thu, 01 Jan 1970 00:00:00 GMT;path=/;",
            ]
        );

        let mut config = StoreConfig::default();
        config.default_path = None;
        config.default_domain = Some("example.com".to_string());
        config.secure = true;
        config.same_site = Some(SameSite::Lax);
        let store = CookieStore::with_config(StaticJar::new(""), config);
        store.set(("a", "1"));
        store.set(SetCookie::new("b", "2").set_path("/x").set_secure(false));
        assert_eq!(
            *store.jar().writes.borrow(),
            [
                "a=1;domain=example.com;samesite=Lax;secure;",
                "b=2;path=/x;domain=example.com;samesite=Lax;",
            ]
        );
    }

    #[test]
    fn percent_encoding_can_be_disabled() {
        let mut config = StoreConfig::default();
        config.percent_encode = false;
        let store = CookieStore::with_config(MemoryJar::new(), config);

        store.set(("a", "x%20y"));
        assert_eq!(store.get("a"), "x%20y");
        assert_eq!(store.jar().read().unwrap(), "a=x%20y");
    }

    #[test]
    fn secure_flag_reaches_the_jar() {
        let store = store();
        store.set(SetCookie::new("s", "1").set_secure(true));
        store.set(("p", "1"));
        assert_eq!(store.jar().is_secure("s"), Some(true));
        assert_eq!(store.jar().is_secure("p"), Some(false));
    }

    #[test]
    fn unavailable_context_degrades_gracefully() {
        let store = CookieStore::document();

        assert!(!store.exists("a"));
        assert_eq!(store.get("a"), "");
        assert_eq!(store.lookup("a"), None);
        assert!(store.get_all().is_empty());

        // Writes are dropped, not panics.
        store.set(("a", "1"));
        store.delete("a");
        store.delete_all(None, None);
        assert!(store.jar().read().is_err());
    }

    #[test]
    fn document_jar_reports_unavailable_context() {
        let err = DocumentJar.write("a=1;").unwrap_err();
        assert_that!(
            err,
            displays_as(eq("There is no document cookie context in this environment"))
        );
    }

    #[test]
    fn jars_can_be_shared() {
        let jar = MemoryJar::new();
        let first = CookieStore::new(&jar);
        let second = CookieStore::new(&jar);

        first.set(("a", "1"));

        assert_eq!(second.get("a"), "1");
        assert_eq!(jar.len(), 1);
    }
}
