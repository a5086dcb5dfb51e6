use crate::encoding::{decode, decode_or_raw, DecodingError};
use crate::Cookie;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
/// The cookies visible in an ambient cookie string, as an ordered mapping
/// from name to value.
///
/// Entries keep the order in which they appear in the cookie string.
/// Names are unique: when the string contains the same name more than once
/// (e.g. two cookies with different paths), the first occurrence wins.
pub struct Cookies<'c> {
    /// Invariant: no two entries share the same name.
    cookies: Vec<Cookie<'c>>,
}

impl<'c> Cookies<'c> {
    /// Creates a new, empty [`Cookies`] map.
    pub fn new() -> Cookies<'c> {
        Default::default()
    }

    /// Inserts a [`Cookie`] into `self`.
    ///
    /// If a cookie with the same name already exists, its value is replaced
    /// and it keeps its position.
    ///
    /// # Return value
    ///
    /// Returns `true` if [`Cookies`] already contained a cookie with the same name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::{Cookie, Cookies};
    ///
    /// let mut cookies = Cookies::new();
    /// assert!(!cookies.insert(Cookie::new("a", "1")));
    /// assert!(!cookies.insert(Cookie::new("b", "2")));
    /// assert!(cookies.insert(Cookie::new("a", "3")));
    ///
    /// let names: Vec<_> = cookies.names().collect();
    /// assert_eq!(names, ["a", "b"]);
    /// assert_eq!(cookies.get("a"), Some("3"));
    /// ```
    pub fn insert<C>(&mut self, cookie: C) -> bool
    where
        C: Into<Cookie<'c>>,
    {
        let cookie = cookie.into();
        match self.cookies.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => {
                existing.value = cookie.value;
                true
            }
            None => {
                self.cookies.push(cookie);
                false
            }
        }
    }

    /// Get the value of a cookie by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.value())
    }

    /// Returns `true` if a cookie named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.iter().any(|c| c.name() == name)
    }

    /// The number of cookies in `self`.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if `self` holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterate over all cookies, in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cookie<'c>> {
        self.cookies.iter()
    }

    /// Iterate over all cookie names, in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cookies.iter().map(|c| c.name())
    }

    /// Converts `self` into a `Cookies` map with a `'static` lifetime.
    pub fn into_owned(self) -> Cookies<'static> {
        Cookies {
            cookies: self.cookies.into_iter().map(Cookie::into_owned).collect(),
        }
    }

    /// Parse an ambient cookie string (e.g. the value of `document.cookie`).
    ///
    /// Parsing never fails:
    ///
    /// - fragments that are not a `name=value` pair, or that have an empty
    ///   name, are skipped;
    /// - names and values that don't percent-decode to valid UTF-8 are kept as is.
    ///
    /// Use [`Cookies::try_parse()`] if you need to know about malformed input.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::Cookies;
    ///
    /// let cookies = Cookies::parse("a=1; flag; b=hello%20world; a=2", true);
    /// assert_eq!(cookies.len(), 2);
    /// assert_eq!(cookies.get("a"), Some("1"));
    /// assert_eq!(cookies.get("b"), Some("hello world"));
    /// ```
    pub fn parse(cookie_string: &'c str, percent_decode: bool) -> Cookies<'c> {
        let mut cookies = Cookies::new();
        for pair in pairs(cookie_string) {
            let (name, value) = match pair {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping a malformed cookie string fragment");
                    continue;
                }
            };
            let cookie = if percent_decode {
                Cookie::new(decode_or_raw(name), decode_or_raw(value))
            } else {
                Cookie::new(name, value)
            };
            cookies.insert_if_absent(cookie);
        }
        cookies
    }

    /// Parse an ambient cookie string, failing on the first malformed fragment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::Cookies;
    ///
    /// let err = Cookies::try_parse("a=1; flag", true).unwrap_err();
    /// assert_eq!(err.to_string(), "Failed to parse the cookie string");
    /// ```
    pub fn try_parse(
        cookie_string: &'c str,
        percent_decode: bool,
    ) -> Result<Cookies<'c>, ParseError> {
        let mut cookies = Cookies::new();
        for pair in pairs(cookie_string) {
            let (name, value) = pair?;
            let cookie = if percent_decode {
                Cookie::new(decode(name)?, decode(value)?)
            } else {
                Cookie::new(name, value)
            };
            cookies.insert_if_absent(cookie);
        }
        Ok(cookies)
    }

    fn insert_if_absent(&mut self, cookie: Cookie<'c>) {
        if !self.contains(cookie.name()) {
            self.cookies.push(cookie);
        }
    }
}

impl<'c> IntoIterator for Cookies<'c> {
    type Item = Cookie<'c>;
    type IntoIter = std::vec::IntoIter<Cookie<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.into_iter()
    }
}

impl<'a, 'c> IntoIterator for &'a Cookies<'c> {
    type Item = &'a Cookie<'c>;
    type IntoIter = std::slice::Iter<'a, Cookie<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.iter()
    }
}

impl<'c, C> FromIterator<C> for Cookies<'c>
where
    C: Into<Cookie<'c>>,
{
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut cookies = Cookies::new();
        for cookie in iter {
            cookies.insert(cookie);
        }
        cookies
    }
}

/// Split an ambient cookie string into raw `(name, value)` pairs.
///
/// Empty fragments are ignored. Names and values are trimmed; the value is
/// everything after the first `=`.
pub(crate) fn pairs(cookie_string: &str) -> impl Iterator<Item = Result<(&str, &str), ParseError>> {
    cookie_string
        .split(';')
        .filter(|fragment| !fragment.chars().all(char::is_whitespace))
        .map(|fragment| {
            let (name, value) = match fragment.split_once('=') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => {
                    let e = MissingPairError {
                        fragment: fragment.trim().to_string(),
                    };
                    return Err(ParseError::MissingPair(e));
                }
            };
            if name.is_empty() {
                let e = EmptyNameError {
                    value: value.to_string(),
                };
                return Err(ParseError::EmptyName(e));
            }
            Ok((name, value))
        })
}

impl From<DecodingError> for ParseError {
    fn from(value: DecodingError) -> Self {
        ParseError::Decoding(value)
    }
}

#[derive(Debug)]
#[non_exhaustive]
/// The error returned by [`Cookies::try_parse()`].
pub enum ParseError {
    MissingPair(MissingPairError),
    EmptyName(EmptyNameError),
    Decoding(DecodingError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse the cookie string")
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::MissingPair(e) => Some(e),
            ParseError::EmptyName(e) => Some(e),
            ParseError::Decoding(e) => Some(e),
        }
    }
}

#[derive(Debug)]
/// A fragment of the cookie string that doesn't contain a name-value separator (`=`).
pub struct MissingPairError {
    fragment: String,
}

impl std::fmt::Display for MissingPairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected a name-value pair, but no `=` was found in `{}`",
            self.fragment
        )
    }
}

impl std::error::Error for MissingPairError {}

#[derive(Debug)]
/// A fragment of the cookie string with an empty name (e.g. `=value`).
pub struct EmptyNameError {
    value: String,
}

impl std::fmt::Display for EmptyNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The name of a cookie cannot be empty, but found an empty name with `{}` as value",
            self.value
        )
    }
}

impl std::error::Error for EmptyNameError {}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use googletest::matcher::{Matcher, MatcherResult};
    use googletest::prelude::{displays_as, eq};

    use crate::Cookies;

    /// E.g. `cookies!("name" => "value", "other" => "key")` builds the
    /// ordered list of expected pairs.
    macro_rules! cookies {
        ($($name:expr => $value:expr),* $(,)?) => {
            {
                #[allow(unused_mut)]
                let mut cookies: Vec<(&str, &str)> = Vec::new();
                $(
                    cookies.push(($name, $value));
                )*
                Ok(cookies)
            }
        };
    }

    #[track_caller]
    fn check_case(
        string: &str,
        percent_decode: bool,
        expected: Result<Vec<(&str, &str)>, Box<dyn Matcher<ActualT = String>>>,
    ) {
        let actual = Cookies::try_parse(string, percent_decode);
        match &actual {
            Ok(actual) => {
                let expected =
                    expected.unwrap_or_else(|_| panic!("Expected a success for {string}"));
                let actual: Vec<_> = actual.iter().map(|c| c.name_value()).collect();
                assert_eq!(actual, expected, "Failed for string: {string}");
            }
            Err(err) => {
                let source = err.source().unwrap().to_string();
                let matcher = expected.expect_err(&format!("Expected an error for {string}"));
                let error = format!(
                    "Expected: {}\n\
                    Actual: {err},\n\
                    {}\n",
                    matcher.describe(MatcherResult::Match),
                    matcher.explain_match(&source)
                );
                assert!(matcher.matches(&source).is_match(), "{error}");
            }
        }
    }

    fn boxed<T>(matcher: impl Matcher<ActualT = T> + 'static) -> Box<dyn Matcher<ActualT = T>> {
        Box::new(matcher)
    }

    fn err_str(s: &'static str) -> Box<dyn Matcher<ActualT = String>> {
        boxed(displays_as(eq(s)))
    }

    #[test]
    fn parse_undecoded() {
        let cases = [
            ("", cookies![]),
            (";;", cookies![]),
            ("name=value", cookies!["name" => "value"]),
            ("a=%20", cookies!["a" => "%20"]),
            ("  name=value  ", cookies!["name" => "value"]),
            ("name=value; other=key", cookies!["name" => "value", "other" => "key"]),
            ("name=value;  ; other=key;; ", cookies!["name" => "value", "other" => "key"]),
            (";a=1 ;  ; b= ", cookies!["a" => "1", "b" => ""]),
            (" ;   a=1 ;  ; ;;c===  ", cookies!["a" => "1", "c" => "=="]),
            ("a=1; a=2", cookies!["a" => "1"]),
            ("b=2; a=1", cookies!["b" => "2", "a" => "1"]),
            (";a=1 ;  ; =v ; c=", Err(err_str("The name of a cookie cannot be empty, but found an empty name with `v` as value"))),
            ("yo", Err(err_str("Expected a name-value pair, but no `=` was found in `yo`"))),
        ];

        for (string, expected) in cases {
            check_case(string, false, expected)
        }
    }

    #[test]
    fn parse_decoded() {
        let cases = [
            ("", cookies![]),
            ("a=%20", cookies!["a" => " "]),
            ("a%20or%20b=1", cookies!["a or b" => "1"]),
            ("k=v%3Bw%3Dx", cookies!["k" => "v;w=x"]),
            ("a=d#$%^&*()_", cookies!["a" => "d#$%^&*()_"]),
            ("a=1; a%3D=2", cookies!["a" => "1", "a=" => "2"]),
            (
                "a=%F1%F2%F3%C0%C1%C2",
                Err(err_str("Failed to percent-decode `%F1%F2%F3%C0%C1%C2`")),
            ),
        ];

        for (string, expected) in cases {
            check_case(string, true, expected)
        }
    }

    #[test]
    fn lenient_parsing_skips_malformed_fragments() {
        let cookies = Cookies::parse("flag; a=1; =orphan; b=%F1%F2; c=%41", true);
        let pairs: Vec<_> = cookies.iter().map(|c| c.name_value()).collect();
        assert_eq!(pairs, [("a", "1"), ("b", "%F1%F2"), ("c", "A")]);
    }

    #[test]
    fn empty_string_is_an_empty_map() {
        let cookies = Cookies::parse("", true);
        assert!(cookies.is_empty());
        assert_eq!(cookies, Cookies::new());
    }

    #[test]
    fn collect_keeps_the_last_value_in_first_position() {
        let cookies: Cookies = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        let pairs: Vec<_> = cookies.iter().map(|c| c.name_value()).collect();
        assert_eq!(pairs, [("a", "3"), ("b", "2")]);
    }
}
