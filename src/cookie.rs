use std::borrow::Cow;

/// A cookie as it can be read back from the ambient cookie string:
/// a name and a (decoded) value.
///
/// Attributes such as `path` or `expires` are write-only and therefore not
/// part of a `Cookie`.
///
/// ```rust
/// use crumb::Cookie;
///
/// let cookie = Cookie::new("name", "value");
/// assert_eq!(cookie.to_string(), "name=value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cookie<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) value: Cow<'c, str>,
}

impl<'c> Cookie<'c> {
    /// Creates a new [`Cookie`] with the given `name` and `value`.
    pub fn new<N, V>(name: N, value: V) -> Cookie<'c>
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        Cookie {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the name of this cookie.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of this cookie.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::Cookie;
    ///
    /// let cookie = Cookie::new("name", "value");
    /// assert_eq!(cookie.value(), "value");
    /// ```
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    pub fn name_value(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// Converts `self` into a `Cookie` with a `'static` lifetime with as few
    /// allocations as possible.
    pub fn into_owned(self) -> Cookie<'static> {
        Cookie {
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
        }
    }
}

impl std::fmt::Display for Cookie<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl<'c, N, V> From<(N, V)> for Cookie<'c>
where
    N: Into<Cow<'c, str>>,
    V: Into<Cow<'c, str>>,
{
    fn from((name, value): (N, V)) -> Self {
        Cookie::new(name, value)
    }
}
