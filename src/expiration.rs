use time::{Duration, OffsetDateTime};

/// When a cookie should expire.
///
/// An `Expiration` is constructible with `Expiration::from()` via any of:
///
///   * `None` -> `Expiration::Session`
///   * `Some(OffsetDateTime)` -> `Expiration::DateTime`
///   * `OffsetDateTime` -> `Expiration::DateTime`
///
/// Relative expirations are built with [`Expiration::days()`] or
/// [`Expiration::after()`].
///
/// ```rust
/// use crumb::Expiration;
/// use crumb::time::{Duration, OffsetDateTime};
///
/// let expires = Expiration::from(None);
/// assert_eq!(expires, Expiration::Session);
///
/// let now = OffsetDateTime::now_utc();
/// let expires = Expiration::from(now);
/// assert_eq!(expires, Expiration::DateTime(now));
///
/// let expires = Expiration::days(7);
/// assert_eq!(expires, Expiration::After(Duration::days(7)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// The cookie expires at a specific date-time.
    DateTime(OffsetDateTime),
    /// The cookie expires once the given amount of time has elapsed,
    /// counting from the moment it is written.
    /// A negative duration yields an expiration in the past.
    After(Duration),
    /// Expiration for a "session" cookie. Browsers define the notion of a
    /// "session" and will automatically expire session cookies when they deem
    /// the "session" to be over. This is typically, but need not be, when the
    /// browser is closed.
    Session,
}

impl Expiration {
    /// An expiration `days` days after the cookie is written.
    ///
    /// A day is exactly 86,400 seconds. Negative values produce a cookie that
    /// is already expired when written. Day counts too large to represent
    /// saturate.
    pub fn days(days: i64) -> Self {
        Expiration::After(Duration::seconds(days.saturating_mul(86_400)))
    }

    /// An expiration `duration` after the cookie is written.
    pub fn after(duration: Duration) -> Self {
        Expiration::After(duration)
    }

    /// Returns `true` if `self` is an `Expiration::Session`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::Expiration;
    ///
    /// assert!(Expiration::Session.is_session());
    /// assert!(!Expiration::days(1).is_session());
    /// ```
    pub fn is_session(&self) -> bool {
        match self {
            Expiration::DateTime(_) | Expiration::After(_) => false,
            Expiration::Session => true,
        }
    }

    /// Resolves `self` into an absolute date-time, using `now` as the
    /// reference point for relative expirations.
    ///
    /// It returns `None` for session cookies.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crumb::Expiration;
    /// use crumb::time::{Duration, OffsetDateTime};
    ///
    /// let now = OffsetDateTime::now_utc();
    /// assert_eq!(Expiration::days(2).resolve(now), Some(now + Duration::days(2)));
    /// assert_eq!(Expiration::from(now).resolve(now), Some(now));
    /// assert_eq!(Expiration::Session.resolve(now), None);
    /// ```
    pub fn resolve(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        match *self {
            Expiration::Session => None,
            Expiration::DateTime(v) => Some(v),
            Expiration::After(d) => Some(now.saturating_add(d)),
        }
    }
}

impl<T: Into<Option<OffsetDateTime>>> From<T> for Expiration {
    fn from(option: T) -> Self {
        match option.into() {
            Some(value) => Expiration::DateTime(value),
            None => Expiration::Session,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::Expiration;

    #[test]
    fn days_are_whole_multiples_of_a_day() {
        assert_eq!(Expiration::days(2), Expiration::After(Duration::hours(48)));
        assert_eq!(Expiration::days(-1), Expiration::After(Duration::seconds(-86_400)));
    }

    #[test]
    fn huge_day_counts_saturate() {
        let now = datetime!(2026-10-19 12:00 UTC);
        assert_eq!(Expiration::days(i64::MAX), Expiration::After(Duration::seconds(i64::MAX)));
        assert_eq!(Expiration::days(i64::MIN), Expiration::After(Duration::seconds(i64::MIN)));
        assert!(Expiration::days(i64::MAX).resolve(now).is_some());
    }
}
