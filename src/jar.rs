//! The seam between [`CookieStore`] and the environment that owns the
//! ambient cookie string.
//!
//! [`CookieStore`]: crate::CookieStore
use std::rc::Rc;

/// Read and write access to an ambient cookie string.
///
/// A jar behaves like `document.cookie`:
///
/// - [`CookieJar::read`] returns every cookie currently visible, serialized as
///   `name1=value1; name2=value2`.
/// - [`CookieJar::write`] takes **one** cookie assignment, `name=value;` followed
///   by its attributes, and merges it into the string. It doesn't replace the
///   whole string.
///
/// The crate ships two implementations: [`DocumentJar`], backed by the
/// browser, and [`MemoryJar`], an in-memory emulation.
///
/// [`DocumentJar`]: crate::DocumentJar
/// [`MemoryJar`]: crate::MemoryJar
pub trait CookieJar {
    /// Returns the current ambient cookie string.
    fn read(&self) -> Result<String, UnavailableContext>;

    /// Merges a single serialized cookie assignment into the ambient cookie string.
    ///
    /// The environment is free to ignore the write (e.g. because of size
    /// limits, or a domain that doesn't match the document); that is not
    /// reported as an error.
    fn write(&self, cookie: &str) -> Result<(), UnavailableContext>;
}

impl<J: CookieJar + ?Sized> CookieJar for &J {
    fn read(&self) -> Result<String, UnavailableContext> {
        (**self).read()
    }

    fn write(&self, cookie: &str) -> Result<(), UnavailableContext> {
        (**self).write(cookie)
    }
}

impl<J: CookieJar + ?Sized> CookieJar for Rc<J> {
    fn read(&self) -> Result<String, UnavailableContext> {
        (**self).read()
    }

    fn write(&self, cookie: &str) -> Result<(), UnavailableContext> {
        (**self).write(cookie)
    }
}

impl<J: CookieJar + ?Sized> CookieJar for Box<J> {
    fn read(&self) -> Result<String, UnavailableContext> {
        (**self).read()
    }

    fn write(&self, cookie: &str) -> Result<(), UnavailableContext> {
        (**self).write(cookie)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("There is no document cookie context in this environment")]
/// The ambient cookie string doesn't exist, e.g. because the code is not
/// running in a browser.
pub struct UnavailableContext;
