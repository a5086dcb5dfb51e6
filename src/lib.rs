//! A crate to read and write browser cookies through the `document.cookie` string.
//!
//! # Overview
//!
//! `document.cookie` is a single string, owned by the browser, that packs every cookie
//! visible from the current page (`a=1; b=2`). Reading it means parsing it; writing to it
//! means assigning **one** cookie at a time, attributes included.
//!
//! `crumb` gives you structured access to that string via [`CookieStore`]:
//!
//! - Check, get or enumerate cookies, via [`CookieStore::exists`], [`CookieStore::get`]
//!   and [`CookieStore::get_all`]
//! - Write cookies with an expiration, path, domain, `secure` flag or `SameSite`
//!   attribute, via [`CookieStore::set`] and [`SetCookie`]
//! - Remove one or all cookies, via [`CookieStore::delete`] and [`CookieStore::delete_all`]
//!
//! In particular:
//!
//! - Cookie names and values are percent-encoded/decoded by default (but you can opt out)
//! - Reads never fail: if there is no cookie context (e.g. during server-side rendering),
//!   there are simply no cookies
//! - The ambient cookie string is behind the [`CookieJar`] trait, so that you can test your
//!   code with [`MemoryJar`] instead of a browser
//!
//! # Non-goals
//!
//! `crumb` doesn't protect the integrity or confidentiality of cookie values, nor does it
//! handle `Cookie`/`Set-Cookie` headers on the server side.
//!
//! # Quickstart
//!
//! ```rust
//! use crumb::{CookieStore, Expiration, MemoryJar, RemovalCookie, SetCookie};
//!
//! // In a browser, use `CookieStore::document()` (requires the `wasm` feature).
//! let store = CookieStore::new(MemoryJar::new());
//!
//! // A session cookie, scoped to `/` by default.
//! store.set(("session", "abc123"));
//! // A cookie that expires in 30 days.
//! store.set(SetCookie::new("theme", "dark; high contrast").set_expires(Expiration::days(30)));
//!
//! assert_eq!(store.get("session"), "abc123");
//! assert_eq!(store.get("theme"), "dark; high contrast");
//! assert!(!store.exists("missing"));
//!
//! let names: Vec<_> = store.get_all().names().map(str::to_owned).collect();
//! assert_eq!(names, ["session", "theme"]);
//!
//! // Removals must use the same path and domain as the cookie they remove.
//! store.delete(RemovalCookie::new("session").set_path("/"));
//! assert!(!store.exists("session"));
//!
//! store.delete_all(None, None);
//! assert!(store.get_all().is_empty());
//! ```
//!
//! # Features
//!
//! - `serde` (default): `Deserialize` for [`StoreConfig`] and [`SameSite`]
//! - `wasm`: binds [`DocumentJar`] to `document.cookie` when compiling for `wasm32`
//!
//! ## Credits
//!
//! `crumb` borrows its cookie model and its encoding rules from the
//! [`biscotti` crate](https://crates.io/crates/biscotti).
pub mod config;
mod cookie;
mod cookies;
mod document;
mod encoding;
mod expiration;
pub mod jar;
mod memory;
mod removal;
mod same_site;
mod set_cookie;
mod store;

pub use crate::expiration::*;
pub use crate::same_site::*;
pub use config::StoreConfig;
pub use cookie::Cookie;
pub use cookies::Cookies;
pub use document::DocumentJar;
pub use jar::CookieJar;
pub use memory::MemoryJar;
pub use removal::RemovalCookie;
pub use set_cookie::SetCookie;
pub use store::CookieStore;
pub use time;

/// Errors that can occur when using `crumb`.
pub mod errors {
    pub use crate::cookies::{EmptyNameError, MissingPairError, ParseError};
    pub use crate::encoding::DecodingError;
    pub use crate::jar::UnavailableContext;
}
