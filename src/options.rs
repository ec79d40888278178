use biscotti::{Expiration, SameSite, time::SignedDuration};
use std::borrow::Cow;

/// Per-cookie fields for [CookieJar::create](crate::CookieJar::create) and friends.
///
/// Unset `path`, `domain`, `secure` and `same_site` fall back to the jar defaults.
/// `http_only` defaults to `true`, `raw` to `false` and the expiry to a session cookie.
#[derive(Debug, Clone, Default)]
pub struct CookieOptions<'c> {
    pub(crate) path: Option<Cow<'c, str>>,
    pub(crate) domain: Option<Cow<'c, str>>,
    pub(crate) secure: Option<bool>,
    pub(crate) http_only: Option<bool>,
    pub(crate) raw: Option<bool>,
    pub(crate) same_site: Option<SameSite>,
    pub(crate) max_age: Option<SignedDuration>,
    pub(crate) expires: Option<Expiration>,
}

impl<'c> CookieOptions<'c> {
    pub fn new() -> Self {
        Self::default()
    }
    #[inline]
    pub fn path<T: Into<Cow<'c, str>>>(mut self, path: T) -> Self {
        self.path = Some(path.into());
        self
    }
    #[inline]
    pub fn domain<T: Into<Cow<'c, str>>>(mut self, domain: T) -> Self {
        self.domain = Some(domain.into());
        self
    }
    #[inline]
    pub fn secure<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.secure = value.into();
        self
    }
    #[inline]
    pub fn http_only<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.http_only = value.into();
        self
    }
    /// Skip percent-encoding when the cookie is written to the response
    #[inline]
    pub fn raw<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.raw = value.into();
        self
    }
    #[inline]
    pub fn same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }
    #[inline]
    pub fn max_age<T: Into<Option<SignedDuration>>>(mut self, value: T) -> Self {
        self.max_age = value.into();
        self
    }
    #[inline]
    pub fn expires<T: Into<Option<Expiration>>>(mut self, value: T) -> Self {
        self.expires = value.into();
        self
    }

    /// The given path or domain unless it is missing or empty
    pub(crate) fn non_empty<'a>(value: &'a Option<Cow<'c, str>>) -> Option<&'a str> {
        value.as_deref().filter(|v| !v.is_empty())
    }
}
