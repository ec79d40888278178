//! The cookie value held by a [CookieJar](crate::CookieJar)
use biscotti::{Processor, ProcessorConfig, ResponseCookie, ResponseCookies};
use std::fmt;

/// An outgoing cookie together with its encoding flag.
///
/// The attributes live in a [biscotti::ResponseCookie]. A cookie always has a path: one built
/// without a path, or with an empty one, is keyed and sent with `Path=/`.
#[derive(Debug, Clone)]
pub struct Cookie {
    inner: ResponseCookie<'static>,
    raw: bool,
}

impl Cookie {
    /// Wrap a response cookie whose value should be percent-encoded on the way out
    pub fn new(cookie: ResponseCookie<'static>) -> Self {
        Self::with_raw(cookie, false)
    }

    /// Wrap a response cookie, choosing whether its name and value skip percent-encoding
    pub fn with_raw(cookie: ResponseCookie<'static>, raw: bool) -> Self {
        let has_path = cookie.path().is_some_and(|path| !path.is_empty());
        let inner = if has_path { cookie } else { cookie.set_path("/") };
        Cookie { inner, raw }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn value(&self) -> &str {
        self.inner.value()
    }

    pub fn path(&self) -> &str {
        self.inner.path().unwrap_or("/")
    }

    pub fn domain(&self) -> Option<&str> {
        self.inner.domain()
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn as_response_cookie(&self) -> &ResponseCookie<'static> {
        &self.inner
    }

    pub fn into_response_cookie(self) -> ResponseCookie<'static> {
        self.inner
    }

    /// Render the value of the `Set-Cookie` header for this cookie
    pub fn header_value(&self) -> String {
        let mut config = ProcessorConfig::default();
        config.percent_encode = !self.raw;
        let processor: Processor = config.into();

        let mut cookies = ResponseCookies::new();
        cookies.insert(self.inner.clone());

        cookies.header_values(&processor).next().unwrap_or_default()
    }
}

impl From<ResponseCookie<'static>> for Cookie {
    fn from(cookie: ResponseCookie<'static>) -> Self {
        Cookie::new(cookie)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_value())
    }
}
