use thiserror::Error;

/// The error type returned by cookiejar's fallible helpers
#[derive(Error, Debug, PartialEq)]
pub enum CookieJarError {
    #[error("`{0}` is not a valid SameSite policy, expected `Strict`, `Lax` or `None`")]
    InvalidSameSite(String),
    #[error("No cookie jar found in the request extensions, is `CookieJarMiddleware` registered?")]
    MissingJar,
}
