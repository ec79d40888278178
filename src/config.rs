//! Jar level defaults and the configuration they are resolved from
use biscotti::SameSite;
use serde::{Deserialize, Deserializer};

use crate::error::CookieJarError;

/// Fully resolved defaults a [CookieJar](crate::CookieJar) applies to cookies it creates.
#[derive(Debug, Clone, PartialEq)]
pub struct JarDefaults {
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl JarDefaults {
    pub fn new<P: Into<String>>(path: P, domain: Option<String>, secure: bool, same_site: SameSite) -> Self {
        JarDefaults {
            path: path.into(),
            domain,
            secure,
            same_site,
        }
    }
}

impl Default for JarDefaults {
    fn default() -> Self {
        JarDefaults {
            path: "/".to_string(),
            domain: None,
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

/// Application level configuration for the jar defaults.
///
/// Every field is optional. Unset fields are filled in per request by [JarConfig::resolve]:
/// path `/`, no domain (host-only), `Secure` when the request came over HTTPS and `SameSite=Lax`.
///
/// ```
/// use cookiejar::{JarConfig, SameSite};
///
/// let config = JarConfig::new().path("/app").same_site(SameSite::Strict);
/// let defaults = config.resolve(true);
///
/// assert_eq!(defaults.path, "/app");
/// assert!(defaults.secure);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JarConfig {
    path: Option<String>,
    domain: Option<String>,
    secure: Option<bool>,
    #[serde(deserialize_with = "deserialize_same_site")]
    same_site: Option<SameSite>,
}

impl JarConfig {
    pub fn new() -> Self {
        Self::default()
    }
    #[inline]
    pub fn path<T: Into<String>>(mut self, path: T) -> Self {
        self.path = Some(path.into());
        self
    }
    #[inline]
    pub fn domain<T: Into<String>>(mut self, domain: T) -> Self {
        self.domain = Some(domain.into());
        self
    }
    #[inline]
    pub fn secure<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.secure = value.into();
        self
    }
    #[inline]
    pub fn same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }

    /// Fill in the unset fields. `secure_transport` is only consulted when `secure` was not configured.
    pub fn resolve(&self, secure_transport: bool) -> JarDefaults {
        JarDefaults {
            path: non_empty(&self.path).unwrap_or("/").to_string(),
            domain: non_empty(&self.domain).map(str::to_string),
            secure: self.secure.unwrap_or(secure_transport),
            same_site: self.same_site.unwrap_or(SameSite::Lax),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Interpret a CGI style `HTTPS` value.
///
/// Secure only when the value is present and is neither empty, `0` nor `off` (in any case).
pub fn secure_from_https_flag(value: Option<&str>) -> bool {
    match value {
        Some("") | Some("0") | None => false,
        Some(value) => !value.eq_ignore_ascii_case("off"),
    }
}

/// Parse a SameSite policy name, ignoring case
pub fn parse_same_site(value: &str) -> Result<SameSite, CookieJarError> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" => Ok(SameSite::None),
        _ => Err(CookieJarError::InvalidSameSite(value.to_string())),
    }
}

fn deserialize_same_site<'de, D>(deserializer: D) -> Result<Option<SameSite>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|v| parse_same_site(&v))
        .transpose()
        .map_err(serde::de::Error::custom)
}
