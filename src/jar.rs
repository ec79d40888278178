//! cookiejar's core functionality
use crate::config::JarDefaults;
use crate::cookie::Cookie;
use crate::options::CookieOptions;
use biscotti::time::{SignedDuration, Timestamp, tz::TimeZone};
use biscotti::{Expiration, ResponseCookie};
use std::collections::BTreeMap;

/// How long a cookie built by [CookieJar::forever] lives, roughly five years
pub const FOREVER_SECONDS: i64 = 157_680_000;

/// Outgoing cookies collected while handling a single request.
///
/// Cookies are keyed by name and path: adding a cookie with a name and path that is already
/// present replaces the earlier one. Iteration goes by name, then by path, both ascending.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    defaults: JarDefaults,
    cookies: BTreeMap<String, BTreeMap<String, Cookie>>,
}

impl CookieJar {
    pub fn new(defaults: JarDefaults) -> Self {
        CookieJar {
            defaults,
            cookies: BTreeMap::new(),
        }
    }

    pub fn defaults(&self) -> &JarDefaults {
        &self.defaults
    }

    /// Every stored cookie in iteration order
    pub fn all(&self) -> Vec<&Cookie> {
        self.iter().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values().flat_map(|paths| paths.values())
    }

    /// Every cookie stored under `name`, across all paths.
    ///
    /// Returns `None` rather than an empty `Vec` when nothing is stored under `name`.
    /// # Example
    /// ```
    /// use cookiejar::{CookieJar, CookieOptions};
    ///
    /// let mut jar = CookieJar::default();
    /// jar.add_cookie_fields("sid", "a", CookieOptions::new());
    /// jar.add_cookie_fields("sid", "b", CookieOptions::new().path("/admin"));
    ///
    /// let values: Vec<_> = jar.get("sid").unwrap().iter().map(|c| c.value()).collect();
    /// assert_eq!(values, vec!["a", "b"]);
    /// assert!(jar.get("missing").is_none());
    /// ```
    pub fn get(&self, name: &str) -> Option<Vec<&Cookie>> {
        self.cookies
            .get(name)
            .map(|paths| paths.values().collect())
    }

    /// The cookie stored under the exact `name` and `path`
    pub fn get_at(&self, name: &str, path: &str) -> Option<&Cookie> {
        self.cookies.get(name)?.get(path)
    }

    /// Look up by name, or by name and path, returning `default` when nothing matches.
    ///
    /// A hit on a specific path comes back as a single element `Vec`.
    pub fn get_or<'a>(&'a self, name: &str, path: Option<&str>, default: Vec<&'a Cookie>) -> Vec<&'a Cookie> {
        let found = match path {
            Some(path) => self.get_at(name, path).map(|cookie| vec![cookie]),
            None => self.get(name),
        };
        found.unwrap_or(default)
    }

    pub fn has(&self, name: &str, path: Option<&str>) -> bool {
        match (self.cookies.get(name), path) {
            (Some(paths), Some(path)) => paths.contains_key(path),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Store a ready made cookie, replacing any cookie with the same name and path
    pub fn add_cookie(&mut self, cookie: Cookie) -> &Cookie {
        let name = cookie.name().to_string();
        let path = cookie.path().to_string();
        let paths = self.cookies.entry(name).or_default();
        paths.insert(path.clone(), cookie);
        &paths[&path]
    }

    /// Build a cookie with [CookieJar::create] and store it
    pub fn add_cookie_fields<N, V>(&mut self, name: N, value: V, options: CookieOptions<'_>) -> &Cookie
    where
        N: Into<String>,
        V: Into<String>,
    {
        let cookie = self.create(name, value, options);
        self.add_cookie(cookie)
    }

    /// Drop every cookie under `name`, or only the one at `path`.
    ///
    /// A name left without any path is dropped as well. The removed cookies are returned.
    pub fn remove(&mut self, name: &str, path: Option<&str>) -> Vec<Cookie> {
        let Some(path) = path else {
            return self
                .cookies
                .remove(name)
                .map(|paths| paths.into_values().collect())
                .unwrap_or_default();
        };

        let Some(paths) = self.cookies.get_mut(name) else {
            return Vec::new();
        };
        let removed = paths.remove(path);
        if paths.is_empty() {
            self.cookies.remove(name);
        }
        removed.into_iter().collect()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Number of stored cookies, counting every path separately
    pub fn len(&self) -> usize {
        self.cookies.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Build a cookie without storing it.
    ///
    /// Path, domain, secure and same-site fall back to the jar defaults when `options` leaves
    /// them unset. The cookie is `HttpOnly` unless told otherwise and has no expiry unless one
    /// is given.
    /// # Example
    /// ```
    /// use cookiejar::{CookieJar, CookieOptions, JarDefaults, SameSite};
    ///
    /// let jar = CookieJar::new(JarDefaults::new("/app", None, true, SameSite::Lax));
    /// let cookie = jar.create("sid", "abc123", CookieOptions::new());
    ///
    /// assert_eq!(cookie.path(), "/app");
    /// assert_eq!(cookie.as_response_cookie().secure(), Some(true));
    /// ```
    pub fn create<N, V>(&self, name: N, value: V, options: CookieOptions<'_>) -> Cookie
    where
        N: Into<String>,
        V: Into<String>,
    {
        let path = CookieOptions::non_empty(&options.path)
            .unwrap_or(self.defaults.path.as_str())
            .to_string();
        let domain = CookieOptions::non_empty(&options.domain)
            .map(str::to_string)
            .or_else(|| self.defaults.domain.clone());

        let mut cookie = ResponseCookie::new(name.into(), value.into())
            .set_path(path)
            .set_secure(options.secure.unwrap_or(self.defaults.secure))
            .set_http_only(options.http_only.unwrap_or(true))
            .set_same_site(options.same_site.unwrap_or(self.defaults.same_site))
            .set_max_age(options.max_age);
        if let Some(domain) = domain {
            cookie = cookie.set_domain(domain);
        }
        if let Some(expires) = options.expires {
            cookie = cookie.set_expires(expires);
        }

        Cookie::with_raw(cookie, options.raw.unwrap_or(false))
    }

    /// Build a cookie that expires [FOREVER_SECONDS] from now, without storing it.
    ///
    /// Any expiry set on `options` is replaced.
    pub fn forever<N, V>(&self, name: N, value: V, options: CookieOptions<'_>) -> Cookie
    where
        N: Into<String>,
        V: Into<String>,
    {
        let lifetime = SignedDuration::from_secs(FOREVER_SECONDS);
        let options = options
            .max_age(lifetime)
            .expires(expiration_after(lifetime));
        self.create(name, value, options)
    }

    /// Build a removal cookie for `name`, without storing it.
    ///
    /// The cookie has an empty value, `Max-Age=0` and an expiry [FOREVER_SECONDS] in the past,
    /// which makes the client drop its copy once the cookie is added to the jar.
    pub fn forget<N>(&self, name: N, path: Option<&str>, domain: Option<&str>) -> Cookie
    where
        N: Into<String>,
    {
        let past = expiration_after(-SignedDuration::from_secs(FOREVER_SECONDS))
            .unwrap_or_else(|| Expiration::from(Timestamp::UNIX_EPOCH.to_zoned(TimeZone::UTC)));

        let mut options = CookieOptions::new()
            .max_age(SignedDuration::ZERO)
            .expires(past);
        if let Some(path) = path {
            options = options.path(path);
        }
        if let Some(domain) = domain {
            options = options.domain(domain);
        }
        self.create(name, "", options)
    }
}

fn expiration_after(offset: SignedDuration) -> Option<Expiration> {
    Timestamp::now()
        .checked_add(offset)
        .ok()
        .map(|at| Expiration::from(at.to_zoned(TimeZone::UTC)))
}

#[cfg(test)]
mod tests {
    use super::{CookieJar, FOREVER_SECONDS};
    use crate::time::SignedDuration;
    use crate::{Cookie, CookieOptions, JarDefaults, SameSite};
    use biscotti::ResponseCookie;

    fn values<'a>(cookies: &[&'a Cookie]) -> Vec<&'a str> {
        cookies.iter().map(|c| c.value()).collect()
    }

    #[test]
    fn empty_jar() {
        let jar = CookieJar::default();

        assert!(jar.all().is_empty());
        assert!(jar.is_empty());
        assert_eq!(jar.len(), 0);
        assert!(!jar.has("sid", None));
        assert!(jar.get("sid").is_none());
    }
    #[test]
    fn add_cookie_is_keyed_by_its_own_name_and_path() {
        let mut jar = CookieJar::default();
        let cookie = Cookie::new(ResponseCookie::new("sid", "abc").set_path("/x"));

        jar.add_cookie(cookie);

        assert!(jar.has("sid", None));
        assert!(jar.has("sid", Some("/x")));
        assert!(!jar.has("sid", Some("/")));
        assert_eq!(jar.get_at("sid", "/x").unwrap().value(), "abc");
    }
    #[test]
    fn add_cookie_with_empty_path_is_keyed_under_root() {
        let mut jar = CookieJar::default();
        let cookie = Cookie::new(ResponseCookie::new("a", "1").set_path(""));

        jar.add_cookie(cookie);

        assert!(jar.has("a", Some("/")));
        assert!(!jar.has("a", Some("")));
        assert_eq!(jar.get_at("a", "/").unwrap().header_value(), "a=1; Path=/");
    }
    #[test]
    fn add_cookie_fields_uses_jar_defaults() {
        let mut jar = CookieJar::new(JarDefaults::new("/app", None, false, SameSite::Strict));

        let cookie = jar.add_cookie_fields("sid", "abc", CookieOptions::new());

        assert_eq!(cookie.path(), "/app");
        assert_eq!(cookie.as_response_cookie().same_site(), Some(SameSite::Strict));
        assert!(jar.has("sid", Some("/app")));
    }
    #[test]
    fn second_add_with_same_name_and_path_overwrites() {
        let mut jar = CookieJar::default();

        jar.add_cookie_fields("sid", "first", CookieOptions::new());
        jar.add_cookie_fields("sid", "second", CookieOptions::new());

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_at("sid", "/").unwrap().value(), "second");
    }
    #[test]
    fn same_name_different_paths_are_kept_apart() {
        let mut jar = CookieJar::default();

        jar.add_cookie_fields("sid", "b", CookieOptions::new().path("/b"));
        jar.add_cookie_fields("sid", "a", CookieOptions::new().path("/a"));
        jar.add_cookie_fields("other", "o", CookieOptions::new());

        assert_eq!(jar.len(), 3);
        assert_eq!(values(&jar.get("sid").unwrap()), vec!["a", "b"]);
        assert_eq!(values(&jar.all()), vec!["o", "a", "b"]);
    }
    #[test]
    fn get_or_falls_back_to_default() {
        let mut jar = CookieJar::default();
        let fallback = Cookie::new(ResponseCookie::new("fallback", "f"));
        jar.add_cookie_fields("sid", "abc", CookieOptions::new());

        assert_eq!(values(&jar.get_or("sid", None, vec![])), vec!["abc"]);
        assert_eq!(values(&jar.get_or("sid", Some("/"), vec![])), vec!["abc"]);
        assert_eq!(values(&jar.get_or("sid", Some("/nope"), vec![&fallback])), vec!["f"]);
        assert_eq!(values(&jar.get_or("missing", None, vec![&fallback])), vec!["f"]);
        assert!(jar.get_or("missing", None, vec![]).is_empty());
    }
    #[test]
    fn remove_single_path_keeps_other_paths() {
        let mut jar = CookieJar::default();
        jar.add_cookie_fields("sid", "a", CookieOptions::new().path("/a"));
        jar.add_cookie_fields("sid", "b", CookieOptions::new().path("/b"));

        let removed = jar.remove("sid", Some("/a"));

        assert_eq!(removed.len(), 1);
        assert!(!jar.has("sid", Some("/a")));
        assert!(jar.has("sid", Some("/b")));
        assert!(jar.has("sid", None));
    }
    #[test]
    fn remove_last_path_drops_the_name() {
        let mut jar = CookieJar::default();
        jar.add_cookie_fields("sid", "a", CookieOptions::new());

        jar.remove("sid", Some("/"));

        assert!(!jar.has("sid", None));
        assert!(jar.get("sid").is_none());
        assert!(jar.is_empty());
    }
    #[test]
    fn remove_without_path_drops_every_path() {
        let mut jar = CookieJar::default();
        jar.add_cookie_fields("sid", "a", CookieOptions::new().path("/a"));
        jar.add_cookie_fields("sid", "b", CookieOptions::new().path("/b"));
        jar.add_cookie_fields("other", "o", CookieOptions::new());

        let removed = jar.remove("sid", None);

        assert_eq!(removed.len(), 2);
        assert!(!jar.has("sid", None));
        assert!(jar.has("other", None));
    }
    #[test]
    fn remove_missing_is_a_no_op() {
        let mut jar = CookieJar::default();
        jar.add_cookie_fields("sid", "a", CookieOptions::new());

        assert!(jar.remove("missing", None).is_empty());
        assert!(jar.remove("missing", Some("/")).is_empty());
        assert!(jar.remove("sid", Some("/nope")).is_empty());
        assert_eq!(jar.len(), 1);
    }
    #[test]
    fn create_does_not_store() {
        let jar = CookieJar::default();

        jar.create("sid", "abc", CookieOptions::new());
        jar.forever("sid", "abc", CookieOptions::new());
        jar.forget("sid", None, None);

        assert!(jar.is_empty());
    }
    #[test]
    fn create_with_jar_defaults() {
        let jar = CookieJar::new(JarDefaults::new("/app", None, true, SameSite::Lax));

        let cookie = jar.create("sid", "abc123", CookieOptions::new());

        assert_eq!(cookie.header_value(), "sid=abc123; HttpOnly; SameSite=Lax; Secure; Path=/app");
    }
    #[test]
    fn create_options_override_defaults() {
        let jar = CookieJar::new(JarDefaults::new("/app", Some("example.com".to_string()), true, SameSite::Lax));

        let cookie = jar.create(
            "sid",
            "abc123",
            CookieOptions::new()
                .path("/other")
                .domain("sub.example.com")
                .secure(false)
                .http_only(false)
                .same_site(SameSite::Strict)
                .max_age(SignedDuration::from_secs(60)),
        );
        let response_cookie = cookie.as_response_cookie();

        assert_eq!(response_cookie.path(), Some("/other"));
        assert_eq!(response_cookie.domain(), Some("sub.example.com"));
        assert_eq!(response_cookie.secure(), Some(false));
        assert_eq!(response_cookie.http_only(), Some(false));
        assert_eq!(response_cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(response_cookie.max_age(), Some(SignedDuration::from_secs(60)));
    }
    #[test]
    fn create_falls_back_on_empty_path_and_domain() {
        let jar = CookieJar::new(JarDefaults::new("/app", Some("example.com".to_string()), false, SameSite::Lax));

        let cookie = jar.create("sid", "abc", CookieOptions::new().path("").domain(""));

        assert_eq!(cookie.path(), "/app");
        assert_eq!(cookie.domain(), Some("example.com"));
    }
    #[test]
    fn create_raw() {
        let jar = CookieJar::default();

        let raw = jar.create("sid", "a b", CookieOptions::new().raw(true));
        let encoded = jar.create("sid", "a b", CookieOptions::new());

        assert!(raw.header_value().starts_with("sid=a b;"));
        assert!(encoded.header_value().starts_with("sid=a%20b;"));
    }
    #[test]
    fn forever_sets_a_five_year_lifetime() {
        let jar = CookieJar::default();

        let cookie = jar.forever("sid", "abc123", CookieOptions::new().max_age(SignedDuration::from_secs(1)));

        assert_eq!(
            cookie.as_response_cookie().max_age(),
            Some(SignedDuration::from_secs(FOREVER_SECONDS))
        );
        assert!(cookie.as_response_cookie().expires().is_some());
        assert!(cookie.header_value().contains("Max-Age=157680000"));
    }
    #[test]
    fn forget_builds_an_expired_cookie() {
        let jar = CookieJar::new(JarDefaults::new("/app", None, false, SameSite::Lax));

        let cookie = jar.forget("sid", None, Some("example.com"));

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), "/app");
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.as_response_cookie().max_age(), Some(SignedDuration::ZERO));
        assert!(cookie.as_response_cookie().expires().is_some());
        assert!(cookie.header_value().starts_with("sid=;"));
        assert!(cookie.header_value().contains("Max-Age=0"));
    }
    #[test]
    fn forgotten_cookie_replaces_stored_one() {
        let mut jar = CookieJar::default();
        jar.add_cookie_fields("sid", "abc", CookieOptions::new());

        let removal = jar.forget("sid", None, None);
        jar.add_cookie(removal);

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get_at("sid", "/").unwrap().value(), "");
    }
    #[test]
    fn clear_empties_the_jar() {
        let mut jar = CookieJar::default();
        jar.add_cookie_fields("a", "1", CookieOptions::new());
        jar.add_cookie_fields("b", "2", CookieOptions::new());

        jar.clear();

        assert!(jar.is_empty());
    }
}
