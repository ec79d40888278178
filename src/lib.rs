//! A request scoped cookie jar for the Actix Web framework.
//!
//! Handlers add outgoing cookies to a jar keyed by name and path while a request is being handled.
//! Once the handler returns, [CookieJarMiddleware] writes one `Set-Cookie` header per cookie in the jar.
//!
//! # Features
//! - Cookies are built and serialized with [biscotti](https://docs.rs/biscotti/latest/biscotti/).
//! - Jar wide defaults for path, domain, `Secure` and `SameSite`, with `Secure` following the request scheme.
//! - `forever` and `forget` helpers for long lived and removal cookies.
//! - Per cookie opt out of percent-encoding.
//!
//! # Usage
//! Register [CookieJarMiddleware] in your App, then take a [SharedJar] in your handlers.
//! ```no_run
//!use actix_web::{web, App, HttpServer, HttpResponse};
//!use cookiejar::{CookieJarMiddleware, CookieOptions, JarConfig, SharedJar};
//!
//!async fn login(jar: SharedJar) -> HttpResponse {
//!    let mut jar = jar.borrow_mut();
//!    // Stored with the jar defaults: Path=/app, HttpOnly, SameSite=Lax
//!    jar.add_cookie_fields("sid", "abc123", CookieOptions::new());
//!    // Kept for about five years
//!    let remember = jar.forever("remember", "yes", CookieOptions::new());
//!    jar.add_cookie(remember);
//!    HttpResponse::Ok().finish()
//!}
//!
//!async fn logout(jar: SharedJar) -> HttpResponse {
//!    let mut jar = jar.borrow_mut();
//!    let removal = jar.forget("sid", None, None);
//!    jar.add_cookie(removal);
//!    HttpResponse::Ok().finish()
//!}
//!
//!#[actix_web::main]
//!async fn main() -> std::io::Result<()> {
//!    HttpServer::new(move ||
//!            App::new()
//!            .wrap(CookieJarMiddleware::new(JarConfig::new().path("/app")))
//!            .route("/login", web::post().to(login))
//!            .route("/logout", web::post().to(logout)))
//!        .bind(("127.0.0.1", 8080))?
//!        .run()
//!        .await
//!}
//! ```
mod config;
mod cookie;
mod error;
mod jar;
mod middleware;
mod options;
mod storage;

pub use biscotti::{time, Expiration, SameSite};
pub use config::{parse_same_site, secure_from_https_flag, JarConfig, JarDefaults};
pub use cookie::Cookie;
pub use error::CookieJarError;
pub use jar::{CookieJar, FOREVER_SECONDS};
pub use middleware::{append_set_cookie_headers, e500, CookieJarMiddleware, InnerCookieJarMiddleware};
pub use options::CookieOptions;
pub use storage::{CookieJarExt, SharedJar};
