use actix_web::{get, post, App, HttpResponse, HttpServer};
use cookiejar::{secure_from_https_flag, CookieJarMiddleware, CookieOptions, JarConfig, SameSite, SharedJar};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("debug"));

    // Behind a CGI style proxy the `HTTPS` variable decides whether cookies are `Secure`,
    // otherwise the request scheme does.
    let mut config = JarConfig::new().same_site(SameSite::Lax);
    if let Ok(https) = std::env::var("HTTPS") {
        config = config.secure(secure_from_https_flag(Some(&https)));
    }

    HttpServer::new(move || {
        App::new()
            .wrap(CookieJarMiddleware::new(config.clone()))
            .service(login)
            .service(remember)
            .service(logout)
            .service(peek)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}

#[post("/login")]
async fn login(jar: SharedJar) -> HttpResponse {
    let mut jar = jar.borrow_mut();
    jar.add_cookie_fields("sid", "abc123", CookieOptions::new());
    // Readable from scripts, so not HttpOnly
    jar.add_cookie_fields("theme", "dark mode", CookieOptions::new().http_only(false));
    HttpResponse::Ok().finish()
}

#[post("/remember")]
async fn remember(jar: SharedJar) -> HttpResponse {
    let mut jar = jar.borrow_mut();
    let cookie = jar.forever("remember", "yes", CookieOptions::new().path("/account"));
    jar.add_cookie(cookie);
    HttpResponse::Ok().finish()
}

#[post("/logout")]
async fn logout(jar: SharedJar) -> HttpResponse {
    let mut jar = jar.borrow_mut();
    for name in ["sid", "theme"] {
        let removal = jar.forget(name, None, None);
        jar.add_cookie(removal);
    }
    let removal = jar.forget("remember", Some("/account"), None);
    jar.add_cookie(removal);
    HttpResponse::Ok().finish()
}

#[get("/peek")]
async fn peek(jar: SharedJar) -> HttpResponse {
    let mut jar = jar.borrow_mut();
    jar.add_cookie_fields("raw", "a|b", CookieOptions::new().raw(true));
    let pending: Vec<String> = jar.all().iter().map(|cookie| cookie.to_string()).collect();
    HttpResponse::Ok().body(pending.join("\n"))
}
