//! Request scoped access to the cookie jar
use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

use actix_utils::future::{Ready, ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, dev::ServiceRequest};

use crate::error::CookieJarError;
use crate::jar::CookieJar;
use crate::middleware::e500;

/// A shared handle to the jar of the current request.
///
/// [CookieJarMiddleware](crate::CookieJarMiddleware) places one in the request extensions before the
/// handler runs. Handlers can take it as an argument:
/// ```no_run
/// use actix_web::HttpResponse;
/// use cookiejar::{CookieOptions, SharedJar};
///
/// async fn login(jar: SharedJar) -> HttpResponse {
///     jar.borrow_mut().add_cookie_fields("sid", "abc123", CookieOptions::new());
///     HttpResponse::Ok().finish()
/// }
/// ```
#[derive(Clone, Debug)]
pub struct SharedJar(Rc<RefCell<CookieJar>>);

impl SharedJar {
    pub fn new(jar: CookieJar) -> Self {
        SharedJar(Rc::new(RefCell::new(jar)))
    }

    pub fn borrow(&self) -> Ref<'_, CookieJar> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, CookieJar> {
        self.0.borrow_mut()
    }
}

impl FromRequest for SharedJar {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.cookie_jar() {
            Some(jar) => ready(Ok(jar)),
            None => ready(Err(e500(CookieJarError::MissingJar))),
        }
    }
}

/// Extension trait giving requests access to their [SharedJar].
///
/// Returns `None` when [CookieJarMiddleware](crate::CookieJarMiddleware) is not registered.
pub trait CookieJarExt {
    fn cookie_jar(&self) -> Option<SharedJar>;
}

impl CookieJarExt for HttpRequest {
    fn cookie_jar(&self) -> Option<SharedJar> {
        self.extensions().get::<SharedJar>().cloned()
    }
}

impl CookieJarExt for ServiceRequest {
    fn cookie_jar(&self) -> Option<SharedJar> {
        self.extensions().get::<SharedJar>().cloned()
    }
}
