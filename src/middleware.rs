use actix_web::{
    dev::{forward_ready, ResponseHead, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderValue, SET_COOKIE},
    HttpMessage,
};
use anyhow::anyhow;
use std::{future::Future, pin::Pin, rc::Rc};
use actix_utils::future::{ready, Ready};

use crate::{CookieJar, JarConfig, SharedJar};

/// Gives every request a fresh [CookieJar] and writes its cookies to the response.
///
/// The jar defaults are resolved from the [JarConfig] for each request, with `Secure` following the
/// connection scheme unless configured explicitly.
pub struct CookieJarMiddleware {
    config: Rc<JarConfig>,
}

impl CookieJarMiddleware {
    pub fn new(config: JarConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl Default for CookieJarMiddleware {
    fn default() -> Self {
        Self::new(JarConfig::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for CookieJarMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = InnerCookieJarMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(InnerCookieJarMiddleware {
            service: Rc::new(service),
            config: Rc::clone(&self.config),
        }))
    }
}

pub fn e500<T>(e: T) -> actix_web::Error
where
    T: std::fmt::Debug + std::fmt::Display + 'static,
{
    actix_web::error::ErrorInternalServerError(e)
}

pub struct InnerCookieJarMiddleware<S> {
    service: Rc<S>,
    config: Rc<JarConfig>,
}

impl<S, B> Service<ServiceRequest> for InnerCookieJarMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let secure_transport = req.connection_info().scheme() == "https";
        let jar = SharedJar::new(CookieJar::new(self.config.resolve(secure_transport)));

        Box::pin(async move {
            req.extensions_mut().insert(jar.clone());

            let mut response = service.call(req).await?;

            append_set_cookie_headers(response.response_mut().head_mut(), &jar.borrow()).map_err(e500)?;

            Ok(response)
        })
    }
}

/// Append one `Set-Cookie` header per cookie in the jar, in jar order.
///
/// Headers already on the response are left alone.
pub fn append_set_cookie_headers(response: &mut ResponseHead, jar: &CookieJar) -> Result<(), anyhow::Error> {
    log::trace!("writing {} cookie(s) to the response", jar.len());

    for cookie in jar.iter() {
        let value = cookie.header_value();
        let header = HeaderValue::from_str(&value).map_err(|e| {
            anyhow!("Failed to attach cookie `{}` to outgoing response: {}", cookie.name(), e)
        })?;
        log::debug!("Set-Cookie: {}", value);
        response.headers_mut().append(SET_COOKIE, header);
    }

    Ok(())
}
