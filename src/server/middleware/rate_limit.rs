//! Rate limiting middleware

use super::helpers::request_client_id;
use crate::core::rate_limiter::{RateLimitDecision, SlidingWindowLimiter};
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{Error, HttpResponse};
use futures::future::{LocalBoxFuture, Ready, ready};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

pub const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
pub const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Body of a 429 response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedBody {
    pub success: bool,
    pub error: String,
    pub retry_after: u64,
}

impl RateLimitedBody {
    pub fn new(retry_after: u64) -> Self {
        Self {
            success: false,
            error: "Too many requests. Please try again later.".to_string(),
            retry_after,
        }
    }
}

/// Write the `X-RateLimit-*` headers for `decision`
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_LIMIT),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_REMAINING),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_RESET),
        HeaderValue::from(decision.reset_secs),
    );
}

fn rejection_response(decision: &RateLimitDecision) -> HttpResponse {
    let mut response = HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .json(RateLimitedBody::new(decision.reset_secs));
    let headers = response.headers_mut();
    apply_rate_limit_headers(headers, decision);
    headers.insert(RETRY_AFTER, HeaderValue::from(decision.reset_secs));
    response
}

/// Sliding-window rate limit middleware for Actix-web
///
/// Runs before authentication. Rejected requests never reach the inner
/// service; store failures let the request through without limit headers.
#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: Arc<SlidingWindowLimiter>,
    trusted_proxy_hops: usize,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<SlidingWindowLimiter>) -> Self {
        let trusted_proxy_hops = limiter.config().trusted_proxy_hops;
        Self {
            limiter,
            trusted_proxy_hops,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trusted_proxy_hops: self.trusted_proxy_hops,
        }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<SlidingWindowLimiter>,
    trusted_proxy_hops: usize,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let client = request_client_id(&req, self.trusted_proxy_hops);

        Box::pin(async move {
            let route = req.path().to_string();
            let method = req.method().to_string();

            let decision = limiter.check_and_record(&client, &route, &method).await;

            if !decision.allowed {
                debug!(
                    client = %client,
                    route = %route,
                    retry_after = decision.reset_secs,
                    "Request rate limited"
                );
                let response = rejection_response(&decision);
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            if decision.has_headers() {
                apply_rate_limit_headers(res.headers_mut(), &decision);
            }
            Ok(res.map_into_left_body())
        })
    }
}
