//! Authentication middleware

use super::helpers::extract_token;
use crate::auth::{GuardKind, Principal};
use crate::server::state::AppState;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, HttpMessage, HttpRequest, web};
use futures::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, error};

/// Auth guard middleware for Actix-web
///
/// Wraps a scope or resource. On success the [`Principal`] is stored in the
/// request extensions; on failure the inner service is never called.
#[derive(Debug, Clone, Copy)]
pub struct AuthGuard {
    kind: GuardKind,
}

impl AuthGuard {
    /// Any authenticated account
    pub fn user() -> Self {
        Self {
            kind: GuardKind::User,
        }
    }

    /// Service provider accounts only
    pub fn service_provider() -> Self {
        Self {
            kind: GuardKind::ServiceProvider,
        }
    }

    /// Administrators only
    pub fn admin() -> Self {
        Self {
            kind: GuardKind::Admin,
        }
    }

    pub fn kind(&self) -> GuardKind {
        self.kind
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardService {
            service: Rc::new(service),
            kind: self.kind,
        }))
    }
}

/// Service implementation for the auth guard
pub struct AuthGuardService<S> {
    service: Rc<S>,
    kind: GuardKind,
}

impl<S, B> Service<ServiceRequest> for AuthGuardService<S>
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
        let kind = self.kind;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                error!("Application state missing, auth guard cannot run");
                return Err(actix_web::error::ErrorInternalServerError(
                    "Missing application state",
                ));
            };

            let token = extract_token(
                req.cookie(&state.config.gateway.auth.cookie_name),
                req.headers(),
            );

            match state.authenticator.authenticate(token.as_deref(), kind).await {
                Ok(principal) => {
                    debug!(user_id = %principal.id, guard = ?kind, "Request authenticated");
                    req.extensions_mut().insert(principal);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(rejection) => {
                    debug!(
                        guard = ?kind,
                        status = rejection.status.as_u16(),
                        "Request rejected: {}",
                        rejection.reason
                    );
                    let response = rejection.to_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Principal attached by [`AuthGuard`]
pub fn current_principal(req: &HttpRequest) -> Result<Principal, Error> {
    req.extensions()
        .get::<Principal>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Missing principal"))
}
