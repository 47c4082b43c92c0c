use std::future::{ready, Ready as StdReady};
use std::rc::Rc;

use actix_service::{forward_ready, Service};
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ok, LocalBoxFuture, Ready};

use crate::access::{admin_gate, Gate, SessionState};
use crate::auth::Tokens;
use crate::error::AppError;
use crate::models::{Claims, Role};
use crate::store::Store;

/// The verified caller, placed in request extensions by [`AuthMiddleware`].
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: Claims,
    /// Role as currently stored, which may differ from the one in the token.
    pub role: Role,
}

impl FromRequest for Session {
    type Error = Error;
    type Future = StdReady<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Session>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("Silakan masuk terlebih dahulu").into()),
        )
    }
}

pub struct AuthMiddleware {
    tokens: web::Data<Tokens>,
    admin_only: bool,
}

impl AuthMiddleware {
    /// Any signed-in user.
    pub fn new(tokens: web::Data<Tokens>) -> Self {
        AuthMiddleware {
            tokens,
            admin_only: false,
        }
    }

    /// Signed-in users whose stored role is admin.
    pub fn admin(tokens: web::Data<Tokens>) -> Self {
        AuthMiddleware {
            tokens,
            admin_only: true,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            admin_only: self.admin_only,
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    tokens: web::Data<Tokens>,
    admin_only: bool,
}

fn bearer_token(req: &ServiceRequest) -> Result<Option<String>, AppError> {
    let Some(header) = req.headers().get("Authorization") else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Header otorisasi tidak valid"))?;
    match value.strip_prefix("Bearer ") {
        Some(token) => Ok(Some(token.trim().to_string())),
        None => Err(AppError::Unauthorized("Skema otorisasi tidak valid")),
    }
}

/// Resolves the caller and applies the admin gate when asked to.
async fn authorize(
    req: &ServiceRequest,
    tokens: &Tokens,
    admin_only: bool,
) -> Result<Session, AppError> {
    let claims = match bearer_token(req)? {
        Some(token) => match tokens.verify(&token) {
            Ok(claims) => Some(claims),
            Err(err) => {
                log::warn!("rejected token on {}: {}", req.path(), err);
                None
            }
        },
        None => None,
    };

    let (session, state) = match claims {
        Some(claims) => {
            let store = req
                .app_data::<web::Data<dyn Store>>()
                .cloned()
                .ok_or(AppError::Unauthorized("Sesi tidak valid"))?;
            // Roles can change after a token is issued; trust the stored one.
            match store.get_user(&claims.sub).await {
                Ok(Some(user)) => {
                    let role = user.role;
                    (Some(Session { claims, role }), SessionState::Signed(role))
                }
                Ok(None) => (None, SessionState::Anonymous),
                Err(err) => {
                    log::error!("could not load user {}: {}", claims.sub, err);
                    (None, SessionState::Loading)
                }
            }
        }
        None => (None, SessionState::Anonymous),
    };

    if admin_only {
        match admin_gate(state) {
            Gate::Admit => {}
            Gate::Wait => return Err(AppError::SessionPending),
            Gate::Redirect(to) => {
                log::warn!(
                    "admin gate sent {} from {} back to {}",
                    describe(session.as_ref()),
                    req.path(),
                    to
                );
                return Err(AppError::Forbidden);
            }
        }
    } else if state == SessionState::Loading {
        return Err(AppError::SessionPending);
    }

    session.ok_or(AppError::Unauthorized("Silakan masuk terlebih dahulu"))
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let tokens = self.tokens.clone();
        let service = self.service.clone();
        let admin_only = self.admin_only;

        Box::pin(async move {
            match authorize(&req, &tokens, admin_only).await {
                Ok(session) => {
                    req.extensions_mut().insert(session);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

fn describe(session: Option<&Session>) -> String {
    match session {
        Some(session) => session.claims.email.clone(),
        None => "anonymous caller".to_string(),
    }
}
