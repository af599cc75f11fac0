//! Bearer-token extraction for HTTP handlers.
//!
//! Handlers take a [`BearerIdentity`] argument to require an authenticated
//! caller. A missing `Authorization` header yields `401`; a header whose
//! token fails verification yields `403`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::ports::IdentityError;
use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller resolved from the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerIdentity(Identity);

impl BearerIdentity {
    /// Consume the wrapper and return the verified identity.
    pub fn into_inner(self) -> Identity {
        self.0
    }

    fn extract(req: &HttpRequest) -> Result<Self, Error> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .ok_or_else(|| Error::unauthorized("Unauthorized access: no token provided."))?;
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::unauthorized("Unauthorized access: malformed bearer token."))?;

        let state = req
            .app_data::<web::Data<HttpState>>()
            .ok_or_else(|| Error::internal("HTTP state is not configured"))?;

        state
            .identity
            .verify(token)
            .map(Self)
            .map_err(|err| {
                debug!(error = %err, "bearer token rejected");
                match err {
                    IdentityError::Expired => Error::forbidden("Forbidden access: token expired."),
                    IdentityError::Invalid { .. } => {
                        Error::forbidden("Forbidden access: invalid token.")
                    }
                }
            })
    }
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}
