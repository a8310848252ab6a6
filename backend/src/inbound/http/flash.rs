//! One-shot flash messages carried in the cookie session.
//!
//! A write handler stores a message before redirecting; the next index view
//! takes it out of the session so it is shown exactly once.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;

pub(crate) const FLASH_KEY: &str = "flash";

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Danger,
}

/// Message shown once to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

/// Newtype wrapper exposing flash operations over the Actix session.
#[derive(Clone)]
pub struct FlashContext(Session);

impl FlashContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store a message for the next index view, replacing any pending one.
    pub fn set(&self, flash: Flash) -> Result<(), Error> {
        self.0
            .insert(FLASH_KEY, flash)
            .map_err(|error| Error::internal(format!("failed to persist flash: {error}")))
    }

    /// Remove and return the pending message.
    ///
    /// An undecodable message is dropped rather than failing the request.
    pub fn take(&self) -> Option<Flash> {
        match self.0.remove_as::<Flash>(FLASH_KEY)? {
            Ok(flash) => Some(flash),
            Err(raw) => {
                tracing::warn!(raw = %raw, "discarding undecodable flash message");
                None
            }
        }
    }
}

impl FromRequest for FlashContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(FlashContext::new) })
    }
}
