//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::{ScoreService, UserService};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;
use crate::test_support::MutableClock;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state backed by a fresh in-memory store and the fixture clock.
pub fn memory_state() -> (web::Data<HttpState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(MutableClock::default());
    let users = Arc::new(UserService::new(store.clone(), clock.clone()));
    let scores = Arc::new(ScoreService::new(store.clone(), clock));
    let state = HttpState::new(HttpStatePorts {
        users: users.clone(),
        users_command: users,
        scores: scores.clone(),
        scores_command: scores,
    });
    (web::Data::new(state), store)
}

/// Application exposing every resource route over `state`.
pub fn resource_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(state)
        .configure(configure)
}

/// Extract the session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}
