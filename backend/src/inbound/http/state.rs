//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ScoresCommand, ScoresQuery, UsersCommand, UsersQuery};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub scores: Arc<dyn ScoresQuery>,
    pub scores_command: Arc<dyn ScoresCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub scores: Arc<dyn ScoresQuery>,
    pub scores_command: Arc<dyn ScoresCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use scorebook::domain::{ScoreService, UserService};
    /// use scorebook::inbound::http::state::{HttpState, HttpStatePorts};
    /// use scorebook::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let users = Arc::new(UserService::new(store.clone(), Arc::new(DefaultClock)));
    /// let scores = Arc::new(ScoreService::new(store, Arc::new(DefaultClock)));
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: users.clone(),
    ///     users_command: users,
    ///     scores: scores.clone(),
    ///     scores_command: scores,
    /// });
    /// let _users = state.users.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            users_command,
            scores,
            scores_command,
        } = ports;
        Self {
            users,
            users_command,
            scores,
            scores_command,
        }
    }
}
