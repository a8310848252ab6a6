//! Builders wiring repositories into the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use scorebook::domain::ports::{ScoreRepository, UserRepository};
use scorebook::domain::{EmailPolicy, ScoreService, UserService};
use scorebook::inbound::http::state::{HttpState, HttpStatePorts};
use scorebook::outbound::memory::MemoryStore;
use scorebook::outbound::persistence::{DieselScoreRepository, DieselUserRepository};

use super::ServerConfig;

/// Wrap a repository pair in the user and score services.
fn build_ports<U, S>(
    users_repo: Arc<U>,
    scores_repo: Arc<S>,
    email_policy: EmailPolicy,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    S: ScoreRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(UserService::new(users_repo, clock.clone()).with_email_policy(email_policy));
    let scores = Arc::new(ScoreService::new(scores_repo, clock));
    HttpStatePorts {
        users: users.clone(),
        users_command: users,
        scores: scores.clone(),
        scores_command: scores,
    }
}

/// Build HTTP state from Diesel repositories when a pool is configured,
/// otherwise from one in-memory store shared by both services.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => build_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselScoreRepository::new(pool.clone())),
            config.email_policy,
        ),
        None => {
            let store = Arc::new(MemoryStore::new());
            build_ports(store.clone(), store, config.email_policy)
        }
    };
    web::Data::new(HttpState::new(ports))
}
