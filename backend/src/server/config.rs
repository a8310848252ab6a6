//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use scorebook::domain::EmailPolicy;
use scorebook::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) email_policy: EmailPolicy,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            email_policy: EmailPolicy::default(),
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one, records are kept in a process-local store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the email validation rule for user writes.
    #[must_use]
    pub fn with_email_policy(mut self, policy: EmailPolicy) -> Self {
        self.email_policy = policy;
        self
    }
}
