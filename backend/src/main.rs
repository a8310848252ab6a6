//! Backend entry-point: loads settings, prepares the record store and serves
//! the users and scores resources.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use scorebook::inbound::http::health::HealthState;
use scorebook::outbound::persistence::{DbPool, run_pending_migrations};
use scorebook::settings::{AppSettings, BuildMode};

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;
    let mode = BuildMode::from_debug_assertions();
    let key = settings.session_key(mode)?;
    let same_site = settings.same_site(mode)?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(key, settings.cookie_secure(), same_site, bind_addr)
        .with_email_policy(settings.email_policy());

    match settings.pool_config() {
        Some(pool_config) => {
            let url = pool_config.database_url().to_owned();
            let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
                .await
                .wrap_err("migration task panicked")??;
            info!(applied, "database migrations applied");
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("failed to build database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database_url configured; records are kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, config)?.await?;
    Ok(())
}

/// Layer CLI `args` over `SCOREBOOK_*` variables and the config file.
fn load_settings<I>(args: I) -> Result<AppSettings>
where
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    AppSettings::load_from_iter(args).wrap_err("failed to load settings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;

    #[rstest]
    fn settings_load_from_process_environment() {
        let _guard = lock_env([
            ("SCOREBOOK_PORT", Some("9100")),
            ("SCOREBOOK_COOKIE_SECURE", None),
        ]);
        let settings = load_settings(["scorebook"]).expect("settings load");
        assert_eq!(settings.port, Some(9100));
        assert!(settings.cookie_secure());
    }
}
