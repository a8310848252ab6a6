//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use scorebook::Trace;
#[cfg(debug_assertions)]
use scorebook::doc::ApiDoc;
use scorebook::inbound::http::configure;
use scorebook::inbound::http::health::{HealthState, live, ready};
use scorebook::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let resources = web::scope("").wrap(session).configure(configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.service(resources)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        email_policy: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Bootstrap coverage: probes, session wiring and server binding.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("literal addr"),
        )
    }

    fn deps(config: &ServerConfig) -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: build_http_state(config),
            key: config.key.clone(),
            cookie_secure: config.cookie_secure,
            same_site: config.same_site,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn probes_bypass_the_session(config: ServerConfig) {
        let app = actix_test::init_service(build_app(deps(&config))).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().next().is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn writes_set_a_private_session_cookie(config: ServerConfig) {
        let app = actix_test::init_service(build_app(deps(&config))).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/users")
                .set_json(serde_json::json!({"user": {"name": "Amy", "email": "a@x"}}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[rstest]
    #[actix_web::test]
    async fn create_server_marks_health_ready(config: ServerConfig) {
        let health_state = web::Data::new(HealthState::new());
        let server = create_server(health_state.clone(), config).expect("server binds");
        assert!(health_state.is_ready());
        server.handle().stop(false).await;
    }
}
