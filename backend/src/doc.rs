//! OpenAPI documentation configuration.
//!
//! Registers every resource and probe path plus the schema wrappers that
//! describe domain types without coupling them to utoipa. Served by Swagger
//! UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::inbound::http::flash::{Flash, FlashLevel};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, ScoreSchema, UserSchema};
use crate::inbound::http::scores::{ScoreForm, ScoreFormView, ScoreIndexView, ScoreParams};
use crate::inbound::http::users::{UserForm, UserFormView, UserIndexView, UserParams};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scorebook API",
        description = "Users and their scores, with substring search and cascading deletes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::new_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::show_user,
        crate::inbound::http::users::edit_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::scores::list_scores,
        crate::inbound::http::scores::new_score,
        crate::inbound::http::scores::create_score,
        crate::inbound::http::scores::show_score,
        crate::inbound::http::scores::edit_score,
        crate::inbound::http::scores::update_score,
        crate::inbound::http::scores::delete_score,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        ScoreSchema,
        ErrorSchema,
        ErrorCodeSchema,
        Flash,
        FlashLevel,
        UserForm,
        UserParams,
        UserIndexView,
        UserFormView,
        ScoreForm,
        ScoreParams,
        ScoreIndexView,
        ScoreFormView,
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "scores", description = "Score records owned by users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
