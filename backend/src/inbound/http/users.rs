//! Users resource handlers.
//!
//! ```text
//! GET    /users?search[name]=Jo&sort=name
//! GET    /users/new
//! POST   /users            {"user":{"name":"John","email":"j@x"}}
//! GET    /users/{id}
//! GET    /users/{id}/edit
//! PATCH  /users/{id}       {"user":{"name":"Joan","email":"j@y"}}
//! DELETE /users/{id}
//! ```
//!
//! Successful writes redirect to `/users` with a flash message; rejected
//! input re-renders the form with field messages and `422`.

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, route, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::UserWriteOutcome;
use crate::domain::query::{SortOrder, UserQuery, UserSearch};
use crate::domain::{Error, FieldErrors, User, UserDraft, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::flash::{Flash, FlashContext};
use crate::inbound::http::responses::{see_other, unprocessable};
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_sort, require_param, search_token,
};

const USERS_PATH: &str = "/users";
const SAVED: &str = "User was successfully saved.";
const SAVE_FAILED: &str = "User could not be saved.";
const UPDATED: &str = "User was successfully updated.";
const DELETED: &str = "User was successfully deleted.";

/// Whitelisted user attributes. Unknown keys are dropped by serde.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserForm {
    #[schema(example = "John")]
    pub name: Option<String>,
    #[schema(example = "j@x.io")]
    pub email: Option<String>,
}

impl From<UserForm> for UserDraft {
    fn from(form: UserForm) -> Self {
        Self::new(form.name, form.email)
    }
}

impl From<UserDraft> for UserForm {
    fn from(draft: UserDraft) -> Self {
        Self {
            name: draft.name,
            email: draft.email,
        }
    }
}

/// Request body wrapping the user attributes under a required `user` key.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserParams {
    pub user: Option<UserForm>,
}

impl UserParams {
    fn into_draft(self) -> Result<UserDraft, Error> {
        require_param(self.user, FieldName::new("user")).map(UserDraft::from)
    }
}

/// Collection view returned by `GET /users`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserIndexView {
    #[schema(value_type = Vec<UserSchema>)]
    pub users: Vec<User>,
    #[schema(value_type = Object)]
    pub search: UserSearch,
    #[schema(value_type = String, example = "name")]
    pub sort: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

/// Form view for creating or editing a user.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserFormView {
    pub user: UserForm,
    /// Field name to validation messages; empty when the form is fresh.
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
    #[schema(example = "/users")]
    pub action: String,
    #[schema(example = "post")]
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

impl UserFormView {
    fn new_form(user: UserForm, errors: FieldErrors) -> Self {
        Self {
            user,
            errors,
            action: USERS_PATH.to_owned(),
            method: "post".to_owned(),
            flash: None,
        }
    }

    fn edit_form(id: UserId, user: UserForm, errors: FieldErrors) -> Self {
        Self {
            user,
            errors,
            action: format!("{USERS_PATH}/{id}"),
            method: "patch".to_owned(),
            flash: None,
        }
    }
}

fn user_id(raw: &str) -> Result<UserId, Error> {
    parse_id(raw, FieldName::new("id"))
}

/// List users narrowed by the optional search tokens.
#[utoipa::path(
    get,
    path = "/users",
    params(
        ("search[name]" = Option<String>, Query, description = "Substring of the user name"),
        ("search[email]" = Option<String>, Query, description = "Substring of the email"),
        ("sort" = Option<String>, Query, description = "`name` or `created`")
    ),
    responses(
        (status = 200, description = "Users", body = UserIndexView),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    flash: FlashContext,
    params: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<UserIndexView>> {
    let search = UserSearch {
        name: search_token(&params, "name"),
        email: search_token(&params, "email"),
    };
    let sort = parse_sort(&params)?;
    let users = state
        .users
        .list(UserQuery::all().search(&search).order_by(sort))
        .await?;
    Ok(web::Json(UserIndexView {
        users,
        search,
        sort,
        flash: flash.take(),
    }))
}

/// Render an empty creation form.
#[utoipa::path(
    get,
    path = "/users/new",
    responses((status = 200, description = "Empty form", body = UserFormView)),
    tags = ["users"],
    operation_id = "newUser"
)]
#[get("/users/new")]
pub async fn new_user() -> web::Json<UserFormView> {
    web::Json(UserFormView::new_form(UserForm::default(), FieldErrors::new()))
}

/// Create a user from whitelisted input.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserParams,
    responses(
        (status = 303, description = "Saved; redirects to the collection"),
        (status = 400, description = "Missing `user` parameter", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = UserFormView)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    flash: FlashContext,
    payload: web::Json<UserParams>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    match state.users_command.create(draft).await? {
        UserWriteOutcome::Saved(user) => {
            info!(user_id = %user.id(), "user created");
            flash.set(Flash::success(SAVED))?;
            Ok(see_other(USERS_PATH))
        }
        UserWriteOutcome::Invalid { draft, errors } => {
            let mut view = UserFormView::new_form(draft.into(), errors);
            view.flash = Some(Flash::danger(SAVE_FAILED));
            Ok(unprocessable(&view))
        }
    }
}

/// Fetch a single user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "showUser"
)]
#[get("/users/{id}")]
pub async fn show_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = user_id(&path)?;
    Ok(web::Json(state.users.find(id).await?))
}

/// Render the edit form prefilled with the stored values.
#[utoipa::path(
    get,
    path = "/users/{id}/edit",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Edit form", body = UserFormView),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "editUser"
)]
#[get("/users/{id}/edit")]
pub async fn edit_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserFormView>> {
    let id = user_id(&path)?;
    let user = state.users.find(id).await?;
    Ok(web::Json(UserFormView::edit_form(
        id,
        user.to_draft().into(),
        FieldErrors::new(),
    )))
}

/// Replace every whitelisted field of an existing user.
#[utoipa::path(
    method(put, patch),
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserParams,
    responses(
        (status = 303, description = "Updated; redirects to the collection"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = UserFormView)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[route("/users/{id}", method = "PUT", method = "PATCH")]
pub async fn update_user(
    state: web::Data<HttpState>,
    flash: FlashContext,
    path: web::Path<String>,
    payload: web::Json<UserParams>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    match state.users_command.update(id, draft).await? {
        UserWriteOutcome::Saved(_) => {
            flash.set(Flash::success(UPDATED))?;
            Ok(see_other(USERS_PATH))
        }
        UserWriteOutcome::Invalid { draft, errors } => Ok(unprocessable(
            &UserFormView::edit_form(id, draft.into(), errors),
        )),
    }
}

/// Delete a user and every score it owns.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 303, description = "Deleted; redirects to the collection"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    flash: FlashContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id(&path)?;
    let deletion = state.users_command.delete(id).await?;
    info!(
        user_id = %deletion.id,
        removed_scores = deletion.removed_scores,
        "user deleted"
    );
    flash.set(Flash::success(DELETED))?;
    Ok(see_other(USERS_PATH))
}

#[cfg(test)]
mod tests;
