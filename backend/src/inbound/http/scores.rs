//! Scores resource handlers.
//!
//! Mirrors the users resource under `/scores`. Search keys are
//! `search[name]`, `search[composer]`, `search[arranger]` and
//! `search[grade]`; the body wraps attributes under a required `score` key.

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, route, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::ScoreWriteOutcome;
use crate::domain::query::{ScoreQuery, ScoreSearch, SortOrder};
use crate::domain::{Error, FieldErrors, Score, ScoreDraft, ScoreId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::flash::{Flash, FlashContext};
use crate::inbound::http::responses::{see_other, unprocessable};
use crate::inbound::http::schemas::{ErrorSchema, ScoreSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_sort, require_param, search_token,
};

const SCORES_PATH: &str = "/scores";
const SAVED: &str = "Score was successfully saved.";
const SAVE_FAILED: &str = "Score could not be saved.";
const UPDATED: &str = "Score was successfully updated.";
const DELETED: &str = "Score was successfully deleted.";

/// Whitelisted score attributes. Unknown keys are dropped by serde.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreForm {
    #[schema(example = "Enigma Variations")]
    pub name: Option<String>,
    #[schema(example = "Elgar")]
    pub composer: Option<String>,
    pub arranger: Option<String>,
    #[schema(example = "5")]
    pub grade: Option<String>,
    /// Owning user; must reference an existing user when present.
    pub user_id: Option<i64>,
}

impl From<ScoreForm> for ScoreDraft {
    fn from(form: ScoreForm) -> Self {
        Self {
            name: form.name,
            composer: form.composer,
            arranger: form.arranger,
            grade: form.grade,
            user_id: form.user_id.map(UserId::new),
        }
    }
}

impl From<ScoreDraft> for ScoreForm {
    fn from(draft: ScoreDraft) -> Self {
        Self {
            name: draft.name,
            composer: draft.composer,
            arranger: draft.arranger,
            grade: draft.grade,
            user_id: draft.user_id.map(UserId::get),
        }
    }
}

/// Request body wrapping the score attributes under a required `score` key.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ScoreParams {
    pub score: Option<ScoreForm>,
}

impl ScoreParams {
    fn into_draft(self) -> Result<ScoreDraft, Error> {
        require_param(self.score, FieldName::new("score")).map(ScoreDraft::from)
    }
}

/// Collection view returned by `GET /scores`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreIndexView {
    #[schema(value_type = Vec<ScoreSchema>)]
    pub scores: Vec<Score>,
    #[schema(value_type = Object)]
    pub search: ScoreSearch,
    #[schema(value_type = String, example = "created")]
    pub sort: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

/// Form view for creating or editing a score.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreFormView {
    pub score: ScoreForm,
    #[schema(value_type = Object)]
    pub errors: FieldErrors,
    pub action: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

impl ScoreFormView {
    fn new_form(score: ScoreForm, errors: FieldErrors) -> Self {
        Self {
            score,
            errors,
            action: SCORES_PATH.to_owned(),
            method: "post".to_owned(),
            flash: None,
        }
    }

    fn edit_form(id: ScoreId, score: ScoreForm, errors: FieldErrors) -> Self {
        Self {
            score,
            errors,
            action: format!("{SCORES_PATH}/{id}"),
            method: "patch".to_owned(),
            flash: None,
        }
    }
}

fn score_id(raw: &str) -> Result<ScoreId, Error> {
    parse_id(raw, FieldName::new("id"))
}

fn score_search(params: &HashMap<String, String>) -> ScoreSearch {
    ScoreSearch {
        name: search_token(params, "name"),
        composer: search_token(params, "composer"),
        arranger: search_token(params, "arranger"),
        grade: search_token(params, "grade"),
    }
}

/// List scores narrowed by the optional search tokens.
#[utoipa::path(
    get,
    path = "/scores",
    params(
        ("search[name]" = Option<String>, Query, description = "Substring of the title"),
        ("search[composer]" = Option<String>, Query, description = "Substring of the composer"),
        ("search[arranger]" = Option<String>, Query, description = "Substring of the arranger"),
        ("search[grade]" = Option<String>, Query, description = "Substring of the grade"),
        ("sort" = Option<String>, Query, description = "`name` or `created`")
    ),
    responses(
        (status = 200, description = "Scores", body = ScoreIndexView),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["scores"],
    operation_id = "listScores"
)]
#[get("/scores")]
pub async fn list_scores(
    state: web::Data<HttpState>,
    flash: FlashContext,
    params: web::Query<HashMap<String, String>>,
) -> ApiResult<web::Json<ScoreIndexView>> {
    let search = score_search(&params);
    let sort = parse_sort(&params)?;
    let scores = state
        .scores
        .list(ScoreQuery::all().search(&search).order_by(sort))
        .await?;
    Ok(web::Json(ScoreIndexView {
        scores,
        search,
        sort,
        flash: flash.take(),
    }))
}

/// Render an empty creation form.
#[utoipa::path(
    get,
    path = "/scores/new",
    responses((status = 200, description = "Empty form", body = ScoreFormView)),
    tags = ["scores"],
    operation_id = "newScore"
)]
#[get("/scores/new")]
pub async fn new_score() -> web::Json<ScoreFormView> {
    web::Json(ScoreFormView::new_form(
        ScoreForm::default(),
        FieldErrors::new(),
    ))
}

/// Create a score from whitelisted input.
#[utoipa::path(
    post,
    path = "/scores",
    request_body = ScoreParams,
    responses(
        (status = 303, description = "Saved; redirects to the collection"),
        (status = 400, description = "Missing `score` parameter", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ScoreFormView)
    ),
    tags = ["scores"],
    operation_id = "createScore"
)]
#[post("/scores")]
pub async fn create_score(
    state: web::Data<HttpState>,
    flash: FlashContext,
    payload: web::Json<ScoreParams>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    match state.scores_command.create(draft).await? {
        ScoreWriteOutcome::Saved(score) => {
            info!(score_id = %score.id(), "score created");
            flash.set(Flash::success(SAVED))?;
            Ok(see_other(SCORES_PATH))
        }
        ScoreWriteOutcome::Invalid { draft, errors } => {
            let mut view = ScoreFormView::new_form(draft.into(), errors);
            view.flash = Some(Flash::danger(SAVE_FAILED));
            Ok(unprocessable(&view))
        }
    }
}

/// Fetch a single score.
#[utoipa::path(
    get,
    path = "/scores/{id}",
    params(("id" = i64, Path, description = "Score identifier")),
    responses(
        (status = 200, description = "Score", body = ScoreSchema),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["scores"],
    operation_id = "showScore"
)]
#[get("/scores/{id}")]
pub async fn show_score(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Score>> {
    let id = score_id(&path)?;
    Ok(web::Json(state.scores.find(id).await?))
}

/// Render the edit form prefilled with the stored values.
#[utoipa::path(
    get,
    path = "/scores/{id}/edit",
    params(("id" = i64, Path, description = "Score identifier")),
    responses(
        (status = 200, description = "Edit form", body = ScoreFormView),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["scores"],
    operation_id = "editScore"
)]
#[get("/scores/{id}/edit")]
pub async fn edit_score(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ScoreFormView>> {
    let id = score_id(&path)?;
    let score = state.scores.find(id).await?;
    Ok(web::Json(ScoreFormView::edit_form(
        id,
        score.to_draft().into(),
        FieldErrors::new(),
    )))
}

/// Replace every whitelisted field of an existing score.
#[utoipa::path(
    method(put, patch),
    path = "/scores/{id}",
    params(("id" = i64, Path, description = "Score identifier")),
    request_body = ScoreParams,
    responses(
        (status = 303, description = "Updated; redirects to the collection"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ScoreFormView)
    ),
    tags = ["scores"],
    operation_id = "updateScore"
)]
#[route("/scores/{id}", method = "PUT", method = "PATCH")]
pub async fn update_score(
    state: web::Data<HttpState>,
    flash: FlashContext,
    path: web::Path<String>,
    payload: web::Json<ScoreParams>,
) -> ApiResult<HttpResponse> {
    let id = score_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    match state.scores_command.update(id, draft).await? {
        ScoreWriteOutcome::Saved(_) => {
            flash.set(Flash::success(UPDATED))?;
            Ok(see_other(SCORES_PATH))
        }
        ScoreWriteOutcome::Invalid { draft, errors } => Ok(unprocessable(
            &ScoreFormView::edit_form(id, draft.into(), errors),
        )),
    }
}

/// Delete a single score.
#[utoipa::path(
    delete,
    path = "/scores/{id}",
    params(("id" = i64, Path, description = "Score identifier")),
    responses(
        (status = 303, description = "Deleted; redirects to the collection"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["scores"],
    operation_id = "deleteScore"
)]
#[delete("/scores/{id}")]
pub async fn delete_score(
    state: web::Data<HttpState>,
    flash: FlashContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = score_id(&path)?;
    state.scores_command.delete(id).await?;
    info!(score_id = %id, "score deleted");
    flash.set(Flash::success(DELETED))?;
    Ok(see_other(SCORES_PATH))
}

#[cfg(test)]
#[path = "scores_tests.rs"]
mod tests;
