//! Tests for users resource handlers.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::{ScoreRepository, UserRepository};
use crate::domain::query::ScoreQuery;
use crate::domain::{EmailPolicy, ScoreDraft, UserDraft, UserId};
use crate::inbound::http::test_utils::{memory_state, resource_app, session_cookie};
use crate::outbound::memory::MemoryStore;
use crate::test_support::fixture_timestamp;

async fn seed_user(store: &Arc<MemoryStore>, name: &str, email: &str) -> UserId {
    let record = UserDraft::new(Some(name.to_owned()), Some(email.to_owned()))
        .validate(&EmailPolicy::default())
        .expect("valid seed user");
    UserRepository::insert(store.as_ref(), &record, fixture_timestamp())
        .await
        .expect("seed user")
        .id()
}

async fn seed_score(store: &Arc<MemoryStore>, name: &str, owner: UserId) {
    let record = ScoreDraft {
        name: Some(name.to_owned()),
        user_id: Some(owner),
        ..ScoreDraft::default()
    }
    .validate()
    .expect("valid seed score");
    ScoreRepository::insert(store.as_ref(), &record, fixture_timestamp())
        .await
        .expect("seed score");
}

async fn seed_people(store: &Arc<MemoryStore>) {
    seed_user(store, "John", "j@x.io").await;
    seed_user(store, "Amy", "amy@x").await;
    seed_user(store, "Joan", "joan@y").await;
}

fn names(body: &Value) -> Vec<&str> {
    body["users"]
        .as_array()
        .expect("users array")
        .iter()
        .filter_map(|user| user["name"].as_str())
        .collect()
}

fn location(res: &actix_web::dev::ServiceResponse) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

#[rstest]
#[case("/users?search%5Bname%5D=Jo", vec!["John", "Joan"])]
#[case("/users?name=Jo", vec!["John", "Joan"])]
#[case("/users?search%5Bname%5D=&search%5Bemail%5D=", vec!["John", "Amy", "Joan"])]
#[case("/users", vec!["John", "Amy", "Joan"])]
#[case("/users?search%5Bemail%5D=%40y", vec!["Joan"])]
#[case("/users?sort=name", vec!["Amy", "Joan", "John"])]
#[actix_web::test]
async fn index_applies_search_and_sort(#[case] uri: &str, #[case] expected: Vec<&str>) {
    let (state, store) = memory_state();
    seed_people(&store).await;
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(names(&body), expected);
    assert!(body.get("flash").is_none());
}

#[actix_web::test]
async fn index_rejects_unknown_sort() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users?sort=size")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "sort");
}

#[actix_web::test]
async fn create_redirects_and_flashes_once() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({"user": {"name": "John", "email": "abcdef"}}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&created), Some("/users"));
    let cookie = session_cookie(&created).expect("flash cookie");

    let index = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let cleared = session_cookie(&index).expect("flash cleared");
    let body: Value = actix_test::read_body_json(index).await;
    assert_eq!(names(&body), vec!["John"]);
    assert_eq!(body["flash"]["level"], "success");

    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(again).await;
    assert!(body.get("flash").is_none());
}

#[actix_web::test]
async fn create_drops_unlisted_fields() {
    let (state, store) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({
                "user": {"name": "Amy", "email": "amy@x", "id": 99, "admin": true},
                "extra": "ignored"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    assert!(
        UserRepository::find_by_id(store.as_ref(), UserId::new(99))
            .await
            .expect("lookup")
            .is_none()
    );
    let stored = UserRepository::find_by_id(store.as_ref(), UserId::new(1))
        .await
        .expect("lookup")
        .expect("created with a store-assigned id");
    assert_eq!(stored.name(), Some("Amy"));
}

#[actix_web::test]
async fn create_with_overlong_email_rerenders_the_form() {
    let (state, store) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({"user": {"name": "John", "email": "abcdefg"}}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"]["email"], "abcdefg");
    assert_eq!(body["action"], "/users");
    assert_eq!(body["method"], "post");
    assert_eq!(body["flash"]["level"], "danger");
    assert!(body["errors"]["email"].as_array().is_some_and(|m| !m.is_empty()));

    let stored = UserRepository::search(store.as_ref(), &crate::domain::query::UserQuery::all())
        .await
        .expect("search");
    assert!(stored.is_empty());
}

#[rstest]
#[case(json!({"name": "John"}))]
#[case(json!({"user": null}))]
#[actix_web::test]
async fn create_requires_the_user_parameter(#[case] payload: Value) {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body["message"],
        "param is missing or the value is empty: user"
    );
}

#[actix_web::test]
async fn malformed_json_is_an_invalid_request() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"user\":")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn new_form_is_empty() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/users/new").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "user": {"name": null, "email": null},
            "errors": {},
            "action": "/users",
            "method": "post"
        })
    );
}

#[actix_web::test]
async fn show_and_edit_render_the_stored_user() {
    let (state, store) = memory_state();
    let id = seed_user(&store, "Joan", "joan@y").await;
    let app = actix_test::init_service(resource_app(state)).await;

    let show = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(show.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(show).await;
    assert_eq!(body["id"], id.get());
    assert_eq!(body["email"], "joan@y");

    let edit = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/users/{id}/edit"))
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(edit).await;
    assert_eq!(body["action"], format!("/users/{id}"));
    assert_eq!(body["method"], "patch");
    assert_eq!(body["user"]["name"], "Joan");
}

#[rstest]
#[case("/users/7", StatusCode::NOT_FOUND)]
#[case("/users/7/edit", StatusCode::NOT_FOUND)]
#[case("/users/abc", StatusCode::BAD_REQUEST)]
#[case("/users/abc/edit", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn lookups_fail_cleanly(#[case] uri: &str, #[case] expected: StatusCode) {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[case::patch(actix_test::TestRequest::patch())]
#[case::put(actix_test::TestRequest::put())]
#[actix_web::test]
async fn update_replaces_fields(#[case] request: actix_test::TestRequest) {
    let (state, store) = memory_state();
    let id = seed_user(&store, "John", "j@x.io").await;
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        request
            .uri(&format!("/users/{id}"))
            .set_json(json!({"user": {"email": "jj@x"}}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/users"));

    let stored = UserRepository::find_by_id(store.as_ref(), id)
        .await
        .expect("lookup")
        .expect("still present");
    assert_eq!(stored.name(), None);
    assert_eq!(stored.email(), Some("jj@x"));
}

#[actix_web::test]
async fn invalid_update_rerenders_the_edit_form() {
    let (state, store) = memory_state();
    let id = seed_user(&store, "John", "j@x.io").await;
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/users/{id}"))
            .set_json(json!({"user": {"name": "John", "email": "much-too-long"}}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["action"], format!("/users/{id}"));
    assert!(body.get("flash").is_none());

    let stored = UserRepository::find_by_id(store.as_ref(), id)
        .await
        .expect("lookup")
        .expect("still present");
    assert_eq!(stored.email(), Some("j@x.io"));
}

#[actix_web::test]
async fn update_of_missing_user_is_not_found() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/users/5")
            .set_json(json!({"user": {"name": "Ghost", "email": "g@x"}}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn destroy_cascades_to_owned_scores() {
    let (state, store) = memory_state();
    let owner = seed_user(&store, "Amy", "amy@x").await;
    let other = seed_user(&store, "Bob", "bob@x").await;
    seed_score(&store, "Enigma", owner).await;
    seed_score(&store, "Nimrod", owner).await;
    seed_score(&store, "Jupiter", other).await;
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/users/{owner}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let remaining = ScoreRepository::search(store.as_ref(), &ScoreQuery::all())
        .await
        .expect("search");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.first().and_then(|s| s.user_id()), Some(other));
}

#[actix_web::test]
async fn destroying_a_missing_user_is_not_found() {
    let (state, _) = memory_state();
    let app = actix_test::init_service(resource_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/users/404").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "user 404 not found");
}
