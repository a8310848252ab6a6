//! Tests for the score service.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::UserId;
use crate::domain::ports::MockScoreRepository;
use crate::test_support::{MutableClock, fixture_timestamp};

fn make_service(repo: MockScoreRepository) -> ScoreService<MockScoreRepository> {
    ScoreService::new(Arc::new(repo), Arc::new(MutableClock::default()))
}

fn owned_draft(owner: i64) -> ScoreDraft {
    ScoreDraft {
        name: Some("Enigma Variations".into()),
        composer: Some("Elgar".into()),
        arranger: None,
        grade: Some("5".into()),
        user_id: Some(UserId::new(owner)),
    }
}

#[rstest]
#[tokio::test]
async fn create_persists_score_for_existing_owner() {
    let mut repo = MockScoreRepository::new();
    repo.expect_insert()
        .withf(|record, now| record.user_id() == Some(UserId::new(1)) && *now == fixture_timestamp())
        .times(1)
        .returning(|record, now| Ok(Score::from_parts(ScoreId::new(10), record.clone(), now, now)));

    let score = make_service(repo)
        .create(owned_draft(1))
        .await
        .expect("create succeeds")
        .saved()
        .expect("saved");
    assert_eq!(score.composer(), Some("Elgar"));
}

#[rstest]
#[tokio::test]
async fn missing_owner_becomes_a_field_error() {
    let mut repo = MockScoreRepository::new();
    repo.expect_insert()
        .times(1)
        .returning(|record, _| {
            Err(ScoreRepositoryError::missing_owner(
                record.user_id().map_or(0, UserId::get),
            ))
        });

    let outcome = make_service(repo)
        .create(owned_draft(77))
        .await
        .expect("missing owner is recoverable");
    let errors = outcome.errors().expect("invalid outcome");
    assert_eq!(errors.messages("userId"), [MISSING_OWNER_MESSAGE.to_owned()]);
}

#[rstest]
#[tokio::test]
async fn update_applies_monotonic_timestamp() {
    let ahead = fixture_timestamp() + TimeDelta::seconds(30);
    let mut repo = MockScoreRepository::new();
    repo.expect_find_by_id().returning(move |id| {
        Ok(Some(Score::from_row(
            id.get(),
            None,
            Some("Old".into()),
            None,
            None,
            None,
            ahead - TimeDelta::hours(2),
            ahead,
        )))
    });
    repo.expect_update()
        .withf(move |_, _, updated_at| *updated_at == ahead)
        .times(1)
        .returning(|id, record, updated_at| {
            Ok(Some(Score::from_parts(id, record.clone(), updated_at, updated_at)))
        });

    make_service(repo)
        .update(ScoreId::new(5), owned_draft(1))
        .await
        .expect("update succeeds");
}

#[rstest]
#[tokio::test]
async fn update_of_missing_score_is_not_found() {
    let mut repo = MockScoreRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let error = make_service(repo)
        .update(ScoreId::new(5), owned_draft(1))
        .await
        .expect_err("missing score");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_scores(#[case] existed: bool, #[case] expected: Option<ErrorCode>) {
    let mut repo = MockScoreRepository::new();
    repo.expect_delete().return_once(move |_| Ok(existed));

    let result = make_service(repo).delete(ScoreId::new(8)).await;
    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn connection_failure_is_service_unavailable() {
    let mut repo = MockScoreRepository::new();
    repo.expect_find_by_id()
        .return_once(|_| Err(ScoreRepositoryError::connection("pool timed out")));

    let error = make_service(repo)
        .find(ScoreId::new(1))
        .await
        .expect_err("store down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
