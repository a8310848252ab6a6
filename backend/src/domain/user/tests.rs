//! Validation coverage for user drafts.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn policy() -> EmailPolicy {
    EmailPolicy::default()
}

fn draft(name: Option<&str>, email: Option<&str>) -> UserDraft {
    UserDraft::new(name.map(str::to_owned), email.map(str::to_owned))
}

#[rstest]
fn six_character_email_is_accepted(policy: EmailPolicy) {
    let record = draft(Some("Amy"), Some("abcdef"))
        .validate(&policy)
        .expect("six characters fit the cap");
    assert_eq!(record.email(), Some("abcdef"));
    assert_eq!(record.name(), Some("Amy"));
}

#[rstest]
fn seven_character_email_is_rejected(policy: EmailPolicy) {
    let errors = draft(Some("Amy"), Some("abcdefg"))
        .validate(&policy)
        .expect_err("seven characters exceed the cap");
    assert_eq!(
        errors.messages("email"),
        ["email is too long (maximum is 6 characters)".to_owned()]
    );
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn blank_email_is_rejected_when_required(policy: EmailPolicy, #[case] email: Option<&str>) {
    let errors = draft(None, email)
        .validate(&policy)
        .expect_err("blank email");
    assert_eq!(errors.messages("email"), ["email must not be blank".to_owned()]);
}

#[rstest]
fn blank_email_is_stored_as_null_when_optional() {
    let policy = EmailPolicy::new(false, 6);
    let record = draft(Some("Amy"), Some("  "))
        .validate(&policy)
        .expect("optional email");
    assert_eq!(record.email(), None);
}

#[rstest]
fn email_length_counts_characters_not_bytes(policy: EmailPolicy) {
    assert!(draft(None, Some("éééééé")).validate(&policy).is_ok());
}

#[rstest]
fn empty_name_is_stored_as_null(policy: EmailPolicy) {
    let record = draft(Some(""), Some("a@b.c"))
        .validate(&policy)
        .expect("valid draft");
    assert_eq!(record.name(), None);
}

#[rstest]
fn overlong_name_is_rejected(policy: EmailPolicy) {
    let long_name = "n".repeat(TEXT_COLUMN_MAX + 1);
    let errors = draft(Some(&long_name), Some("a@b.c"))
        .validate(&policy)
        .expect_err("name too long");
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name"]);
}

#[rstest]
fn policy_clamps_max_length_to_column_width() {
    assert_eq!(EmailPolicy::new(true, 10_000).max_length(), TEXT_COLUMN_MAX);
}

#[rstest]
fn user_id_parses_from_path_segment() {
    assert_eq!("42".parse::<UserId>().expect("numeric"), UserId::new(42));
    assert!("forty-two".parse::<UserId>().is_err());
}
