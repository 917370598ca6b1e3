//! Tests for the account service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockall::predicate::always;
use rstest::{fixture, rstest};
use url::Url;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    AvatarGeneratorError, MockAccountGateway, MockAvatarGenerator, MockUserProfileRepository,
};

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "correct-horse";

type Service = AccountService<MockAccountGateway, MockUserProfileRepository, MockAvatarGenerator>;

fn service(
    accounts: MockAccountGateway,
    profiles: MockUserProfileRepository,
    avatars: MockAvatarGenerator,
) -> Service {
    AccountService::new(Arc::new(accounts), Arc::new(profiles), Arc::new(avatars))
}

#[fixture]
fn account() -> Account {
    Account {
        id: AccountId::new("account1").expect("valid id"),
        email: EMAIL.to_owned(),
        name: "ada".to_owned(),
        created_at: Utc.with_ymd_and_hms(2024, 11, 9, 12, 0, 0).single().expect("valid time"),
    }
}

#[fixture]
fn session() -> Session {
    Session {
        id: crate::domain::SessionId::new("session1").expect("valid id"),
        account_id: AccountId::new("account1").expect("valid id"),
        expires_at: Utc.with_ymd_and_hms(2025, 11, 9, 12, 0, 0).single().expect("valid time"),
        current: true,
    }
}

fn avatar_url() -> Url {
    Url::parse("https://cloud.appwrite.io/v1/avatars/initials?name=ada").expect("valid url")
}

fn profile_for(account: &Account) -> UserProfile {
    UserProfile {
        id: DocumentId::new("profile1").expect("valid id"),
        account_id: account.id.clone(),
        email: account.email.clone(),
        username: account.name.clone(),
        avatar: avatar_url(),
    }
}

#[rstest]
#[tokio::test]
async fn create_user_links_profile_to_new_account(account: Account, session: Session) {
    let created = account.clone();
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_create_account()
        .times(1)
        .withf(|new| new.credentials.email() == EMAIL && new.name == "ada")
        .return_once(move |_| Ok(created));
    accounts
        .expect_create_email_session()
        .times(1)
        .return_once(move |_| Ok(session));

    let mut avatars = MockAvatarGenerator::new();
    avatars
        .expect_initials_url()
        .withf(|name| name == "ada")
        .return_once(|_| Ok(avatar_url()));

    let mut profiles = MockUserProfileRepository::new();
    profiles
        .expect_create()
        .times(1)
        .return_once(|profile| Ok(profile.clone().into_profile()));

    let profile = service(accounts, profiles, avatars)
        .create_user(EMAIL, PASSWORD, " ada ")
        .await
        .expect("registration succeeds");

    assert_eq!(profile.account_id, account.id);
    assert_eq!(profile.username, "ada");
    assert_eq!(profile.avatar, avatar_url());
}

#[rstest]
#[tokio::test]
async fn create_user_rejects_invalid_input_before_calling_backend() {
    let mut accounts = MockAccountGateway::new();
    accounts.expect_create_account().times(0);

    let error = service(
        accounts,
        MockUserProfileRepository::new(),
        MockAvatarGenerator::new(),
    )
    .create_user("not-an-email", PASSWORD, "ada")
    .await
    .expect_err("invalid email");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
}

#[rstest]
#[tokio::test]
async fn create_user_surfaces_existing_account_as_validation_failure() {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_create_account()
        .return_once(|_| Err(AccountGatewayError::conflict("user_already_exists")));
    accounts.expect_create_email_session().times(0);

    let error = service(
        accounts,
        MockUserProfileRepository::new(),
        MockAvatarGenerator::new(),
    )
    .create_user(EMAIL, PASSWORD, "ada")
    .await
    .expect_err("duplicate account");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert!(
        error
            .cause()
            .is_some_and(|cause| cause.contains("user_already_exists"))
    );
}

#[rstest]
#[tokio::test]
async fn create_user_keeps_account_when_profile_write_fails(account: Account, session: Session) {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_create_account()
        .return_once(move |_| Ok(account));
    accounts
        .expect_create_email_session()
        .return_once(move |_| Ok(session));

    let mut avatars = MockAvatarGenerator::new();
    avatars
        .expect_initials_url()
        .return_once(|_| Ok(avatar_url()));

    let mut profiles = MockUserProfileRepository::new();
    profiles
        .expect_create()
        .return_once(|_| Err(UserProfileRepositoryError::transport("status 503")));

    let error = service(accounts, profiles, avatars)
        .create_user(EMAIL, PASSWORD, "ada")
        .await
        .expect_err("profile write fails");

    assert_eq!(error.code(), ErrorCode::Unknown);
}

#[rstest]
#[tokio::test]
async fn create_user_writes_no_profile_when_sign_in_fails(account: Account) {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_create_account()
        .times(1)
        .return_once(move |_| Ok(account));
    accounts
        .expect_create_email_session()
        .times(1)
        .return_once(|_| Err(AccountGatewayError::unauthorized("user_invalid_credentials")));

    let mut avatars = MockAvatarGenerator::new();
    avatars
        .expect_initials_url()
        .return_once(|_| Ok(avatar_url()));

    let mut profiles = MockUserProfileRepository::new();
    profiles.expect_create().times(0);

    let error = service(accounts, profiles, avatars)
        .create_user(EMAIL, PASSWORD, "ada")
        .await
        .expect_err("sign in fails");

    assert_eq!(error.code(), ErrorCode::AuthFailed);
}

#[rstest]
#[tokio::test]
async fn create_user_stops_when_avatar_url_cannot_be_built(account: Account) {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_create_account()
        .return_once(move |_| Ok(account));
    accounts.expect_create_email_session().times(0);

    let mut avatars = MockAvatarGenerator::new();
    avatars
        .expect_initials_url()
        .return_once(|_| Err(AvatarGeneratorError::invalid_url("cannot-be-a-base")));

    let mut profiles = MockUserProfileRepository::new();
    profiles.expect_create().times(0);

    let error = service(accounts, profiles, avatars)
        .create_user(EMAIL, PASSWORD, "ada")
        .await
        .expect_err("avatar url fails");

    assert_eq!(error.code(), ErrorCode::Unknown);
    assert!(
        error
            .cause()
            .is_some_and(|cause| cause.contains("cannot-be-a-base"))
    );
}

#[rstest]
#[case(AccountGatewayError::unauthorized("user_invalid_credentials"), ErrorCode::AuthFailed)]
#[case(AccountGatewayError::transport("connection reset"), ErrorCode::Unknown)]
#[tokio::test]
async fn sign_in_maps_gateway_errors(
    #[case] failure: AccountGatewayError,
    #[case] expected: ErrorCode,
) {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_create_email_session()
        .with(always())
        .return_once(move |_| Err(failure));

    let error = service(
        accounts,
        MockUserProfileRepository::new(),
        MockAvatarGenerator::new(),
    )
    .sign_in(EMAIL, PASSWORD)
    .await
    .expect_err("sign in fails");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[case::unauthorized(AccountGatewayError::unauthorized("general_unauthorized_scope"))]
#[case::not_found(AccountGatewayError::not_found("user_not_found"))]
#[tokio::test]
async fn get_current_user_is_none_without_session(#[case] failure: AccountGatewayError) {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_current_account()
        .return_once(move || Err(failure));
    let mut profiles = MockUserProfileRepository::new();
    profiles.expect_find_by_account().times(0);

    let user = service(accounts, profiles, MockAvatarGenerator::new())
        .get_current_user()
        .await
        .expect("not signed in is not an error");

    assert!(user.is_none());
}

#[rstest]
#[tokio::test]
async fn get_current_user_is_none_without_profile(account: Account) {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_current_account()
        .return_once(move || Ok(account));
    let mut profiles = MockUserProfileRepository::new();
    profiles
        .expect_find_by_account()
        .times(1)
        .return_once(|_| Ok(None));

    let user = service(accounts, profiles, MockAvatarGenerator::new())
        .get_current_user()
        .await
        .expect("orphaned account is not an error");

    assert!(user.is_none());
}

#[rstest]
#[tokio::test]
async fn get_current_user_returns_matching_profile(account: Account) {
    let expected = profile_for(&account);
    let returned = expected.clone();
    let account_id = account.id.clone();
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_current_account()
        .return_once(move || Ok(account));
    let mut profiles = MockUserProfileRepository::new();
    profiles
        .expect_find_by_account()
        .withf(move |id| *id == account_id)
        .return_once(move |_| Ok(Some(returned)));

    let user = service(accounts, profiles, MockAvatarGenerator::new())
        .get_current_user()
        .await
        .expect("lookup succeeds");

    assert_eq!(user, Some(expected));
}

#[rstest]
#[tokio::test]
async fn get_current_user_propagates_transport_failures() {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_current_account()
        .return_once(|| Err(AccountGatewayError::transport("dns failure")));

    let error = service(
        accounts,
        MockUserProfileRepository::new(),
        MockAvatarGenerator::new(),
    )
    .get_current_user()
    .await
    .expect_err("transport failures propagate");

    assert_eq!(error.code(), ErrorCode::Unknown);
}

#[rstest]
#[tokio::test]
async fn sign_out_deletes_current_session(session: Session) {
    let expected_id = session.id.clone();
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_current_session()
        .return_once(move || Ok(session));
    accounts
        .expect_delete_current_session()
        .times(1)
        .return_once(|| Ok(()));

    let outcome = service(
        accounts,
        MockUserProfileRepository::new(),
        MockAvatarGenerator::new(),
    )
    .sign_out()
    .await
    .expect("sign out succeeds");

    assert_eq!(outcome, SignOutOutcome::SessionDeleted(expected_id));
}

#[rstest]
#[tokio::test]
async fn sign_out_without_session_is_a_no_op() {
    let mut accounts = MockAccountGateway::new();
    accounts
        .expect_current_session()
        .return_once(|| Err(AccountGatewayError::unauthorized("no session")));
    accounts.expect_delete_current_session().times(0);

    let outcome = service(
        accounts,
        MockUserProfileRepository::new(),
        MockAvatarGenerator::new(),
    )
    .sign_out()
    .await
    .expect("no session is not an error");

    assert_eq!(outcome, SignOutOutcome::NoActiveSession);
}
