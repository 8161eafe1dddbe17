use crate::helpers::{
    expired_token, no_cb, spawn_app, unreachable_client, valid_token, MeBehaviour, TestAppBuilder,
};
use rstest::rstest;
use std::sync::atomic::Ordering;
use vtc_client_core::{AuthState, MemoryTokenStorage};
use vtc_shared::token::AuthToken;

#[tokio::test]
async fn no_token_is_unauthenticated_without_network_call() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let is_authenticated = app.core_client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(!is_authenticated);
    assert_eq!(app.core_client.auth_state(), AuthState::Unauthenticated);
    assert_eq!(app.backend.total_hits(), 0);
}

#[tokio::test]
async fn expired_token_is_cleared_without_network_call() {
    // Arrange
    let app = TestAppBuilder::default()
        .stored_token(expired_token())
        .spawn()
        .await;

    // Act
    let is_authenticated = app.core_client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(!is_authenticated);
    assert!(!app.core_client.is_auth_loading());
    assert!(app.storage.peek().is_none(), "expired token must be removed");
    assert_eq!(app.backend.total_hits(), 0);
}

#[tokio::test]
async fn malformed_token_is_treated_as_expired() {
    // Arrange
    let app = TestAppBuilder::default()
        .stored_token("head.!!not-base64!!.sig")
        .spawn()
        .await;

    // Act
    let is_authenticated = app.core_client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(!is_authenticated);
    assert!(app.storage.peek().is_none());
    assert_eq!(app.backend.total_hits(), 0);
}

#[rstest]
#[case::structured(valid_token())]
#[case::opaque("0b1e7c4a9f".to_string())]
#[tokio::test]
async fn valid_token_restores_session(#[case] token: String) {
    // Arrange
    let app = TestAppBuilder::default()
        .stored_token(token.clone())
        .spawn()
        .await;

    // Act
    let is_authenticated = app.core_client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(is_authenticated);
    assert_eq!(app.backend.me_hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        app.backend.last_authorization(),
        Some(format!("Bearer {token}"))
    );
    assert_eq!(
        app.core_client.auth_state().token(),
        Some(&AuthToken::try_from(token).unwrap())
    );
    assert!(app.core_client.user_info().is_some());
}

#[rstest]
#[case::unauthorized(MeBehaviour::Unauthorized)]
#[case::invalid_envelope(MeBehaviour::InvalidEnvelope)]
#[tokio::test]
async fn refused_token_is_forgotten(#[case] me: MeBehaviour) {
    // Arrange
    let app = TestAppBuilder::default()
        .stored_token(valid_token())
        .me(me)
        .spawn()
        .await;

    // Act
    let is_authenticated = app.core_client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(!is_authenticated);
    assert!(!app.core_client.is_auth_loading());
    assert!(app.storage.peek().is_none());
}

#[tokio::test]
async fn broken_backend_keeps_token() {
    // Arrange
    let app = TestAppBuilder::default()
        .stored_token(valid_token())
        .me(MeBehaviour::Broken)
        .spawn()
        .await;

    // Act
    let is_authenticated = app.core_client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(!is_authenticated);
    assert!(app.storage.peek().is_some(), "retry on next start");
}

#[tokio::test]
async fn unreachable_backend_keeps_token() {
    // Arrange
    let token = AuthToken::try_from(valid_token()).unwrap();
    let storage = MemoryTokenStorage::with_token(token.clone());
    let client = unreachable_client(storage.clone());

    // Act
    let is_authenticated = client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(!is_authenticated);
    assert_eq!(client.auth_state(), AuthState::Unauthenticated);
    assert_eq!(storage.peek(), Some(token));
}

#[tokio::test]
async fn second_check_does_not_restart_restoration() {
    // Arrange
    let app = TestAppBuilder::default()
        .stored_token(valid_token())
        .spawn()
        .await;
    let first = app.core_client.check_auth(no_cb);

    // Act
    let second = app.core_client.check_auth(no_cb).await.unwrap();

    // Assert
    assert!(!second, "still loading when the second call is made");
    assert!(first.await.unwrap());
    assert!(app.core_client.check_auth(no_cb).await.unwrap());
    assert_eq!(app.backend.me_hits.load(Ordering::SeqCst), 1);
}
