use crate::helpers::{no_cb, spawn_app, TestAppBuilder};
use std::sync::atomic::Ordering;
use vtc_client_core::AuthState;

#[tokio::test]
async fn logout_clears_session_and_token() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    let token = app.core_client.auth_state().token().cloned().unwrap();

    // Act
    let outcome = app.core_client.logout(no_cb).await.unwrap();

    // Assert
    outcome.unwrap();
    assert_eq!(app.core_client.auth_state(), AuthState::Unauthenticated);
    assert!(app.core_client.user_info().is_none());
    assert!(app.storage.peek().is_none());
    assert_eq!(
        app.backend.last_authorization(),
        Some(format!("Bearer {}", token.expose())),
        "the backend is told which token to revoke"
    );
}

#[tokio::test]
async fn logout_clears_local_state_when_backend_fails() {
    // Arrange
    let app = TestAppBuilder::default().logout_fails().spawn().await;
    app.login().await.unwrap();

    // Act
    let outcome = app.core_client.logout(no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Could not revoke token");
    assert!(!app.core_client.is_logged_in());
    assert!(app.storage.peek().is_none());
    assert_eq!(app.backend.logout_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn logout_no_wait_clears_state_immediately() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    app.core_client.logout_no_wait();

    // Assert
    assert!(!app.core_client.is_logged_in());
    assert!(app.storage.peek().is_none());
}
