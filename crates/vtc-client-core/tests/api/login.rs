use crate::helpers::{no_cb, spawn_app, LoginBehaviour, TestAppBuilder, TEST_USERNAME};
use std::sync::atomic::Ordering;
use vtc_client_core::AuthState;
use vtc_shared::{req_args::LoginReqArgs, uac::PermissionEvaluator};

#[tokio::test]
async fn login_success_with_embedded_user() {
    // Arrange
    let app = spawn_app().await;
    assert!(app.core_client.is_auth_loading(), "starts out loading");

    // Act
    app.login().await.unwrap();

    // Assert
    assert!(app.core_client.is_logged_in());
    let user = app.core_client.user_info().unwrap();
    assert_eq!(user.username.as_ref(), TEST_USERNAME);
    let evaluator = PermissionEvaluator::new(Some(user.as_ref()));
    assert!(evaluator.has_permission("view_drivers"));
    assert!(evaluator.has_permission("delete_drivers"));
    assert_eq!(app.backend.me_hits.load(Ordering::SeqCst), 0);
    assert_eq!(
        app.storage.peek(),
        app.core_client.auth_state().token().cloned(),
        "token persisted by the session store"
    );
    assert!(app.storage.peek().is_some());
}

#[tokio::test]
async fn login_without_user_fetches_current_user() {
    // Arrange
    let app = TestAppBuilder::default()
        .login(LoginBehaviour::TokenOnly)
        .spawn()
        .await;

    // Act
    app.login().await.unwrap();

    // Assert
    assert!(app.core_client.is_logged_in());
    assert_eq!(app.backend.me_hits.load(Ordering::SeqCst), 1);
    let authorization = app.backend.last_authorization().unwrap();
    assert!(authorization.starts_with("Bearer "), "{authorization}");
    assert_eq!(
        app.core_client.user_info().unwrap().partner_id,
        Some(4.into())
    );
}

#[tokio::test]
async fn login_failure_invalid_credentials() {
    // Arrange
    let app = spawn_app().await;
    let login_args = LoginReqArgs::new("random-username", "random-password".to_string().into());

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Invalid credentials");
    assert_eq!(app.core_client.auth_state(), AuthState::Unauthenticated);
    assert!(app.storage.peek().is_none());
}

#[tokio::test]
async fn login_failure_missing_token() {
    // Arrange
    let app = TestAppBuilder::default()
        .login(LoginBehaviour::NoToken)
        .spawn()
        .await;

    // Act
    let outcome = app.login().await;

    // Assert
    assert!(outcome.is_err());
    assert!(!app.core_client.is_logged_in());
    assert!(!app.core_client.is_auth_loading());
}

#[tokio::test]
async fn login_bumps_revision() {
    // Arrange
    let app = spawn_app().await;
    let before = app.core_client.auth_revision();

    // Act
    app.login().await.unwrap();

    // Assert - Start and success
    assert_eq!(app.core_client.auth_revision(), before + 2);
}

#[tokio::test]
async fn dropped_receiver_still_updates_state() {
    // Arrange
    let app = spawn_app().await;
    let (notify_tx, notify_rx) = futures::channel::oneshot::channel::<()>();

    // Act
    drop(app.core_client.login(app.login_args(), move || {
        let _ = notify_tx.send(());
    }));
    notify_rx.await.unwrap();

    // Assert
    assert!(app.core_client.is_logged_in());
    assert!(app.address.ends_with("/api"));
}
