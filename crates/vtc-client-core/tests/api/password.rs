use crate::helpers::{no_cb, spawn_app};
use std::sync::atomic::Ordering;
use vtc_shared::req_args::auth::{ForgotPasswordReqArgs, ResetPasswordReqArgs, VerifyOtpReqArgs};

const EMAIL: &str = "amina@example.com";

#[tokio::test]
async fn recovery_flow_succeeds() {
    // Arrange
    let app = spawn_app().await;
    let reset = ResetPasswordReqArgs {
        email: EMAIL.to_string(),
        otp: "123456".to_string(),
        new_password: "new-secret".to_string().into(),
        new_password_check: "new-secret".to_string().into(),
    };

    // Act
    let forgot = app
        .core_client
        .forgot_password(
            &ForgotPasswordReqArgs {
                email: EMAIL.to_string(),
            },
            no_cb,
        )
        .await
        .unwrap();
    let verify = app
        .core_client
        .verify_otp(
            &VerifyOtpReqArgs {
                email: EMAIL.to_string(),
                otp: "123456".to_string(),
            },
            no_cb,
        )
        .await
        .unwrap();
    let reset = app.core_client.reset_password(&reset, no_cb).await.unwrap();

    // Assert
    forgot.unwrap();
    verify.unwrap();
    reset.unwrap();
    assert_eq!(app.backend.other_hits.load(Ordering::SeqCst), 3);
    assert_eq!(app.backend.last_authorization(), None);
}

#[tokio::test]
async fn invalid_otp_surfaces_backend_message() {
    // Arrange
    let app = spawn_app().await;
    let args = VerifyOtpReqArgs {
        email: EMAIL.to_string(),
        otp: "000000".to_string(),
    };

    // Act
    let outcome = app.core_client.verify_otp(&args, no_cb).await.unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Invalid OTP");
}

#[tokio::test]
async fn mismatched_passwords_are_not_sent() {
    // Arrange
    let app = spawn_app().await;
    let args = ResetPasswordReqArgs {
        email: EMAIL.to_string(),
        otp: "123456".to_string(),
        new_password: "one".to_string().into(),
        new_password_check: "two".to_string().into(),
    };

    // Act
    let outcome = app.core_client.reset_password(&args, no_cb).await.unwrap();

    // Assert
    assert!(outcome.is_err());
    assert_eq!(app.backend.total_hits(), 0);
}
