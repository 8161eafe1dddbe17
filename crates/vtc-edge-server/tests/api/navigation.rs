use crate::helpers::{
    expired_token, location, spawn_app, spawn_app_with, valid_token, APP_JS, INDEX_HTML,
};
use rstest::rstest;
use vtc_edge_server::UnlistedPolicy;

#[tokio::test]
async fn protected_page_without_credential_redirects_to_login() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate("/drivers").await;

    // Assert
    assert_eq!(response.status().as_u16(), 307);
    assert_eq!(location(&response), Some("/login?redirect=%2Fdrivers"));
}

#[tokio::test]
async fn query_string_is_not_part_of_the_redirect() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate("/agents/3?tab=history").await;

    // Assert
    assert_eq!(location(&response), Some("/login?redirect=%2Fagents%2F3"));
}

#[rstest]
#[case::root("/")]
#[case::list("/drivers")]
#[case::nested("/evaluations/12/edit")]
#[tokio::test]
async fn protected_page_with_valid_cookie_gets_dashboard(#[case] path: &str) {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate_with_cookie(path, &valid_token()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), INDEX_HTML);
}

#[tokio::test]
async fn bearer_token_is_accepted_without_cookie() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate_with_bearer("/partners", &valid_token()).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}

#[rstest]
#[case::expired(expired_token())]
#[case::malformed("a.%%%.c".to_string())]
#[tokio::test]
async fn unusable_cookie_redirects(#[case] token: String) {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate_with_cookie("/admin/roles", &token).await;

    // Assert
    assert_eq!(response.status().as_u16(), 307);
    assert_eq!(location(&response), Some("/login?redirect=%2Fadmin%2Froles"));
}

#[rstest]
#[case::login("/login")]
#[case::forgot_password("/forgot-password")]
#[tokio::test]
async fn public_pages_are_served_without_credential(#[case] path: &str) {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate(path).await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), INDEX_HTML);
}

#[tokio::test]
async fn assets_are_served_without_credential() {
    // Arrange
    let app = spawn_app_with(|c| c.navigation.unlisted = UnlistedPolicy::Deny).await;

    // Act
    let response = app.navigate("/app.js").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), APP_JS);
}

#[rstest]
#[case::allow(UnlistedPolicy::Allow, 200)]
#[case::deny(UnlistedPolicy::Deny, 307)]
#[tokio::test]
async fn unlisted_paths_follow_policy(#[case] policy: UnlistedPolicy, #[case] expected: u16) {
    // Arrange
    let app = spawn_app_with(|c| c.navigation.unlisted = policy).await;

    // Act
    let response = app.navigate("/help").await;

    // Assert
    assert_eq!(response.status().as_u16(), expected);
}

#[tokio::test]
async fn configured_prefixes_replace_defaults() {
    // Arrange
    let app = spawn_app_with(|c| {
        c.navigation.protected_prefixes = vec!["/reports".to_string()];
        c.navigation.login_path = "/sign-in".to_string();
        c.navigation.redirect_param = "next".to_string();
    })
    .await;

    // Act
    let open = app.navigate("/drivers").await;
    let closed = app.navigate("/reports/weekly").await;

    // Assert
    assert_eq!(open.status().as_u16(), 200);
    assert_eq!(location(&closed), Some("/sign-in?next=%2Freports%2Fweekly"));
}

#[tokio::test]
async fn non_navigation_methods_are_not_redirected() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .http_client
        .post(format!("{}/drivers", app.address))
        .send()
        .await
        .expect("failed to execute request");

    // Assert
    assert_ne!(response.status().as_u16(), 307);
    assert_eq!(location(&response), None);
}
