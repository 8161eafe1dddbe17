use crate::helpers::{spawn_app, TEST_VERSION};

#[tokio::test]
async fn health_check_works() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate("/health_check").await;

    // Assert
    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn version_is_reported() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.navigate("/version").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), TEST_VERSION);
}

#[tokio::test]
async fn health_check_is_open_when_unlisted_paths_are_denied() {
    // Arrange
    let app = crate::helpers::spawn_app_with(|c| {
        c.navigation.unlisted = vtc_edge_server::UnlistedPolicy::Deny;
    })
    .await;

    // Act
    let response = app.navigate("/health_check").await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}
