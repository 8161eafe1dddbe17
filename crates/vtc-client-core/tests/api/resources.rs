use crate::helpers::{no_cb, spawn_app};
use serde_json::json;
use vtc_shared::{
    const_config::uac::UAC_AGENT_UPDATE,
    req_args::PageReqArgs,
    resource::{AgentSummary, Paginated, ResourceKind, ResourceRecord},
    uac::PermissionEvaluator,
};

#[tokio::test]
async fn list_page_sends_bearer_and_query() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();
    let args = PageReqArgs::default().page(2).per_page(2).search("sa");

    // Act
    let page: Paginated<ResourceRecord> = app
        .core_client
        .list_page(ResourceKind::Drivers, &args, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 42);
    assert_eq!(page.page_count(), 21);
    assert_eq!(page.items[1].display_field("first_name"), "Sara");
    assert!(app
        .backend
        .last_authorization()
        .unwrap()
        .starts_with("Bearer "));
    let query = app.backend.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query, "page=2&per_page=2&search=sa");
}

#[tokio::test]
async fn agent_detail_feeds_ownership_check() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    let agent: AgentSummary = app
        .core_client
        .get_one(ResourceKind::Agents, 12.into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let user = app.core_client.evaluator_snapshot().unwrap();
    let evaluator = PermissionEvaluator::new(Some(user.as_ref()));
    assert_eq!(agent.id, Some(12.into()));
    assert!(
        !evaluator.can_act_on(&UAC_AGENT_UPDATE, &agent),
        "test user has no agent permissions"
    );
}

#[tokio::test]
async fn missing_record_surfaces_message() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    let outcome = app
        .core_client
        .get_one::<AgentSummary, _>(ResourceKind::Agents, 404.into(), no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome.unwrap_err().to_string(), "Agent not found");
}

#[tokio::test]
async fn delete_succeeds() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    let outcome = app
        .core_client
        .delete(ResourceKind::Drivers, 1.into(), no_cb)
        .await
        .unwrap();

    // Assert
    outcome.unwrap();
}

#[tokio::test]
async fn create_returns_the_new_record() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    let created: Option<ResourceRecord> = app
        .core_client
        .create(
            ResourceKind::Drivers,
            &json!({"first_name": "Nadia", "last_name": "Tazi"}),
            no_cb,
        )
        .await
        .unwrap()
        .unwrap();

    // Assert
    let created = created.expect("backend echoes the record");
    assert_eq!(created.id(), Some(77.into()));
    assert_eq!(created.display_field("first_name"), "Nadia");
    assert!(app.backend.last_authorization().is_some());
}

#[tokio::test]
async fn update_without_record_sent_back() {
    // Arrange
    let app = spawn_app().await;
    app.login().await.unwrap();

    // Act
    let updated: Option<AgentSummary> = app
        .core_client
        .update(ResourceKind::Agents, 12.into(), &json!({"phone": "0600"}), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(updated, None);
}
