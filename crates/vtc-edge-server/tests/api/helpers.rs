use std::ops::Deref;
use std::path::Path;
use std::sync::LazyLock;
use tempfile::TempDir;
use uuid::Uuid;
use vtc_edge_server::{
    get_configuration,
    startup::{get_socket_address, EdgeServerBuilder},
    Configuration,
};
use vtc_shared::{
    const_config::navigation::NAV_TOKEN_COOKIE_NAME,
    telemetry::{self, build_subscriber, install_subscriber},
    token::unsigned_token_with_payload,
};

pub const INDEX_HTML: &str = "<!DOCTYPE html><title>VTC Dashboard</title>";
pub const APP_JS: &str = "console.log('dashboard');";
pub const TEST_VERSION: &str = "9.9.9-test";

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info";
    let subscriber_name = "test";
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("edge_tests{}", Uuid::new_v4());
        let (file, path) =
            telemetry::create_trace_file(Path::new(telemetry::TRACE_FOLDER), &log_file_name)
                .unwrap();
        let subscriber = build_subscriber(subscriber_name, default_filter_level, file);
        install_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = build_subscriber(subscriber_name, default_filter_level, std::io::sink);
        install_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    /// Kept so the folder lives as long as the server
    _front_end: TempDir,
}

impl TestApp {
    pub async fn navigate(&self, path: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}{path}", self.address))
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn navigate_with_cookie(&self, path: &str, token: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}{path}", self.address))
            .header(
                reqwest::header::COOKIE,
                format!("{NAV_TOKEN_COOKIE_NAME}={token}"),
            )
            .send()
            .await
            .expect("failed to execute request")
    }

    pub async fn navigate_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.http_client
            .get(format!("{}{path}", self.address))
            .bearer_auth(token)
            .send()
            .await
            .expect("failed to execute request")
    }
}

pub fn valid_token() -> String {
    unsigned_token_with_payload(&serde_json::json!({"sub": "7", "exp": 4_102_444_800u64}))
}

pub fn expired_token() -> String {
    unsigned_token_with_payload(&serde_json::json!({"sub": "7", "exp": 946_684_800u64}))
}

pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .map(|x| x.to_str().unwrap())
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Starts a server on a random port serving a freshly created front end
pub async fn spawn_app_with<F: FnOnce(&mut Configuration)>(customize: F) -> TestApp {
    start_tracing();
    let front_end = tempfile::tempdir().expect("failed to create front end folder");
    std::fs::write(front_end.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(front_end.path().join("app.js"), APP_JS).unwrap();

    let mut configuration = get_configuration().expect("failed to read configuration");
    configuration.application.port = 0;
    configuration.application.front_end_folder = front_end.path().to_path_buf();
    customize(&mut configuration);

    let addr = get_socket_address(&configuration.application).unwrap();
    let (server, port) = EdgeServerBuilder::with_configuration(configuration, TEST_VERSION)
        .build_runnable_edge_server(addr)
        .expect("failed to build edge server");
    tokio::spawn(server.run());

    let http_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        http_client,
        _front_end: front_end,
    }
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}
