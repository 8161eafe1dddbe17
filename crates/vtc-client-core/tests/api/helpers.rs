use actix_web::{dev::Server, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use uuid::Uuid;
use vtc_client_core::{Client, MemoryTokenStorage};
use vtc_shared::{
    req_args::LoginReqArgs,
    telemetry::{self, build_subscriber, install_subscriber},
    token::{unsigned_token_with_payload, AuthToken},
};

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info";
    let subscriber_name = "test";
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
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

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

pub const TEST_USERNAME: &str = "amina";
pub const TEST_PASSWORD: &str = "correct horse";

/// A structured token that expires far in the future
pub fn valid_token() -> String {
    unsigned_token_with_payload(&json!({"sub": "7", "exp": 4_102_444_800u64}))
}

pub fn expired_token() -> String {
    unsigned_token_with_payload(&json!({"sub": "7", "exp": 946_684_800u64}))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginBehaviour {
    TokenAndUser,
    TokenOnly,
    NoToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeBehaviour {
    User,
    /// HTTP 401 with an envelope
    Unauthorized,
    /// HTTP 200 but the envelope says it failed
    InvalidEnvelope,
    /// HTTP 500 with a body that is not an envelope
    Broken,
}

#[derive(Debug)]
pub struct FakeBackendState {
    pub login: LoginBehaviour,
    pub me: MeBehaviour,
    pub logout_fails: bool,
    pub login_hits: AtomicUsize,
    pub me_hits: AtomicUsize,
    pub logout_hits: AtomicUsize,
    pub other_hits: AtomicUsize,
    pub last_authorization: Mutex<Option<String>>,
    pub last_query: Mutex<Option<String>>,
}

impl FakeBackendState {
    fn new(login: LoginBehaviour, me: MeBehaviour, logout_fails: bool) -> Self {
        Self {
            login,
            me,
            logout_fails,
            login_hits: AtomicUsize::new(0),
            me_hits: AtomicUsize::new(0),
            logout_hits: AtomicUsize::new(0),
            other_hits: AtomicUsize::new(0),
            last_authorization: Mutex::new(None),
            last_query: Mutex::new(None),
        }
    }

    pub fn total_hits(&self) -> usize {
        self.login_hits.load(Ordering::SeqCst)
            + self.me_hits.load(Ordering::SeqCst)
            + self.logout_hits.load(Ordering::SeqCst)
            + self.other_hits.load(Ordering::SeqCst)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }

    fn record(&self, req: &HttpRequest) {
        *self.last_authorization.lock().unwrap() = req
            .headers()
            .get("Authorization")
            .and_then(|x| x.to_str().ok())
            .map(ToString::to_string);
        *self.last_query.lock().unwrap() = Some(req.query_string().to_string());
    }
}

pub struct TestApp {
    pub address: String,
    pub backend: Arc<FakeBackendState>,
    pub storage: MemoryTokenStorage,
    pub core_client: Client,
}

pub struct TestAppBuilder {
    login: LoginBehaviour,
    me: MeBehaviour,
    logout_fails: bool,
    stored_token: Option<String>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            login: LoginBehaviour::TokenAndUser,
            me: MeBehaviour::User,
            logout_fails: false,
            stored_token: None,
        }
    }
}

impl TestAppBuilder {
    pub fn login(mut self, login: LoginBehaviour) -> Self {
        self.login = login;
        self
    }

    pub fn me(mut self, me: MeBehaviour) -> Self {
        self.me = me;
        self
    }

    pub fn logout_fails(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    pub fn stored_token<S: Into<String>>(mut self, token: S) -> Self {
        self.stored_token = Some(token.into());
        self
    }

    pub async fn spawn(self) -> TestApp {
        LazyLock::force(&TRACING);
        let backend = Arc::new(FakeBackendState::new(
            self.login,
            self.me,
            self.logout_fails,
        ));
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let server = run_fake_backend(listener, Arc::clone(&backend));
        tokio::spawn(server);

        let address = format!("http://127.0.0.1:{port}/api");
        let storage = match self.stored_token {
            Some(token) => MemoryTokenStorage::with_token(AuthToken::try_from(token).unwrap()),
            None => MemoryTokenStorage::default(),
        };
        let core_client = Client::new(address.clone(), storage.clone());
        TestApp {
            address,
            backend,
            storage,
            core_client,
        }
    }
}

pub async fn spawn_app() -> TestApp {
    TestAppBuilder::default().spawn().await
}

impl TestApp {
    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(TEST_USERNAME, TEST_PASSWORD.to_string().into())
    }

    pub async fn login(&self) -> anyhow::Result<()> {
        self.core_client
            .login(self.login_args(), no_cb)
            .await
            .expect("failed to receive on rx")
    }
}

/// Client pointing at a port nothing listens on
pub fn unreachable_client(storage: MemoryTokenStorage) -> Client {
    LazyLock::force(&TRACING);
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Client::new(format!("http://127.0.0.1:{port}/api"), storage)
}

fn envelope(status: u16, valid: bool, message: &str, data: Value) -> Value {
    json!({
        "status": status,
        "valid": valid,
        "message": message,
        "data": data,
        "error": null,
        "timestamp": "2024-05-01T10:00:00Z",
    })
}

fn test_user() -> Value {
    json!({
        "id": 7,
        "userName": TEST_USERNAME,
        "email": "amina@example.com",
        "firstName": "Amina",
        "partnerId": 4,
        "roles": [{
            "id": 2,
            "name": "dispatcher",
            "isActive": true,
            "permissions": [
                {"guardName": "view_drivers", "name": "View drivers"},
                {"guard_name": "delete_drivers"}
            ]
        }]
    })
}

type State = web::Data<Arc<FakeBackendState>>;

async fn login(state: State, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    state.login_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    if body["username"] != TEST_USERNAME || body["password"] != TEST_PASSWORD {
        return HttpResponse::Ok().json(envelope(401, false, "Invalid credentials", Value::Null));
    }
    let data = match state.login {
        LoginBehaviour::TokenAndUser => json!({"token": valid_token(), "user": test_user()}),
        LoginBehaviour::TokenOnly => json!({"access_token": valid_token()}),
        LoginBehaviour::NoToken => json!({"user": test_user()}),
    };
    HttpResponse::Ok().json(envelope(200, true, "Logged in", data))
}

async fn me(state: State, req: HttpRequest) -> HttpResponse {
    state.me_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    if state.last_authorization().is_none() {
        return HttpResponse::Unauthorized()
            .json(envelope(401, false, "Unauthenticated", Value::Null));
    }
    match state.me {
        MeBehaviour::User => {
            HttpResponse::Ok().json(envelope(200, true, "OK", json!({"user": test_user()})))
        }
        MeBehaviour::Unauthorized => HttpResponse::Unauthorized()
            .json(envelope(401, false, "Token expired", Value::Null)),
        MeBehaviour::InvalidEnvelope => {
            HttpResponse::Ok().json(envelope(200, false, "Session revoked", Value::Null))
        }
        MeBehaviour::Broken => HttpResponse::InternalServerError().body("upstream exploded"),
    }
}

async fn logout(state: State, req: HttpRequest) -> HttpResponse {
    state.logout_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    if state.logout_fails {
        HttpResponse::InternalServerError().json(envelope(
            500,
            false,
            "Could not revoke token",
            Value::Null,
        ))
    } else {
        HttpResponse::Ok().json(envelope(200, true, "Logged out", Value::Null))
    }
}

async fn password_step(state: State, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    state.other_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    if body["otp"] == "000000" {
        HttpResponse::Ok().json(envelope(400, false, "Invalid OTP", Value::Null))
    } else {
        HttpResponse::Ok().json(envelope(200, true, "OK", Value::Null))
    }
}

async fn list_drivers(state: State, req: HttpRequest) -> HttpResponse {
    state.other_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    let data = json!({
        "data": [
            {"id": 1, "first_name": "Youssef", "last_name": "Amrani"},
            {"id": "2", "first_name": "Sara", "last_name": "Benali"}
        ],
        "totalElements": 42,
        "page": 2,
        "perPage": 2
    });
    HttpResponse::Ok().json(envelope(200, true, "OK", data))
}

async fn get_agent(state: State, req: HttpRequest, path: web::Path<u64>) -> HttpResponse {
    state.other_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    let id = path.into_inner();
    if id == 404 {
        return HttpResponse::NotFound().json(envelope(404, false, "Agent not found", Value::Null));
    }
    HttpResponse::Ok().json(envelope(
        200,
        true,
        "OK",
        json!({"id": id, "firstName": "Karim", "userId": 99, "partner": {"id": 4}}),
    ))
}

async fn delete_driver(state: State, req: HttpRequest) -> HttpResponse {
    state.other_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    HttpResponse::Ok().json(envelope(200, true, "Deleted", Value::Null))
}

async fn create_driver(state: State, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    state.other_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    let mut created = body.into_inner();
    created["id"] = json!(77);
    HttpResponse::Ok().json(envelope(200, true, "Created", created))
}

/// Does not send the updated record back
async fn update_agent(state: State, req: HttpRequest) -> HttpResponse {
    state.other_hits.fetch_add(1, Ordering::SeqCst);
    state.record(&req);
    HttpResponse::Ok().json(envelope(200, true, "Updated", Value::Null))
}

fn run_fake_backend(listener: TcpListener, state: Arc<FakeBackendState>) -> Server {
    let state = web::Data::new(state);
    actix_web::HttpServer::new(move || {
        actix_web::App::new().app_data(state.clone()).service(
            web::scope("/api")
                .route("/auth/login", web::post().to(login))
                .route("/auth/me", web::get().to(me))
                .route("/auth/logout", web::post().to(logout))
                .route("/auth/forgot-password", web::post().to(password_step))
                .route("/auth/verify-otp", web::post().to(password_step))
                .route("/auth/reset-password", web::post().to(password_step))
                .route("/drivers", web::get().to(list_drivers))
                .route("/drivers", web::post().to(create_driver))
                .route("/drivers/{id}", web::delete().to(delete_driver))
                .route("/agents/{id}", web::get().to(get_agent))
                .route("/agents/{id}", web::put().to(update_agent)),
        )
    })
    .workers(1)
    .listen(listener)
    .expect("failed to listen on random port")
    .run()
}
