use crate::{
    configuration::ApplicationSettings,
    get_configuration,
    guard::NavigationGuard,
    middleware::validate_navigation,
    routes::{front_end, health_check},
    Configuration,
};
use actix_web::{middleware::from_fn, web, App, HttpResponse, HttpServer};
use anyhow::Context as _;
use std::{
    net::{SocketAddr, TcpListener},
    str::FromStr,
};
use tracing::{info, instrument};
use tracing_actix_web::TracingLogger;
use vtc_shared::{
    const_config::path::{PATH_HEALTH_CHECK, PATH_VERSION},
    telemetry,
};

pub struct EdgeServerBuilder {
    pub configuration: Configuration,
    pkg_version: &'static str,
}

pub struct RunnableEdgeServer(actix_web::dev::Server);

/// Initializes Tracing
pub fn initialize_tracing<Sink, D>(
    app_name: &str,
    default_env_filter_directive: D,
    sink: Sink,
) -> anyhow::Result<()>
where
    Sink: for<'b> tracing_subscriber::fmt::MakeWriter<'b> + Send + Sync + 'static,
    D: AsRef<str>,
{
    let subscriber = telemetry::build_subscriber(app_name, default_env_filter_directive, sink);
    telemetry::install_subscriber(subscriber)
}

impl EdgeServerBuilder {
    /// Reads the configuration from the `configuration` folder and environment
    pub fn new(pkg_version: &'static str) -> anyhow::Result<Self> {
        let configuration = get_configuration().context("failed to read configuration")?;
        Ok(Self::with_configuration(configuration, pkg_version))
    }

    pub fn with_configuration(configuration: Configuration, pkg_version: &'static str) -> Self {
        Self {
            configuration,
            pkg_version,
        }
    }

    /// Binds to `addr` and returns the server along with the port actually used
    #[instrument(err(Debug), skip(self))]
    pub fn build_runnable_edge_server(
        self,
        addr: SocketAddr,
    ) -> anyhow::Result<(RunnableEdgeServer, u16)> {
        let Configuration {
            application,
            navigation,
        } = self.configuration;
        let navigation_guard = web::Data::new(NavigationGuard::from(navigation));
        let front_end_folder = application.front_end_folder;
        let pkg_version = self.pkg_version;

        let listener = TcpListener::bind(addr)
            .with_context(|| format!("failed to bind to address: {}", addr))?;
        let port = listener
            .local_addr()
            .context("failed to get local address of listener")?
            .port();
        info!(?port, "Port assigned to the server is {port}");

        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .route(&PATH_HEALTH_CHECK.path, web::get().to(health_check))
                .route(
                    &PATH_VERSION.path,
                    web::get().to(move || async move { HttpResponse::Ok().body(pkg_version) }),
                )
                .service(
                    web::scope("")
                        .wrap(from_fn(validate_navigation))
                        .service(front_end(front_end_folder.clone())),
                )
                .app_data(navigation_guard.clone())
        })
        .listen(listener)
        .context("failed to bind HTTP Server to listener")?
        .run();
        info!(
            version = pkg_version,
            "Edge Server prepared to be run at version {pkg_version}"
        );
        Ok((RunnableEdgeServer(server), port))
    }
}

impl RunnableEdgeServer {
    pub async fn run(self) -> anyhow::Result<()> {
        self.0.await.context("edge server crashed")
    }
}

pub fn get_socket_address(app_config: &ApplicationSettings) -> anyhow::Result<SocketAddr> {
    let address = format!("{}:{}", app_config.host, app_config.port);
    info!("Socket address to parse is: {address}");
    let result = SocketAddr::from_str(&address)
        .with_context(|| format!("failed to parse address: {address}"))?;
    Ok(result)
}
