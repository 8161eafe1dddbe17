use anyhow::Context;
use std::path::Path;
use tracing::{error, info};
use vtc_edge_server::startup::{get_socket_address, initialize_tracing, EdgeServerBuilder};
use vtc_shared::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (file, path) =
        telemetry::create_trace_file(Path::new(telemetry::TRACE_FOLDER), "vtc-edge-server")
            .context("failed to create file for traces")?;
    initialize_tracing("vtc_edge_server", "info", file)?;
    println!("Traces being written to: {path:?}");

    let builder = EdgeServerBuilder::new(env!("CARGO_PKG_VERSION"))?;
    let addr = get_socket_address(&builder.configuration.application)
        .context("failed to get socket address")?;
    let (server, port) = builder.build_runnable_edge_server(addr)?;
    println!("Listening on port {port}");

    match server.run().await {
        Ok(()) => info!("Edge Server has exited with Ok(())"),
        Err(e) => {
            error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Edge Server resulted in an error: {e}"
            );
            return Err(e);
        }
    }
    Ok(())
}
