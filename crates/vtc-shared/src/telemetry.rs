//! Structured (bunyan JSON) logging setup for the native binaries

use anyhow::Context;
use std::{
    fs::{create_dir_all, File},
    path::{Path, PathBuf},
};
use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

/// Folder trace files are created in, relative to the working directory
pub const TRACE_FOLDER: &str = "traces";

/// Builds the subscriber used by every binary in the workspace
///
/// `RUST_LOG` takes precedence over `default_directive` when set. See
/// <https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives>
/// for the accepted syntax.
pub fn build_subscriber<Sink, S>(
    app_name: &str,
    default_directive: S,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    S: AsRef<str>,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(app_name.to_string(), sink))
}

/// Installs `subscriber` as the global default and forwards `log` records to
/// it. Fails if called more than once per process.
pub fn install_subscriber(subscriber: impl Subscriber + Sync + Send) -> anyhow::Result<()> {
    LogTracer::init().context("failed to bridge log records into tracing")?;
    set_global_default(subscriber).context("failed to set global tracing subscriber")?;
    Ok(())
}

fn trace_file_name(app_name: &str) -> String {
    format!(
        "{}_{app_name}.log",
        chrono::Local::now().format("%Y-%m-%dT%H-%M-%S")
    )
}

/// Creates a new timestamped trace file in `folder` (created if missing)
pub fn create_trace_file(folder: &Path, app_name: &str) -> anyhow::Result<(File, PathBuf)> {
    create_dir_all(folder)
        .with_context(|| format!("failed to create trace folder: {folder:?}"))?;
    let file_path = folder.join(trace_file_name(app_name));
    let file = File::create(&file_path)
        .with_context(|| format!("failed to create trace file: {file_path:?}"))?;
    Ok((file, file_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_file_is_created_in_folder() {
        let dir = std::env::temp_dir().join(format!("vtc-telemetry-{}", std::process::id()));
        let (_file, path) = create_trace_file(&dir, "edge").unwrap();
        assert!(path.starts_with(&dir));
        assert!(path.to_string_lossy().ends_with("_edge.log"));
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
