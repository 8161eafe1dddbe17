#[cfg(not(target_arch = "wasm32"))]
pub fn init(cli: &super::cli::Cli) -> anyhow::Result<()> {
    use anyhow::{bail, Context as _};
    use std::path::Path;
    use vtc_shared::telemetry;

    const APP_NAME: &str = "vtc_dashboard";

    fn init_to_file() -> anyhow::Result<()> {
        let (file, filename) =
            telemetry::create_trace_file(Path::new(telemetry::TRACE_FOLDER), APP_NAME)?;
        let subscriber = telemetry::build_subscriber(APP_NAME, "zbus=warn,info", file);

        // Start logging to file
        telemetry::install_subscriber(subscriber)
            .context("failed to start tracing to file")?;
        println!("Tracing started to file {filename:?}");
        Ok(())
    }

    if !cli.is_to_std_out {
        // Log to file
        match init_to_file() {
            Ok(_) => return Ok(()),
            Err(e) => {
                // Print error and fall though to logging to stdout
                eprintln!("Failed to start logging to file: {e:#}");
            }
        }
    }

    // Log to stdout
    match tracing_subscriber::fmt().try_init() {
        Ok(_) => Ok(()),
        Err(e) => {
            bail!("Failed to start tracing. Error: {e}");
        }
    }
}
