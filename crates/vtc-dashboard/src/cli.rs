use std::path::PathBuf;

use clap::Parser;
use vtc_shared::const_config::client::{CLIENT_API_BASE_URL_ENV_VAR, CLIENT_DEFAULT_API_BASE_URL};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[arg(
        long,
        env = CLIENT_API_BASE_URL_ENV_VAR,
        default_value = CLIENT_DEFAULT_API_BASE_URL,
        help = "Base URL of the backend API"
    )]
    pub api_base_url: String,

    #[arg(long, default_value = "/", help = "Page to open on start up")]
    pub route: String,

    #[arg(
        long,
        help = "File the session token is kept in. Defaults to the app's storage folder"
    )]
    pub token_file: Option<PathBuf>,
}
