use serde_aux::field_attributes::deserialize_number_from_string;
use std::{
    convert::{TryFrom, TryInto},
    path::PathBuf,
};
use vtc_shared::const_config::navigation::{
    NAV_PROTECTED_PREFIXES, NAV_PUBLIC_PREFIXES, NAV_REDIRECT_PARAM, NAV_ROUTE_LOGIN,
    NAV_TOKEN_COOKIE_NAME,
};

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct Configuration {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub navigation: NavigationSettings,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Folder holding the compiled dashboard (`index.html`, js and wasm)
    pub front_end_folder: PathBuf,
}

/// Which navigations need a credential and where to send those without one
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct NavigationSettings {
    pub login_path: String,
    pub redirect_param: String,
    pub cookie_name: String,
    pub public_prefixes: Vec<String>,
    pub protected_prefixes: Vec<String>,
    pub unlisted: UnlistedPolicy,
}

/// What happens to paths that are neither public nor protected
#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnlistedPolicy {
    #[default]
    Allow,
    Deny,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            login_path: NAV_ROUTE_LOGIN.to_string(),
            redirect_param: NAV_REDIRECT_PARAM.to_string(),
            cookie_name: NAV_TOKEN_COOKIE_NAME.to_string(),
            public_prefixes: NAV_PUBLIC_PREFIXES.iter().map(ToString::to_string).collect(),
            protected_prefixes: NAV_PROTECTED_PREFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            unlisted: UnlistedPolicy::default(),
        }
    }
}

pub fn get_configuration() -> Result<Configuration, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    // Note do not try to move configuration folder to root because it will make
    // it tricky for tests as they start at the crate root not the workspace root
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_APPLICATION__PORT=5001 would set `Settings.application.port`
        // Lists are comma separated
        // E.g. `APP_NAVIGATION__PUBLIC_PREFIXES=/login,/forgot-password`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("navigation.public_prefixes")
                .with_list_parse_key("navigation.protected_prefixes"),
        )
        .build()?;

    settings.try_deserialize::<Configuration>()
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
