//! Command line arguments and the config file.
//!
//! Each setting resolves as: command line flag, then environment variable
//! (for the URL and token), then `config.toml`, then the built-in default.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;
use serde::Deserialize;
use servicedesk_lib::ServiceDeskClient;
use servicedesk_lib::auth::AccessToken;
use servicedesk_lib::auth::AuthScheme;
use servicedesk_lib::auth::StaticTokenProvider;
use servicedesk_lib::grid::DEFAULT_LOCALE;
use servicedesk_lib::grid::DEFAULT_STEP;

use crate::error::CliError;
use crate::paths;

/// The API collections the console can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Tickets,
    Devices,
    Positions,
}

#[derive(Debug, Parser)]
#[command(name = "servicedesk")]
#[command(about = "Browse servicedesk tickets, devices and stock positions")]
pub struct Cli {
    /// API base URL, e.g. http://localhost:8000
    #[arg(long, env = "SERVICEDESK_URL")]
    pub url: Option<String>,

    /// API token
    #[arg(long, env = "SERVICEDESK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Send the token as `Bearer` instead of `Token`
    #[arg(long)]
    pub bearer: bool,

    /// Collection to browse
    #[arg(long, value_enum, default_value_t = Resource::Tickets)]
    pub resource: Resource,

    /// Rows per page
    #[arg(long)]
    pub step: Option<usize>,

    /// Collation locale for string columns
    #[arg(long)]
    pub locale: Option<String>,

    /// Sort loaded rows in memory instead of asking the server
    #[arg(long)]
    pub local_sort: bool,

    /// Config file (defaults to config.toml in the platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// More log detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// `config.toml` contents. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub auth_scheme: Option<AuthScheme>,
    pub step: Option<usize>,
    pub locale: Option<String>,
    pub local_sort: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Loads the config file.
    ///
    /// An explicitly given path must exist; the default path may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match paths::config_file() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| CliError::ReadConfig {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| CliError::ParseConfig { path: path.clone(), source })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub url: String,
    pub token: Option<String>,
    pub auth_scheme: AuthScheme,
    pub resource: Resource,
    pub step: usize,
    pub locale: String,
    pub local_sort: bool,
    pub timeout: Option<Duration>,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, CliError> {
        let url = cli.url.clone().or(file.url).ok_or(CliError::MissingUrl)?;
        let auth_scheme = if cli.bearer {
            AuthScheme::Bearer
        } else {
            file.auth_scheme.unwrap_or_default()
        };

        Ok(Self {
            url,
            token: cli.token.clone().or(file.token),
            auth_scheme,
            resource: cli.resource,
            step: cli.step.or(file.step).unwrap_or(DEFAULT_STEP),
            locale: cli
                .locale
                .clone()
                .or(file.locale)
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            local_sort: cli.local_sort || file.local_sort.unwrap_or(false),
            timeout: file.timeout_secs.map(Duration::from_secs),
        })
    }

    /// Builds the API client.
    pub fn client(&self) -> ServiceDeskClient {
        let mut builder = ServiceDeskClient::builder().url(self.url.clone());
        if let Some(token) = &self.token {
            let mut access = AccessToken::new(token.clone());
            access.scheme = self.auth_scheme;
            builder = builder.token_provider(StaticTokenProvider::from_token(access));
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
