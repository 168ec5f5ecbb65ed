use clap::Parser;
use serde::Deserialize;

/// Trivia question bank API
#[derive(Parser, Debug, Default, Clone, PartialEq)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file to read, extension optional
    #[clap(long, default_value = "setup")]
    pub config: String,
    /// Which errors we want to log (info, warn or error)
    #[clap(short, long)]
    pub log_level: Option<String>,
    /// Web server port
    #[clap(short, long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub database_host: Option<String>,
    #[clap(long)]
    pub database_port: Option<u16>,
    #[clap(long)]
    pub database_name: Option<String>,
    #[clap(long)]
    pub database_user: Option<String>,
    #[clap(long)]
    pub database_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub log_level: String,
    pub port: u16,
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_user: String,
    pub database_password: String,
}

impl Config {
    pub fn new() -> Result<Config, handle_errors::Error> {
        dotenv::dotenv().ok();
        Config::load(Args::parse())
    }

    /// Defaults, then the settings file, then `TRIVIA_*` environment
    /// variables, then explicit command-line flags.
    pub fn load(args: Args) -> Result<Config, handle_errors::Error> {
        let settings = config::Config::builder()
            .set_default("log_level", "warn")
            .and_then(|b| b.set_default("port", 3030_i64))
            .and_then(|b| b.set_default("database_host", "localhost"))
            .and_then(|b| b.set_default("database_port", 5432_i64))
            .and_then(|b| b.set_default("database_name", "trivia"))
            .and_then(|b| b.set_default("database_user", "postgres"))
            .and_then(|b| b.set_default("database_password", ""))
            .map_err(handle_errors::Error::ConfigError)?
            .add_source(config::File::with_name(&args.config).required(false))
            .add_source(config::Environment::with_prefix("TRIVIA"))
            .build()
            .map_err(handle_errors::Error::ConfigError)?;

        let mut config = settings
            .try_deserialize::<Config>()
            .map_err(handle_errors::Error::ConfigError)?;

        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(host) = args.database_host {
            config.database_host = host;
        }
        if let Some(port) = args.database_port {
            config.database_port = port;
        }
        if let Some(name) = args.database_name {
            config.database_name = name;
        }
        if let Some(user) = args.database_user {
            config.database_user = user;
        }
        if let Some(password) = args.database_password {
            config.database_password = password;
        }

        Ok(config)
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database_user,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }
}
