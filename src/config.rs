use config::{Config, ConfigError, Environment, Map};
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/75.0.3770.100 Safari/537.36";
pub const DEFAULT_TITLE_ID: &str = "productTitle";
pub const DEFAULT_PRICE_ID: &str = "priceblock_ourprice";

/// Location of the dotenv file, relative to the application root.
pub const ENV_FILE: &str = "config/.env";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub root_dir: PathBuf,
    pub watch_list: WatchListConfig,
    pub scraper: ScraperConfig,
    pub smtp: SmtpConfig,
    pub run: RunConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchListConfig {
    /// Directory holding the watch-list files, already joined onto the root.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub request_timeout: Option<u64>,
    pub title_id: String,
    pub price_id: String,
    pub dump_html: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub to_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    pub keep_going: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
}

/// Flat key/value view of the dotenv surface. Keys arrive lowercased from
/// the `config` environment source.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    dir_root_app: PathBuf,
    dir_links: String,
    smtp: String,
    port_smtp: u16,
    from: String,
    password: String,
    to: Option<String>,
    user_agent: String,
    title_id: String,
    price_id: String,
    request_timeout: Option<u64>,
    keep_going: bool,
    dump_html: Option<PathBuf>,
    log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `config/.env` under `root`, then lets the process environment
    /// override any of its values.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let file_vars = read_env_file(&root.join(ENV_FILE))?;
        Self::from_sources(root, file_vars, None)
    }

    /// Builds the configuration from explicit key/value maps. `process_vars`
    /// of `None` reads the real process environment.
    pub fn from_sources(
        root: &Path,
        file_vars: Map<String, String>,
        process_vars: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("title_id", DEFAULT_TITLE_ID)?
            .set_default("price_id", DEFAULT_PRICE_ID)?
            .set_default("keep_going", false)?
            .add_source(Environment::default().source(Some(file_vars)))
            .add_source(Environment::default().source(process_vars))
            // The root is always the runtime value, never a configured one
            .set_override("dir_root_app", root.to_string_lossy().to_string())?
            .build()?;

        let settings: EnvSettings = s.try_deserialize()?;
        let config = AppConfig::from_settings(settings);

        config.validate()?;
        Ok(config)
    }

    fn from_settings(settings: EnvSettings) -> Self {
        let to_address = settings
            .to
            .filter(|to| !to.trim().is_empty())
            .unwrap_or_else(|| settings.from.clone());

        AppConfig {
            watch_list: WatchListConfig {
                dir: settings.dir_root_app.join(&settings.dir_links),
            },
            root_dir: settings.dir_root_app,
            scraper: ScraperConfig {
                user_agent: settings.user_agent,
                request_timeout: settings.request_timeout,
                title_id: settings.title_id,
                price_id: settings.price_id,
                dump_html: settings.dump_html,
            },
            smtp: SmtpConfig {
                host: settings.smtp,
                port: settings.port_smtp,
                username: settings.from.clone(),
                password: settings.password,
                from_address: settings.from,
                to_address,
            },
            run: RunConfig {
                keep_going: settings.keep_going,
                dry_run: false,
            },
            logging: LoggingConfig {
                log_dir: settings.log_dir,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watch_list.dir == self.root_dir {
            return Err(ConfigError::Message("DIR_LINKS must not be empty".into()));
        }

        if self.smtp.host.trim().is_empty() {
            return Err(ConfigError::Message("SMTP host must not be empty".into()));
        }

        if self.smtp.port == 0 {
            return Err(ConfigError::Message("SMTP port must be greater than 0".into()));
        }

        if self.smtp.password.is_empty() {
            return Err(ConfigError::Message("PASSWORD must not be empty".into()));
        }

        if self.smtp.from_address.parse::<Mailbox>().is_err() {
            return Err(ConfigError::Message(format!(
                "FROM is not a valid email address: {}",
                self.smtp.from_address
            )));
        }

        if self.smtp.to_address.parse::<Mailbox>().is_err() {
            return Err(ConfigError::Message(format!(
                "TO is not a valid email address: {}",
                self.smtp.to_address
            )));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("USER_AGENT must not be empty".into()));
        }

        for (key, id) in [("TITLE_ID", &self.scraper.title_id), ("PRICE_ID", &self.scraper.price_id)] {
            if !is_valid_element_id(id) {
                return Err(ConfigError::Message(format!("{} is not a valid element id: {:?}", key, id)));
            }
        }

        if self.scraper.request_timeout == Some(0) {
            return Err(ConfigError::Message("REQUEST_TIMEOUT must be greater than 0".into()));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.scraper.request_timeout.map(Duration::from_secs)
    }
}

/// Reads a dotenv file into a key/value map without touching the process
/// environment. A missing file yields an empty map.
pub fn read_env_file(path: &Path) -> Result<Map<String, String>, ConfigError> {
    let mut vars = Map::new();
    if !path.exists() {
        tracing::debug!("No env file at {}", path.display());
        return Ok(vars);
    }

    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| ConfigError::Message(format!("Cannot read {}: {}", path.display(), e)))?;
    for item in iter {
        let (key, value) =
            item.map_err(|e| ConfigError::Message(format!("Malformed line in {}: {}", path.display(), e)))?;
        vars.insert(key.to_lowercase(), value);
    }

    Ok(vars)
}

fn is_valid_element_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with(|c: char| c.is_ascii_digit())
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
