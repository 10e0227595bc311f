use std::{collections::HashMap, env, fmt::Display, path::Path, str::FromStr, time::Duration};

use tracing::info;

use crate::{errors::Error, Result};

/// Endpoint used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Path the webhook listener serves (and the suffix of derived webhook URLs).
pub const WEBHOOK_PATH: &str = "/webhook";

/// How updates reach the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deployment {
    /// Long polling (local development).
    Polling,
    /// Telegram pushes updates to `url`; we listen on `0.0.0.0:port`.
    Webhook { port: u16, url: String },
}

/// Typed configuration, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub deployment: Deployment,
    pub railway: bool,

    // Completion provider
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub openai_model: String,
    pub openai_temperature: f32,
    pub openai_max_tokens: u32,
    pub openai_timeout: Duration,

    // Relay
    pub message_chunk_limit: usize,
    pub completion_workers: usize,
    pub typing_interval: Duration,
}

impl Config {
    /// Load `.env` (if present) and resolve the configuration from the process environment.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"))?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset. Unparseable or out-of-range values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let vars = Vars(lookup);

        // Required
        let telegram_bot_token = vars.required("TELEGRAM_BOT_TOKEN")?;
        let openai_api_key = vars.required("OPENAI_API_KEY")?;

        // Provider
        let openai_base_url = vars.get("OPENAI_BASE_URL");
        let openai_model = vars
            .get("OPENAI_MODEL")
            .unwrap_or_else(|| "gpt-4o-mini".to_string());

        let openai_temperature = vars.parsed::<f32>("OPENAI_TEMPERATURE")?.unwrap_or(0.7);
        if !(0.0..=2.0).contains(&openai_temperature) {
            return Err(Error::Config(format!(
                "OPENAI_TEMPERATURE must be between 0.0 and 2.0, got {openai_temperature}"
            )));
        }

        let openai_max_tokens = vars.positive::<u32>("OPENAI_MAX_TOKENS", 1000)?;
        let openai_timeout =
            Duration::from_secs(vars.positive::<u64>("OPENAI_TIMEOUT_SECS", 600)?);

        // Relay
        let message_chunk_limit = vars.positive::<usize>("MESSAGE_CHUNK_LIMIT", 3800)?;
        let completion_workers = vars.positive::<usize>("COMPLETION_WORKERS", 4)?;
        let typing_interval =
            Duration::from_millis(vars.positive::<u64>("TYPING_INTERVAL_MS", 4000)?);

        // Transport: webhook when the platform assigns a port, polling otherwise.
        let deployment = match vars.parsed::<u16>("PORT")? {
            Some(port) => {
                let url = match vars.get("WEBHOOK_URL") {
                    Some(url) => url,
                    None => match vars.get("RAILWAY_PUBLIC_DOMAIN") {
                        Some(domain) => format!("https://{domain}{WEBHOOK_PATH}"),
                        None => {
                            return Err(Error::Config(
                                "WEBHOOK_URL or RAILWAY_PUBLIC_DOMAIN must be set for webhook mode"
                                    .to_string(),
                            ))
                        }
                    },
                };
                Deployment::Webhook { port, url }
            }
            None => Deployment::Polling,
        };
        let railway = vars.get("RAILWAY_ENVIRONMENT").is_some();

        Ok(Self {
            telegram_bot_token,
            deployment,
            railway,
            openai_api_key,
            openai_base_url,
            openai_model,
            openai_temperature,
            openai_max_tokens,
            openai_timeout,
            message_chunk_limit,
            completion_workers,
            typing_interval,
        })
    }

    pub fn openai_base_url(&self) -> &str {
        self.openai_base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
    }

    /// Log the effective configuration. Secrets are never logged.
    pub fn log_summary(&self) {
        let transport = match &self.deployment {
            Deployment::Polling => "polling".to_string(),
            Deployment::Webhook { port, url } => format!("webhook (port {port}, url {url})"),
        };
        info!(
            model = %self.openai_model,
            base_url = %self.openai_base_url(),
            temperature = self.openai_temperature,
            max_tokens = self.openai_max_tokens,
            chunk_limit = self.message_chunk_limit,
            workers = self.completion_workers,
            deployment = if self.railway { "Railway" } else { "Local" },
            transport = %transport,
            "configuration loaded"
        );
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).and_then(non_empty)
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| Error::Config(format!("Missing required env var: {key}")))
    }

    fn parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{key} has invalid value {raw:?}: {e}")))
    }

    fn positive<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr + PartialOrd + Default + Display,
        T::Err: Display,
    {
        let value = self.parsed::<T>(key)?.unwrap_or(default);
        if value <= T::default() {
            return Err(Error::Config(format!(
                "{key} must be greater than zero, got {value}"
            )));
        }
        Ok(value)
    }
}

fn load_dotenv_if_present(path: &Path) -> Result<()> {
    if !path.exists() {
        info!("No .env file found, using environment variables");
        return Ok(());
    }
    // Existing environment variables take precedence over the file.
    dotenvy::from_path(path)
        .map_err(|e| Error::Config(format!("failed to load {}: {e}", path.display())))?;
    info!("Loaded .env file");
    Ok(())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Build a lookup over a fixed set of pairs (tests and embedding).
pub fn lookup_from_pairs<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}
