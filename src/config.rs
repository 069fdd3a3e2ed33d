//! Startup configuration for the humanizer

use serde::{Deserialize, Serialize};
use log::{debug, error};
use crate::error::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 2000;

/// Primary credential variable, then the fallback name
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Humanizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizerConfig
{   /// Access credential for the generation service
    pub api_key: String
  , /// Model identifier sent with every request
    pub model: String
  , /// API base URL, without trailing slash
    pub api_base: String
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
  , /// How long "Copied!" stays on screen
    pub copy_feedback_ms: u64
}

impl HumanizerConfig
{   /// Config with defaults for everything but the credential
    pub fn new(api_key: impl Into<String>) -> Self
    {   HumanizerConfig
        {   api_key: api_key.into()
          , model: DEFAULT_MODEL.to_string()
          , api_base: DEFAULT_API_BASE.to_string()
          , timeout_secs: None
          , copy_feedback_ms: DEFAULT_COPY_FEEDBACK_MS
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, Error>
    {   Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    /// A missing or blank credential is fatal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
      where F: Fn(&str) -> Option<String>
    {   let present = |name: &str| {
          lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        };

        let api_key = API_KEY_VARS
          .iter()
          .copied()
          .find_map(present)
          .ok_or_else(|| {
            error!("No API key in environment");
            Error::MissingApiKey(API_KEY_VARS[0].to_string())
          })?;

        let mut config = HumanizerConfig::new(api_key);

        if let Some(model) = present("HUMANIZER_MODEL")
        {   config.model = model;
        }
        if let Some(base) = present("HUMANIZER_API_BASE")
        {   config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(raw) = present("HUMANIZER_TIMEOUT_SECS")
        {   config.timeout_secs
              = Some(parse_u64("HUMANIZER_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = present("HUMANIZER_COPY_FEEDBACK_MS")
        {   config.copy_feedback_ms
              = parse_u64("HUMANIZER_COPY_FEEDBACK_MS", &raw)?;
        }

        debug!(
          "Loaded config: model={}, api_base={}",
          config.model, config.api_base
        );
        Ok(config)
    }
}

fn parse_u64(name: &str, raw: &str) -> Result<u64, Error>
{   raw.parse::<u64>().map_err(|e| {
      error!("Bad value for {}: {}", name, raw);
      Error::InvalidConfiguration(
        format!("{} must be a whole number ({})", name, e)
      )
    })
}
