use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::interaction::loader::ScrollPolicy;

pub const DEFAULT_TARGET: &str = "https://snappfood.ir/caffe/menu/%D8%AF%D9%86_%DA%A9%D8%A7%D9%81%D9%87__%D9%81%D8%B1%D8%AF%D9%88%D8%B3%DB%8C_-r-0lq8dj/";

pub const ENV_WP_URL: &str = "WP_URL";
pub const ENV_WP_USER: &str = "WP_USER";
pub const ENV_WP_APP_PASS: &str = "WP_APP_PASS";
pub const ENV_SHEETS_TOKEN: &str = "SHEETS_TOKEN";

pub const WP_POSTS_PATH: &str = "/wp-json/wp/v2/posts";

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub output: PathBuf,
    pub timeout: u64,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
    pub scroll: ScrollPolicy,
    pub verbose: bool,
    pub chrome_bin: Option<PathBuf>,
    pub dry_run: bool,
    pub sheet: Option<SheetOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOptions {
    pub spreadsheet_id: String,
    pub range: String,
}

/// A configured downstream system. Never built from extracted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Rest {
        base_url: String,
        username: String,
        app_password: String,
        collection_path: String,
    },
    Spreadsheet {
        spreadsheet_id: String,
        range: String,
        access_token: String,
    },
}

impl SinkTarget {
    pub fn label(&self) -> &'static str {
        match self {
            SinkTarget::Rest { .. } => "wordpress",
            SinkTarget::Spreadsheet { .. } => "sheets",
        }
    }
}

/// Resolve sink targets from the process environment.
pub fn sink_targets_from_env(sheet: Option<&SheetOptions>) -> Result<Vec<SinkTarget>, ConfigError> {
    sink_targets(|key| std::env::var(key).ok(), sheet)
}

/// Resolve sink targets through `lookup`. Empty values count as absent.
pub fn sink_targets<F>(lookup: F, sheet: Option<&SheetOptions>) -> Result<Vec<SinkTarget>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let base = read(ENV_WP_URL);
    let user = read(ENV_WP_USER);
    let pass = read(ENV_WP_APP_PASS);

    let mut missing = Vec::new();
    if base.is_none() {
        missing.push(ENV_WP_URL);
    }
    if user.is_none() {
        missing.push(ENV_WP_USER);
    }
    if pass.is_none() {
        missing.push(ENV_WP_APP_PASS);
    }

    let token = match sheet {
        Some(_) => {
            let token = read(ENV_SHEETS_TOKEN);
            if token.is_none() {
                missing.push(ENV_SHEETS_TOKEN);
            }
            token
        }
        None => None,
    };

    let (Some(base), Some(username), Some(app_password)) = (base, user, pass) else {
        return Err(ConfigError::Missing(missing));
    };
    if !missing.is_empty() {
        return Err(ConfigError::Missing(missing));
    }

    let mut targets = vec![SinkTarget::Rest {
        base_url: normalize_base_url(&base)?,
        username,
        app_password,
        collection_path: WP_POSTS_PATH.to_string(),
    }];

    if let (Some(sheet), Some(access_token)) = (sheet, token) {
        targets.push(SinkTarget::Spreadsheet {
            spreadsheet_id: sheet.spreadsheet_id.clone(),
            range: sheet.range.clone(),
            access_token,
        });
    }

    Ok(targets)
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: ENV_WP_URL,
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: ENV_WP_URL,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}
