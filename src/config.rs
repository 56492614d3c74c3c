use std::path::{Path, PathBuf};

use crate::client::{ClientConfig, DEFAULT_BASE_URL, ResponseFormat};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct RcConfig {
    key: Option<String>,
    url: Option<String>,
    format: Option<String>,
}

/// Resolves client configuration from (in order of precedence):
/// - explicit arguments
/// - environment variables `CBIBS_API_KEY` / `CBIBS_URL` / `CBIBS_FORMAT`
/// - rc file from `CBIBS_RC`, `./.cbibsrc`, or `~/.cbibsrc`
pub(crate) fn load_config(
    key: Option<String>,
    url: Option<String>,
    format: Option<String>,
) -> Result<ClientConfig> {
    let mut key = key.or_else(|| std::env::var("CBIBS_API_KEY").ok());
    let mut url = url.or_else(|| std::env::var("CBIBS_URL").ok());
    let mut format = format.or_else(|| std::env::var("CBIBS_FORMAT").ok());

    let rc_candidates = rc_candidates();

    if key.is_none() || url.is_none() || format.is_none() {
        for rc_path in &rc_candidates {
            if rc_path.exists() {
                let cfg = read_rc(rc_path).map_err(|e| {
                    Error::Configuration(format!(
                        "failed to read configuration file {}: {}",
                        rc_path.display(),
                        e
                    ))
                })?;

                if key.is_none() {
                    key = cfg.key;
                }
                if url.is_none() {
                    url = cfg.url;
                }
                if format.is_none() {
                    format = cfg.format;
                }
                break;
            }
        }
    }

    let key = key.ok_or_else(|| {
        if rc_candidates.is_empty() {
            Error::Configuration(
                "missing API key (set CBIBS_API_KEY or create .cbibsrc)".to_string(),
            )
        } else {
            Error::Configuration(format!(
                "missing API key (set CBIBS_API_KEY or put `key:` in one of: {})",
                rc_candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        }
    })?;

    let format = match format {
        Some(v) => v.parse::<ResponseFormat>()?,
        None => ResponseFormat::default(),
    };

    Ok(ClientConfig {
        key,
        url: url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        format,
    })
}

fn read_rc(path: &Path) -> std::io::Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    let mut cfg = RcConfig::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                continue;
            }
            match k.trim() {
                "key" => cfg.key = Some(v.to_string()),
                "url" => cfg.url = Some(v.to_string()),
                "format" => cfg.format = Some(v.to_string()),
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // Search order: explicit CBIBS_RC, then the current working directory,
    // then the home directory.
    if let Ok(p) = std::env::var("CBIBS_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".cbibsrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".cbibsrc"));
    }
    v
}
