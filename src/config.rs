pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_YTDLP: &str = "yt-dlp";
pub const DEFAULT_URL_TEMPLATE: &str = "https://www.youtube.com/watch?v={id}";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YTMP3_BIND is not a socket address: {0}")]
    InvalidBind(String),
    #[error("YTMP3_YTDLP must name a program")]
    EmptyCommand,
    #[error("YTMP3_URL_TEMPLATE must contain {{id}}: {0}")]
    InvalidUrlTemplate(String),
    #[error("YTMP3_TIMEOUT_SECS must be a positive number of seconds: {0}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: std::net::SocketAddr,
    /// Program followed by any leading arguments, e.g. `python3 -m yt_dlp`
    pub ytdlp: Vec<String>,
    pub url_template: String,
    pub timeout: std::time::Duration,
    /// Per-request workspaces are created inside this directory
    pub workspace_dir: std::path::PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup("YTMP3_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind = bind.parse::<std::net::SocketAddr>().map_err(|_| ConfigError::InvalidBind(bind))?;

        let ytdlp = lookup("YTMP3_YTDLP")
            .unwrap_or_else(|| DEFAULT_YTDLP.into())
            .split_whitespace()
            .map(String::from)
            .collect::<Vec<_>>();
        if ytdlp.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        let url_template = lookup("YTMP3_URL_TEMPLATE").unwrap_or_else(|| DEFAULT_URL_TEMPLATE.into());
        if !url_template.contains("{id}") {
            return Err(ConfigError::InvalidUrlTemplate(url_template));
        }

        let timeout = match lookup("YTMP3_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(x) => match x.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(x)),
            },
        };

        let workspace_dir = match lookup("YTMP3_WORKSPACE_DIR") {
            Some(dir) if !dir.is_empty() => dir.into(),
            _ => std::env::temp_dir(),
        };

        Ok(Self {
            bind,
            ytdlp,
            url_template,
            timeout: std::time::Duration::from_secs(timeout),
            workspace_dir,
        })
    }

    pub fn source_url(&self, video_id: &str) -> String {
        self.url_template.replace("{id}", video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect::<std::collections::HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.ytdlp, ["yt-dlp"]);
        assert_eq!(config.timeout, std::time::Duration::from_secs(600));
        assert_eq!(config.workspace_dir, std::env::temp_dir());
        assert_eq!(
            config.source_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("YTMP3_BIND", "127.0.0.1:8080"),
            ("YTMP3_YTDLP", "  python3 -m   yt_dlp "),
            ("YTMP3_URL_TEMPLATE", "https://music.youtube.com/watch?v={id}&feature=share"),
            ("YTMP3_TIMEOUT_SECS", "30"),
            ("YTMP3_WORKSPACE_DIR", "/var/tmp/ytmp3"),
        ])
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.ytdlp, ["python3", "-m", "yt_dlp"]);
        assert_eq!(config.timeout, std::time::Duration::from_secs(30));
        assert_eq!(config.workspace_dir, std::path::PathBuf::from("/var/tmp/ytmp3"));
        assert_eq!(
            config.source_url("abc"),
            "https://music.youtube.com/watch?v=abc&feature=share"
        );
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(config_from(&[("YTMP3_BIND", "localhost")]), Err(ConfigError::InvalidBind(_))));
        assert!(matches!(config_from(&[("YTMP3_YTDLP", "   ")]), Err(ConfigError::EmptyCommand)));
        assert!(matches!(
            config_from(&[("YTMP3_URL_TEMPLATE", "https://youtu.be/")]),
            Err(ConfigError::InvalidUrlTemplate(_))
        ));
        assert!(matches!(config_from(&[("YTMP3_TIMEOUT_SECS", "0")]), Err(ConfigError::InvalidTimeout(_))));
        assert!(matches!(
            config_from(&[("YTMP3_TIMEOUT_SECS", "ten")]),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
