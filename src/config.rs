use anyhow::Context;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins (comma-separated). "*" allows any origin.
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
    pub generator: GeneratorConfig,
}

/// How the external playlist generator is launched.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    /// `None` waits for the generator indefinitely.
    pub timeout: Option<Duration>,
    pub diagnostics: DiagnosticsPolicy,
}

/// What to do with generator stderr output when it exits successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticsPolicy {
    /// Any stderr output fails the call.
    #[default]
    Strict,
    /// Stderr is logged and ignored when the exit status is zero.
    Lenient,
}

impl FromStr for DiagnosticsPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(anyhow::anyhow!(
                "unknown diagnostics policy '{}', expected 'strict' or 'lenient'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow::anyhow!("unknown log format '{}'", other)),
        }
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 300;

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port: u16 = match get("SERVER_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT '{}' is not a valid port", port))?,
            None => 3000,
        };

        let cors_origins: Vec<String> = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = get("LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        let timeout_secs: u64 = match get("GENERATOR_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse()
                .with_context(|| format!("GENERATOR_TIMEOUT_SECS '{}' is not a number", secs))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let args: Vec<String> = get("GENERATOR_ARGS")
            .unwrap_or_else(|| "backend/main.py".to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let generator = GeneratorConfig {
            program: get("GENERATOR_PROGRAM").unwrap_or_else(|| "python3".to_string()),
            args,
            working_dir: get("GENERATOR_WORKDIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            diagnostics: get("GENERATOR_DIAGNOSTICS")
                .map(|v| v.parse::<DiagnosticsPolicy>())
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(Config {
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            cors_origins,
            log_format,
            generator,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}
