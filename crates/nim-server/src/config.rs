//! Configuration for the Nim server.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `NIM_BIND_ADDR`          (default: "0.0.0.0")
//! - `NIM_QUERY_PORT`         (default: "4201")
//! - `NIM_PLAY_PORT`          (default: "4202")
//! - `NIM_PASSWORD`           (default: unset, no password; at most 20 bytes)
//! - `NIM_ADDR_FILE`          (default: "nim.conf"; empty disables the file)
//! - `NIM_ADVERTISE_HOST`     (default: `$HOSTNAME`, else "localhost")
//! - `NIM_SWEEP_INTERVAL_MS`  (default: "1000")
//! - `NIM_AUTH_TIMEOUT_SECS`  (default: "0", no timeout)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use nim_protocol::wire_types::TEXT_FIELD_LEN;

/// A configuration value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind both sockets to.
    pub bind_addr: String,

    /// UDP port of the directory service. `0` picks an ephemeral port.
    pub query_port: u16,

    /// TCP port players connect to. `0` picks an ephemeral port.
    pub play_port: u16,

    /// Shared password for both play and query; `None` admits everyone.
    pub password: Option<String>,

    /// Where to write the `host:query_port:play_port` record, if anywhere.
    pub addr_file: Option<PathBuf>,

    /// Host name written into the address file.
    pub advertise_host: String,

    /// Cadence of the liveness sweep; also bounds every wait of the
    /// dispatch loop.
    pub sweep_interval: Duration,

    /// Upper bound on a single authentication exchange. `None` waits
    /// as long as the client takes.
    pub auth_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            query_port: 4201,
            play_port: 4202,
            password: None,
            addr_file: Some(PathBuf::from("nim.conf")),
            advertise_host: default_advertise_host(),
            sweep_interval: Duration::from_secs(1),
            auth_timeout: None,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_addr = env::var("NIM_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let query_port = read_env_or_default("NIM_QUERY_PORT", defaults.query_port)?;
        let play_port = read_env_or_default("NIM_PLAY_PORT", defaults.play_port)?;
        let password = env::var("NIM_PASSWORD").ok().filter(|p| !p.is_empty());
        let addr_file = match env::var("NIM_ADDR_FILE") {
            Ok(path) if path.is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => defaults.addr_file,
        };
        let advertise_host = env::var("NIM_ADVERTISE_HOST").unwrap_or(defaults.advertise_host);
        let sweep_ms = read_env_or_default("NIM_SWEEP_INTERVAL_MS", 1000u64)?;
        let auth_secs = read_env_or_default("NIM_AUTH_TIMEOUT_SECS", 0u64)?;

        if let Some(pw) = &password {
            if pw.len() > TEXT_FIELD_LEN || pw.contains('\0') {
                return Err(ConfigError {
                    key: "NIM_PASSWORD",
                    value: format!("<{} bytes>", pw.len()),
                    reason: format!("must be at most {} bytes with no NUL", TEXT_FIELD_LEN),
                });
            }
        }

        if sweep_ms == 0 {
            return Err(ConfigError {
                key: "NIM_SWEEP_INTERVAL_MS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(Config {
            bind_addr,
            query_port,
            play_port,
            password,
            addr_file,
            advertise_host,
            sweep_interval: Duration::from_millis(sweep_ms),
            auth_timeout: (auth_secs > 0).then(|| Duration::from_secs(auth_secs)),
        })
    }

    /// Convenience: `addr:query_port` socket string.
    pub fn query_socket_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.query_port)
    }

    /// Convenience: `addr:play_port` socket string.
    pub fn play_socket_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.play_port)
    }
}

fn default_advertise_host() -> String {
    env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

fn read_env_or_default<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.parse::<T>().map_err(|e| ConfigError {
            key,
            reason: e.to_string(),
            value: val,
        }),
        Err(_) => Ok(default),
    }
}
