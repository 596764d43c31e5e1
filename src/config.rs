use serde::Deserialize;
use std::env;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

// Expected credentials and secret payload, fixed for the process lifetime
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub secret_message: String,
    pub realm: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

impl Config {
    /// Load configuration from an optional `config` file, then apply the
    /// `PORT`, `USERNAME`, `PASSWORD` and `SECRET_MESSAGE` environment
    /// variables as overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("auth.username", "")?
            .set_default("auth.password", "")?
            .set_default("auth.secret_message", "")?
            .set_default("auth.realm", "Secret Area")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "secret-server/0.1")?
            .set_default("http.max_body_size", 10_485_760)?; // 10MB

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(username) = env::var("USERNAME") {
            builder = builder.set_override("auth.username", username)?;
        }
        if let Ok(password) = env::var("PASSWORD") {
            builder = builder.set_override("auth.password", password)?;
        }
        if let Ok(message) = env::var("SECRET_MESSAGE") {
            builder = builder.set_override("auth.secret_message", message)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Process-wide immutable state shared with every request handler.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn test_auth_config() -> AuthConfig {
        AuthConfig {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            secret_message: "42".to_string(),
            realm: "Secret Area".to_string(),
        }
    }

    pub fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                workers: None,
            },
            auth: test_auth_config(),
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                show_headers: false,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "secret-server/0.1".to_string(),
                max_body_size: 10_485_760,
            },
        }
    }

    #[test]
    fn test_socket_addr_parsing() {
        let config = test_config();
        let addr = config.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.is_ipv4());
    }

    #[test]
    fn test_socket_addr_invalid_host() {
        let mut config = test_config();
        config.server.host = "not a host".to_string();
        assert!(config.get_socket_addr().is_err());
    }
}
