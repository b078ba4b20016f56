use ingest::{IngestConfig, ServiceTags};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level / env-filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest request body buffered for `POST /events`, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Deployment tags reported by /health and stamped on events
    #[serde(default)]
    pub service: ServiceEnvironment,

    /// Validation limits
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Deployment tags from the execution environment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceEnvironment {
    /// Function name carried on every log line
    pub function_name: String,

    /// Service name reported by /health
    pub service_name: String,

    /// Service version reported by /health
    pub version: String,

    /// Deployment stage (dev, staging, prod, ...)
    pub stage: String,

    /// Deployment/version marker stamped into event metadata
    pub function_version: String,

    /// Hosting region, if known
    pub region: Option<String>,
}

impl Default for ServiceEnvironment {
    fn default() -> Self {
        Self {
            function_name: "EventIngestion".to_string(),
            service_name: "EventFlow".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            stage: "dev".to_string(),
            function_version: "$LATEST".to_string(),
            region: None,
        }
    }
}

impl ServiceEnvironment {
    /// Tags handed to the enricher and used on log lines.
    pub fn tags(&self) -> ServiceTags {
        ServiceTags {
            function_name: self.function_name.clone(),
            stage: self.stage.clone(),
            function_version: self.function_version.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            log_level: default_log_level(),
            max_body_bytes: default_max_body_bytes(),
            service: ServiceEnvironment::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `eventflow` config file,
    /// and `EVENTFLOW_*` environment variables (nested keys use `__`, e.g.
    /// `EVENTFLOW_SERVICE__STAGE=prod`).
    ///
    /// `AWS_REGION` fills `service.region` when nothing else set it.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env file is normal outside local development.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("eventflow").required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("EVENTFLOW")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.service.region.is_none() {
            config.service.region = std::env::var("AWS_REGION").ok();
        }

        config.ingest.validate()?;
        anyhow::ensure!(config.max_body_bytes > 0, "max_body_bytes must be greater than zero");

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.service.function_name, "EventIngestion");
        assert_eq!(cfg.service.service_name, "EventFlow");
        assert_eq!(cfg.service.stage, "dev");
        assert_eq!(cfg.ingest, IngestConfig::default());
    }

    #[test]
    fn test_body_limit_leaves_room_for_data() {
        let cfg = ServerConfig::default();
        let data_limit = cfg.ingest.max_data_bytes.unwrap_or(0);
        assert!(cfg.max_body_bytes > data_limit);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_invalid_socket_addr() {
        let cfg = ServerConfig {
            bind_addr: "not an address".to_string(),
            ..Default::default()
        };
        assert!(cfg.socket_addr().is_err());
    }

    #[test]
    fn test_partial_json_config() {
        let cfg: ServerConfig = serde_json::from_str(
            r#"{"port": 9000, "service": {"stage": "prod", "region": "eu-west-1"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.bind_addr, "0.0.0.0");
        assert_eq!(cfg.service.stage, "prod");
        assert_eq!(cfg.service.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cfg.service.function_name, "EventIngestion");
    }

    #[test]
    fn test_service_tags() {
        let env = ServiceEnvironment {
            stage: "staging".to_string(),
            function_version: "12".to_string(),
            ..Default::default()
        };
        let tags = env.tags();
        assert_eq!(tags.function_name, "EventIngestion");
        assert_eq!(tags.stage, "staging");
        assert_eq!(tags.function_version, "12");
    }
}
