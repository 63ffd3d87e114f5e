//! Server configuration

/// Configuration for the listening endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (default: all interfaces)
    pub host: String,
    /// Port registered with the tournament
    pub port: u16,
    /// Disable Nagle's algorithm on the game connection (default: true)
    pub nodelay: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 0,
            nodelay: true,
        }
    }
}

impl ServerConfig {
    /// Listen on `port` on all interfaces
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Listen on loopback only
    pub fn localhost(port: u16) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port,
            ..Default::default()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
