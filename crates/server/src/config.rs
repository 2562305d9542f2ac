use std::net::SocketAddr;

/// Runtime settings for the HTTP service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Algorithm used when a request names none
    pub default_algo: String,
    /// Number of recommendations when a request names none
    pub top_n: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            default_algo: models::AlgorithmKind::default().name().to_string(),
            top_n: 5,
        }
    }
}
