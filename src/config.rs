//! Gateway configuration

/// Claims backend used when `BACKEND_ORIGIN` is not set (local development).
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://localhost:8000";

/// Settings the gateway router is built with.
///
/// The backend origin is passed in explicitly at construction time; handlers
/// never read the environment themselves. The binary populates it from the
/// `BACKEND_ORIGIN` flag/env var.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    backend_origin: String,
}

impl GatewayConfig {
    /// Validates the backend origin and strips any trailing slash.
    pub fn new(backend_origin: impl Into<String>) -> Result<Self, String> {
        let origin = backend_origin.into();
        let parsed = url::Url::parse(&origin)
            .map_err(|e| format!("Invalid backend origin '{}': {}", origin, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "Backend origin '{}' must use http or https",
                origin
            ));
        }
        Ok(Self {
            backend_origin: origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn backend_origin(&self) -> &str {
        &self.backend_origin
    }

    /// Target URL for a claims request; `path` is the captured wildcard with
    /// its segments already joined by `/`.
    pub fn claims_url(&self, path: &str) -> String {
        format!("{}/api/claims/{}", self.backend_origin, path)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_ORIGIN).expect("default backend origin is valid")
    }
}
