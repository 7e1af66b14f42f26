//! Backend endpoint configuration.

/// Origin of the capture backend during development.
const DEFAULT_BASE: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base: String,
}

impl ApiConfig {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    /// Honours `PLASTISCAN_API_BASE` on native builds; the web bundle always
    /// talks to the default origin.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(base) = std::env::var("PLASTISCAN_API_BASE") {
            let trimmed = base.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }
        Self::default()
    }

    /// Base origin without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full URL for a versioned API path, e.g. `endpoint("images/")`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_versioned_paths() {
        let config = ApiConfig::new("http://sensor.local:9000");
        assert_eq!(
            config.endpoint("upload/"),
            "http://sensor.local:9000/api/v1/upload/"
        );
        assert_eq!(
            config.endpoint("/token/"),
            "http://sensor.local:9000/api/v1/token/"
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ApiConfig::new("http://sensor.local:9000///");
        assert_eq!(config.base(), "http://sensor.local:9000");
    }
}
