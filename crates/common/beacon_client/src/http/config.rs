use std::time::Duration;

use url::Url;

use crate::resolver::DEFAULT_VALIDATOR_BATCH_SIZE;

pub const DEFAULT_BEACON_API_ENDPOINT: &str = "http://localhost:5052";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconApiConfig {
    pub endpoint: Url,
    pub request_timeout: Duration,
    pub validator_batch_size: usize,
}

impl BeaconApiConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            validator_batch_size: DEFAULT_VALIDATOR_BATCH_SIZE,
        }
    }

    /// Config for a beacon node on the default local port.
    pub fn local() -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(DEFAULT_BEACON_API_ENDPOINT)?))
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_validator_batch_size(mut self, validator_batch_size: usize) -> Self {
        self.validator_batch_size = validator_batch_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_defaults() {
        let config = BeaconApiConfig::local()
            .expect("default endpoint")
            .with_validator_batch_size(100);
        assert_eq!(config.endpoint.as_str(), "http://localhost:5052/");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.validator_batch_size, 100);
    }
}
