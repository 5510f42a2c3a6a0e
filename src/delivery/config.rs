use std::time::Duration;

/// Collector endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/receive";

/// How long shutdown waits for an in-flight delivery by default
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Delivery client configuration
#[derive(Debug, Clone)]
pub struct DeliveryOptions {
    /// URL the mirror is POSTed to
    pub endpoint: String,

    /// Longest wait for the delivery outcome before giving up on it
    pub grace_period: Duration,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl DeliveryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the collector endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builder method: set the grace period
    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = DeliveryOptions::default();
        assert_eq!(opts.endpoint, "http://localhost:5000/receive");
        assert_eq!(opts.grace_period, Duration::from_secs(5));
    }

    #[test]
    fn test_builder() {
        let opts = DeliveryOptions::new()
            .endpoint("http://collector:8080/receive")
            .grace_period(Duration::from_millis(250));

        assert_eq!(opts.endpoint, "http://collector:8080/receive");
        assert_eq!(opts.grace_period, Duration::from_millis(250));
    }
}
