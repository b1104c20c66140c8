//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional, with defaults matching the demo shop:
//! - `BUGSTORE_HOST` - Bind address (default: 127.0.0.1)
//! - `BUGSTORE_PORT` - Listen port (default: 8000)
//! - `BUGSTORE_TAX_RATE` - Fractional tax rate (default: 0.08)
//! - `BUGSTORE_SHIPPING_FEE` - Flat shipping fee (default: 5.99)
//! - `BUGSTORE_FREE_SHIPPING_THRESHOLD` - Subtotal at which shipping is
//!   free (default: 100.00)
//! - `BUGSTORE_COLLABORATOR_TIMEOUT_MS` - Deadline for catalog, coupon,
//!   and order placement calls (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use bugstore_commerce::{PricingConfig, ShippingPolicy};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// BugStore server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Fractional tax rate applied to the discounted subtotal
    pub tax_rate: Decimal,
    /// Flat shipping fee below the free-shipping threshold
    pub shipping_fee: Decimal,
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Decimal,
    /// Deadline for collaborator calls
    pub collaborator_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or("BUGSTORE_HOST", "127.0.0.1")?,
            port: parse_env_or("BUGSTORE_PORT", "8000")?,
            tax_rate: parse_env_or("BUGSTORE_TAX_RATE", "0.08")?,
            shipping_fee: parse_env_or("BUGSTORE_SHIPPING_FEE", "5.99")?,
            free_shipping_threshold: parse_env_or("BUGSTORE_FREE_SHIPPING_THRESHOLD", "100.00")?,
            collaborator_timeout: Duration::from_millis(parse_env_or(
                "BUGSTORE_COLLABORATOR_TIMEOUT_MS",
                "2000",
            )?),
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The pricing rules derived from this configuration.
    #[must_use]
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            tax_rate: self.tax_rate,
            shipping: ShippingPolicy::FreeAbove {
                threshold: self.free_shipping_threshold,
                fee: self.shipping_fee,
            },
        }
    }
}

/// Parse an environment variable, falling back to a default.
fn parse_env_or<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_defaults_when_env_unset() {
        // Defaults flow through the same parser as real values.
        let fee: Decimal = parse_env_or("BUGSTORE_TEST_UNSET_FEE", "5.99").expect("default parses");
        assert_eq!(fee, dec!(5.99));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 8000,
            tax_rate: dec!(0.08),
            shipping_fee: dec!(5.99),
            free_shipping_threshold: dec!(100.00),
            collaborator_timeout: Duration::from_secs(2),
            sentry_dsn: None,
        };
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_pricing_uses_free_above_policy() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("valid ip"),
            port: 8000,
            tax_rate: dec!(0.08),
            shipping_fee: dec!(5.99),
            free_shipping_threshold: dec!(100.00),
            collaborator_timeout: Duration::from_secs(2),
            sentry_dsn: None,
        };
        let pricing = config.pricing();
        assert_eq!(pricing.shipping.amount_for(dec!(99.99)), dec!(5.99));
        assert_eq!(pricing.shipping.amount_for(dec!(100.00)), dec!(0.00));
    }
}
