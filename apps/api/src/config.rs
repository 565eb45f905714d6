use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::screening::bias::{BiasPolicy, BiasPolicyKind};
use crate::screening::collaborators::PhoneRegion;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub bias_policy: BiasPolicy,
    pub extraction_timeout: Duration,
    pub max_upload_bytes: usize,
    pub max_concurrent_parses: usize,
    pub phone_region: PhoneRegion,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let kind = lookup("BIAS_POLICY")
            .unwrap_or_else(|| "threshold".to_string())
            .parse::<BiasPolicyKind>()
            .map_err(|e| anyhow!(e))
            .context("BIAS_POLICY is invalid")?;

        let threshold = lookup("BIAS_THRESHOLD")
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|t| *t > 0.0 && *t < 1.0)
                    .ok_or_else(|| anyhow!("BIAS_THRESHOLD must be a number between 0 and 1, got '{raw}'"))
            })
            .transpose()?;

        let timeout_secs = lookup("EXTRACTION_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .context("EXTRACTION_TIMEOUT_SECS must be a positive number of seconds")?;

        let max_upload_mb = lookup("MAX_UPLOAD_MB")
            .unwrap_or_else(|| "25".to_string())
            .parse::<usize>()
            .ok()
            .filter(|mb| *mb > 0)
            .context("MAX_UPLOAD_MB must be a positive integer")?;

        let max_concurrent_parses = lookup("MAX_CONCURRENT_PARSES")
            .unwrap_or_else(|| "4".to_string())
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .context("MAX_CONCURRENT_PARSES must be a positive integer")?;

        let phone_region = lookup("PHONE_REGION")
            .unwrap_or_else(|| "IN".to_string())
            .parse::<PhoneRegion>()
            .map_err(|e| anyhow!(e))
            .context("PHONE_REGION is invalid")?;

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            bias_policy: BiasPolicy::new(kind, threshold),
            extraction_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            max_concurrent_parses,
            phone_region,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.bias_policy, BiasPolicy::default());
        assert_eq!(config.extraction_timeout, Duration::from_secs(30));
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.max_concurrent_parses, 4);
        assert_eq!(config.phone_region, PhoneRegion::India);
    }

    #[test]
    fn test_dominant_policy_gets_its_own_default_threshold() {
        let config = config_with(&[("BIAS_POLICY", "dominant")]).unwrap();
        assert_eq!(config.bias_policy.kind, BiasPolicyKind::Dominant);
        assert_eq!(config.bias_policy.threshold, 0.5);
    }

    #[test]
    fn test_threshold_override() {
        let config = config_with(&[("BIAS_THRESHOLD", "0.45")]).unwrap();
        assert_eq!(config.bias_policy.threshold, 0.45);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config_with(&[("BIAS_POLICY", "loudest")]).is_err());
        assert!(config_with(&[("BIAS_THRESHOLD", "1.5")]).is_err());
        assert!(config_with(&[("BIAS_THRESHOLD", "abc")]).is_err());
        assert!(config_with(&[("EXTRACTION_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_with(&[("MAX_UPLOAD_MB", "-2")]).is_err());
        assert!(config_with(&[("MAX_CONCURRENT_PARSES", "0")]).is_err());
        assert!(config_with(&[("PHONE_REGION", "ZZ")]).is_err());
        assert!(config_with(&[("PORT", "99999")]).is_err());
    }
}
