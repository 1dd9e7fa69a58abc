use crate::resolvers::{CheckIpResolver, SystemResolver};
use crate::service::DNSOverrides;
use crate::webfaction::WebfactionService;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub webfaction: crate::webfaction::Config,
    pub checkip: crate::resolvers::Config,
}

impl Config {
    /// Built-in endpoints, replaced by any override given.
    #[cfg(feature = "cli")]
    pub fn with_overrides(
        api_url: Option<&str>,
        lookup_url: Option<&str>,
    ) -> crate::common::Result<Self> {
        let invalid = |err: config::ConfigError| {
            crate::common::ConfigSnafu {
                message: err.to_string(),
            }
            .build()
        };

        config::Config::builder()
            .set_default("webfaction.api_url", crate::webfaction::DEFAULT_API_URL)
            .and_then(|b| b.set_default("checkip.lookup_url", crate::resolvers::DEFAULT_LOOKUP_URL))
            .and_then(|b| b.set_override_option("webfaction.api_url", api_url))
            .and_then(|b| b.set_override_option("checkip.lookup_url", lookup_url))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .map_err(invalid)
    }

    pub fn into_service(self) -> DNSOverrides {
        DNSOverrides::new(
            Box::new(WebfactionService::from(self.webfaction)),
            Box::new(CheckIpResolver::from(self.checkip)),
            Box::new(SystemResolver),
        )
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_webfaction_and_dyndns() {
        let config = Config::with_overrides(None, None).unwrap();
        assert_eq!(config.webfaction.api_url.as_str(), "https://api.webfaction.com/");
        assert_eq!(config.checkip.lookup_url.as_str(), "http://checkip.dyndns.org/");
    }

    #[test]
    fn overrides_replace_defaults() {
        let config = Config::with_overrides(Some("http://127.0.0.1:8080/RPC2"), None).unwrap();
        assert_eq!(config.webfaction.api_url.as_str(), "http://127.0.0.1:8080/RPC2");
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let err = Config::with_overrides(None, Some("not a url")).unwrap_err();
        assert!(matches!(err, crate::common::Error::ConfigError { .. }));
    }
}
