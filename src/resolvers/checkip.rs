use snafu::prelude::*;

use crate::common::{find_dotted_quad, IpDiscoverySnafu, IpParseSnafu, PublicIpSource, Result};

const RESOLVER_NAME: &str = "CheckIP";

/// Discovers the public IPv4 address by scraping a lookup page such as
/// checkip.dyndns.org.
pub struct CheckIpResolver {
    url: url::Url,
}

impl CheckIpResolver {
    pub fn new(url: url::Url) -> Self {
        Self { url }
    }
}

impl PublicIpSource for CheckIpResolver {
    fn resolve(&self) -> Result<String> {
        let url = self.url.as_str();
        tracing::debug!(url = url, resolver = RESOLVER_NAME, "Fetching external ip");

        let body = ureq::get(url)
            .call()
            .boxed_local()
            .context(IpDiscoverySnafu { url })?
            .into_string()
            .boxed_local()
            .context(IpDiscoverySnafu { url })?;

        let ip = find_dotted_quad(&body).context(IpParseSnafu { url })?;

        tracing::info!(resolver = RESOLVER_NAME, ip = ip, "Fetched your external ip");
        Ok(ip.to_string())
    }
}

impl From<super::Config> for CheckIpResolver {
    fn from(value: super::Config) -> Self {
        Self::new(value.lookup_url)
    }
}
