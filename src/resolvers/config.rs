pub const DEFAULT_LOOKUP_URL: &str = "http://checkip.dyndns.org";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub lookup_url: url::Url,
}
