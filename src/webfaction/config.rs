pub const DEFAULT_API_URL: &str = "https://api.webfaction.com/";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub api_url: url::Url,
}
