use snafu::prelude::*;

use crate::common::{Fault, RequestSnafu, ResponseSnafu, Result};

use super::xmlrpc::{decode_response, encode_call, Value};
use super::SERVICE_NAME;

/// Blocking XML-RPC client for a single endpoint.
pub struct XmlRpcClient {
    url: url::Url,
}

impl XmlRpcClient {
    pub fn new(url: url::Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Calls `method`. A fault reported by the server is returned as the
    /// inner error so callers can attach their own explanation.
    pub fn call(&self, method: &str, params: &[Value]) -> Result<std::result::Result<Value, Fault>> {
        let body = encode_call(method, params)?;

        tracing::debug!(
            url = self.url.as_str(),
            method = method,
            service = SERVICE_NAME,
            "Sending request"
        );

        let text = ureq::post(self.url.as_str())
            .set("Content-Type", "text/xml")
            .send_string(&body)
            .context(RequestSnafu {
                url: self.url.as_str(),
                method,
            })?
            .into_string()
            .map_err(|err| {
                ResponseSnafu {
                    message: format!("Failed to read {method} response: {err}"),
                }
                .build()
            })?;

        decode_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_method_call_and_decodes_result() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "text/xml")
            .match_body(mockito::Matcher::Regex(
                "<methodName>list_dns_overrides</methodName>".into(),
            ))
            .with_body(
                "<methodResponse><params><param><value><array><data></data></array>\
                 </value></param></params></methodResponse>",
            )
            .create();

        let client = XmlRpcClient::new(url::Url::parse(&server.url()).unwrap());
        let value = client
            .call("list_dns_overrides", &["session".into()])
            .unwrap()
            .unwrap();

        assert_eq!(value, Value::Array(Vec::new()));
        mock.assert();
    }

    #[test]
    fn http_error_is_a_request_error() {
        let mut server = mockito::Server::new();
        server.mock("POST", "/").with_status(503).create();

        let client = XmlRpcClient::new(url::Url::parse(&server.url()).unwrap());
        let err = client.call("login", &[]).unwrap_err();
        assert!(matches!(err, crate::common::Error::RequestError { .. }));
    }
}
