use snafu::prelude::*;

/// A fault reported by the remote XML-RPC service.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(display("fault {code}: {message}"))]
pub struct Fault {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{message}"))]
    UsageError { message: String },
    #[snafu(display("Unknown action: {action}"))]
    UnknownActionError { action: String },
    #[snafu(display("Domain not specified correctly, expected domain[@ip]: {token}"))]
    MalformedArgumentError { token: String },
    #[snafu(display("Could not login :: {source}"))]
    AuthError { source: Fault },
    #[snafu(display("{explanation} :: {source}"))]
    RemoteFault { explanation: String, source: Fault },
    #[snafu(display("Not logged in"))]
    NotLoggedInError,
    #[snafu(display("Could not fetch your external ip-address from {url} :: {source}"))]
    IpDiscoveryError {
        url: String,
        source: Box<dyn std::error::Error>,
    },
    #[snafu(display("Could not parse an ip-address from the response of {url}"))]
    IpParseError { url: String },
    #[snafu(display("{method} {url} failed: {source}"))]
    RequestError {
        url: String,
        method: String,
        source: ureq::Error,
    },
    #[snafu(display("{message}"))]
    ResponseError { message: String },
    #[snafu(display("{message}: {source}"))]
    EncodeError {
        message: String,
        source: Box<dyn std::error::Error>,
    },
    #[snafu(display("Invalid configuration: {message}"))]
    ConfigError { message: String },
    #[snafu(display("Override for {domain} is still stale after {deletions} deletions"))]
    StaleOverrideError { domain: String, deletions: usize },
}

impl Error {
    /// Whether the error was caused by a malformed invocation, which the
    /// user can correct by reading the help text.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::UsageError { .. }
                | Error::UnknownActionError { .. }
                | Error::MalformedArgumentError { .. }
                | Error::ConfigError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_fault_carries_explanation_and_detail() {
        let err = Error::RemoteFault {
            explanation: "Could not create a dns override".into(),
            source: Fault {
                code: 1,
                message: "Domain does not exist".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Could not create a dns override :: fault 1: Domain does not exist"
        );
        assert!(!err.is_usage());
    }

    #[test]
    fn sequencing_errors_are_usage_errors() {
        assert!(Error::UnknownActionError {
            action: "a.com".into()
        }
        .is_usage());
        assert!(Error::MalformedArgumentError { token: "@".into() }.is_usage());
        assert!(!Error::NotLoggedInError.is_usage());
    }
}
