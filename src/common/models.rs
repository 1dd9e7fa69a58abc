use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use super::patterns::{CREDENTIALS, DOMAIN_ARGUMENT};
use super::{MalformedArgumentSnafu, Result, UsageSnafu};

use crate::webfaction::Value;

#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub machine: Option<String>,
}

impl FromStr for Credentials {
    type Err = super::Error;

    fn from_str(token: &str) -> Result<Self> {
        let caps = CREDENTIALS.captures(token).ok_or_else(|| {
            UsageSnafu {
                message: "Username and password are not specified correctly: username:password[@machine]",
            }
            .build()
        })?;
        Ok(Self {
            username: caps[1].to_string(),
            password: caps[2].to_string(),
            machine: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

// Never print the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub account: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OverrideRecord {
    pub domain: String,
    pub ip: Option<String>,
}

/// An action name as it appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    CreateDnsOverride,
    DeleteDnsOverride,
    ListDnsOverrides,
}

impl Verb {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "create_dns_override" => Some(Verb::CreateDnsOverride),
            "delete_dns_override" => Some(Verb::DeleteDnsOverride),
            "list_dns_overrides" => Some(Verb::ListDnsOverrides),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::CreateDnsOverride => "create_dns_override",
            Verb::DeleteDnsOverride => "delete_dns_override",
            Verb::ListDnsOverrides => "list_dns_overrides",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateOverride { domain: String, ip: Option<String> },
    DeleteOverride { domain: String, ip: Option<String> },
    ListOverrides,
}

impl Action {
    /// Builds a create or delete action from a `domain[@ip]` token.
    pub(crate) fn with_argument(verb: Verb, token: &str) -> Result<Self> {
        let caps = DOMAIN_ARGUMENT
            .captures(token)
            .ok_or_else(|| MalformedArgumentSnafu { token }.build())?;
        let domain = caps[1].to_string();
        let ip = caps.get(2).map(|m| m.as_str().to_string());
        Ok(match verb {
            Verb::CreateDnsOverride => Action::CreateOverride { domain, ip },
            Verb::DeleteDnsOverride => Action::DeleteOverride { domain, ip },
            Verb::ListDnsOverrides => Action::ListOverrides,
        })
    }
}

/// The provider's remote procedure interface, bound to one session.
pub trait DNSService {
    fn login(&mut self, credentials: &Credentials) -> Result<&Session>;
    fn create_override(&mut self, domain: &str, ip: &str) -> Result<()>;
    /// Deletes the override for `domain`. Without an ip, every override
    /// for the domain is removed. Returns the affected domain names.
    fn delete_override(&mut self, domain: &str, ip: Option<&str>) -> Result<Vec<String>>;
    fn list_overrides(&mut self) -> Result<Vec<OverrideRecord>>;
}

pub trait PublicIpSource {
    fn resolve(&self) -> Result<String>;
}

pub trait HostResolver {
    /// First IPv4 address the domain currently resolves to, if any.
    fn lookup_ipv4(&self, domain: &str) -> Option<Ipv4Addr>;
}
