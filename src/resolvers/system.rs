use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};

use crate::common::HostResolver;

/// Resolves names through the operating system resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn lookup_ipv4(&self, domain: &str) -> Option<Ipv4Addr> {
        let addrs = match (domain, 0).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(err) => {
                tracing::debug!(domain = domain, error = %err, "Lookup failed");
                return None;
            }
        };

        addrs
            .map(|addr| addr.ip())
            .find_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
    }
}
