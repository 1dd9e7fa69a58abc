use crate::common::{
    DNSService, HostResolver, OverrideRecord, PublicIpSource, Result, StaleOverrideSnafu,
};

/// How a reconciliation converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Live DNS already answers with the desired ip.
    Resolved,
    /// The provider already holds the desired override.
    Unchanged,
    /// A new override was created.
    Created,
    /// Stale overrides were deleted before converging.
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub domain: String,
    pub ip: String,
    pub outcome: Outcome,
}

/// Converges the provider's override for one domain onto a desired ip
/// with as few remote calls as possible.
pub struct OverrideReconciler<'a> {
    service: &'a mut dyn DNSService,
    public_ip: &'a dyn PublicIpSource,
    hosts: &'a dyn HostResolver,
}

impl<'a> OverrideReconciler<'a> {
    pub fn new(
        service: &'a mut dyn DNSService,
        public_ip: &'a dyn PublicIpSource,
        hosts: &'a dyn HostResolver,
    ) -> Self {
        Self {
            service,
            public_ip,
            hosts,
        }
    }

    /// Makes `domain` point at `desired_ip`, or at the public ip of this
    /// host when none is given.
    ///
    /// Each round checks live DNS first and then the provider's list. A
    /// conflicting override is deleted and the round repeats, at most as
    /// many times as the first list had entries.
    pub fn reconcile(&mut self, domain: &str, desired_ip: Option<&str>) -> Result<Reconciled> {
        let ip = match desired_ip {
            Some(ip) => ip.to_string(),
            None => self.public_ip.resolve()?,
        };

        let mut max_deletions = None;
        let mut deletions = 0;

        loop {
            if self.resolves_to(domain, &ip) {
                tracing::debug!(domain = domain, ip = ip, "Live DNS already matches");
                return Ok(converged(domain, ip, Outcome::Resolved, deletions));
            }

            let records = self.service.list_overrides()?;
            let limit = *max_deletions.get_or_insert(records.len());

            match records.into_iter().find(|record| record.domain == domain) {
                Some(OverrideRecord {
                    ip: Some(existing), ..
                }) if existing == ip => {
                    tracing::debug!(domain = domain, ip = ip, "Override already present");
                    return Ok(converged(domain, ip, Outcome::Unchanged, deletions));
                }
                Some(stale) => {
                    if deletions >= limit {
                        return StaleOverrideSnafu { domain, deletions }.fail();
                    }
                    tracing::info!(
                        domain = domain,
                        stale_ip = stale.ip.as_deref(),
                        ip = ip,
                        "Deleting stale override"
                    );
                    self.service.delete_override(domain, stale.ip.as_deref())?;
                    deletions += 1;
                }
                None => {
                    tracing::info!(domain = domain, ip = ip, "Creating override");
                    self.service.create_override(domain, &ip)?;
                    return Ok(converged(domain, ip, Outcome::Created, deletions));
                }
            }
        }
    }

    fn resolves_to(&self, domain: &str, ip: &str) -> bool {
        self.hosts
            .lookup_ipv4(domain)
            .is_some_and(|live| live.to_string() == ip)
    }
}

fn converged(domain: &str, ip: String, outcome: Outcome, deletions: usize) -> Reconciled {
    Reconciled {
        domain: domain.to_string(),
        ip,
        outcome: if deletions == 0 {
            outcome
        } else {
            Outcome::Replaced
        },
    }
}
