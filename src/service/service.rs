use crate::common::{Action, Credentials, DNSService, HostResolver, PublicIpSource, Result};

use super::{OverrideReconciler, Report};

/// Logs in once and applies actions to the provider in order.
pub struct DNSOverrides {
    service: Box<dyn DNSService>,
    public_ip: Box<dyn PublicIpSource>,
    hosts: Box<dyn HostResolver>,
}

impl DNSOverrides {
    pub fn new(
        service: Box<dyn DNSService>,
        public_ip: Box<dyn PublicIpSource>,
        hosts: Box<dyn HostResolver>,
    ) -> Self {
        Self {
            service,
            public_ip,
            hosts,
        }
    }

    /// Applies `actions` strictly in order, handing each report to
    /// `on_report`. The first error aborts the remaining actions.
    pub fn run<F>(
        &mut self,
        credentials: &Credentials,
        actions: Vec<Action>,
        mut on_report: F,
    ) -> Result<()>
    where
        F: FnMut(Report) -> Result<()>,
    {
        let session = self.service.login(credentials)?;
        tracing::debug!(
            username = session
                .account
                .get("username")
                .and_then(|v| v.as_str())
                .unwrap_or(credentials.username.as_str()),
            actions = actions.len(),
            "Session started"
        );

        for action in actions {
            on_report(self.apply(action)?)?;
        }

        Ok(())
    }

    pub fn apply(&mut self, action: Action) -> Result<Report> {
        match action {
            Action::CreateOverride { domain, ip } => {
                let reconciled = OverrideReconciler::new(
                    self.service.as_mut(),
                    self.public_ip.as_ref(),
                    self.hosts.as_ref(),
                )
                .reconcile(&domain, ip.as_deref())?;

                tracing::info!(
                    domain = reconciled.domain,
                    ip = reconciled.ip,
                    outcome = ?reconciled.outcome,
                    "Created dns override"
                );
                Ok(Report::Reconciled(reconciled))
            }
            Action::DeleteOverride { domain, ip } => {
                let affected = self.service.delete_override(&domain, ip.as_deref())?;
                tracing::info!(
                    domain = domain,
                    ip = ip.as_deref(),
                    affected = affected.len(),
                    "Deleted dns override"
                );
                Ok(Report::Deleted {
                    domain,
                    ip,
                    affected,
                })
            }
            Action::ListOverrides => {
                let records = self.service.list_overrides()?;
                tracing::info!(records = records.len(), "Listed dns overrides");
                Ok(Report::Listed(records))
            }
        }
    }
}
