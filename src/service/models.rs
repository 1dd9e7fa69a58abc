use crate::common::OverrideRecord;

use super::Reconciled;

/// Result of one applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Reconciled(Reconciled),
    Deleted {
        domain: String,
        ip: Option<String>,
        affected: Vec<String>,
    },
    Listed(Vec<OverrideRecord>),
}
