use crate::common::{Error, OverrideRecord, ResponseSnafu, Result, Session};

use super::Value;

impl TryFrom<Value> for Session {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return ResponseSnafu {
                message: "Expected [session_id, account] from login",
            }
            .fail();
        };

        let mut items = items.into_iter();
        match (items.next(), items.next()) {
            (Some(Value::String(session_id)), Some(Value::Struct(account))) => Ok(Self {
                session_id,
                account,
            }),
            _ => ResponseSnafu {
                message: "Expected [session_id, account] from login",
            }
            .fail(),
        }
    }
}

impl TryFrom<&Value> for OverrideRecord {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        let domain = value
            .member("domain")
            .and_then(Value::as_str)
            .filter(|domain| !domain.is_empty())
            .ok_or_else(|| {
                ResponseSnafu {
                    message: "DNS override without a domain",
                }
                .build()
            })?;

        // CNAME or MX only overrides carry an empty a_ip.
        let ip = value
            .member("a_ip")
            .and_then(Value::as_str)
            .filter(|ip| !ip.is_empty());

        Ok(Self {
            domain: domain.to_string(),
            ip: ip.map(str::to_string),
        })
    }
}

pub(super) fn override_records(value: Value) -> Result<Vec<OverrideRecord>> {
    match value {
        Value::Array(items) => items.iter().map(OverrideRecord::try_from).collect(),
        _ => ResponseSnafu {
            message: "Expected a list of DNS overrides",
        }
        .fail(),
    }
}

/// Domain names mentioned in a delete_dns_override response.
pub(super) fn affected_domains(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(affected_domains).collect(),
        Value::Struct(mut members) => match members.remove("domain") {
            Some(Value::String(domain)) => vec![domain],
            _ => Vec::new(),
        },
        Value::String(domain) => vec![domain],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn record(domain: &str, a_ip: &str) -> Value {
        Value::Struct(BTreeMap::from([
            ("id".to_string(), Value::Int(7)),
            ("domain".to_string(), Value::from(domain)),
            ("a_ip".to_string(), Value::from(a_ip)),
            ("cname".to_string(), Value::from("")),
        ]))
    }

    #[test]
    fn decodes_overrides_in_order() {
        let records = override_records(Value::Array(vec![
            record("b.example.com", "10.0.0.2"),
            record("a.example.com", ""),
        ]))
        .unwrap();

        assert_eq!(
            records,
            vec![
                OverrideRecord {
                    domain: "b.example.com".into(),
                    ip: Some("10.0.0.2".into())
                },
                OverrideRecord {
                    domain: "a.example.com".into(),
                    ip: None
                },
            ]
        );
    }

    #[test]
    fn override_without_domain_is_rejected() {
        assert!(override_records(Value::Array(vec![record("", "1.2.3.4")])).is_err());
    }

    #[test]
    fn session_from_login_response() {
        let session = Session::try_from(Value::Array(vec![
            Value::from("abc"),
            Value::Struct(BTreeMap::from([(
                "username".to_string(),
                Value::from("jane"),
            )])),
        ]))
        .unwrap();
        assert_eq!(session.session_id, "abc");
        assert!(session.account.contains_key("username"));
    }

    #[test]
    fn affected_domains_from_struct_and_array() {
        assert_eq!(affected_domains(record("a.com", "1.2.3.4")), vec!["a.com"]);
        assert_eq!(
            affected_domains(Value::Array(vec![record("a.com", ""), Value::from("b.com")])),
            vec!["a.com", "b.com"]
        );
        assert!(affected_domains(Value::Bool(true)).is_empty());
    }
}
