use snafu::prelude::*;

use crate::common::{
    AuthSnafu, Credentials, DNSService, NotLoggedInSnafu, OverrideRecord, RemoteFaultSnafu,
    Result, Session,
};

use super::models::{affected_domains, override_records};
use super::{Value, XmlRpcClient, SERVICE_NAME};

/// DNS overrides on a Webfaction account, reached over XML-RPC.
pub struct WebfactionService {
    client: XmlRpcClient,
    session: Option<Session>,
}

impl WebfactionService {
    pub fn new(client: XmlRpcClient) -> Self {
        Self {
            client,
            session: None,
        }
    }

    fn session_id(&self) -> Result<Value> {
        self.session
            .as_ref()
            .map(|session| Value::from(session.session_id.as_str()))
            .context(NotLoggedInSnafu)
    }
}

impl DNSService for WebfactionService {
    fn login(&mut self, credentials: &Credentials) -> Result<&Session> {
        let mut params = vec![
            Value::from(credentials.username.as_str()),
            Value::from(credentials.password.as_str()),
        ];
        if let Some(machine) = &credentials.machine {
            params.push(Value::from(machine.as_str()));
        }

        let response = self.client.call("login", &params)?.context(AuthSnafu)?;
        let session = Session::try_from(response)?;

        tracing::info!(
            service = SERVICE_NAME,
            url = self.client.url().as_str(),
            username = credentials.username,
            machine = credentials.machine,
            "Logged in"
        );

        Ok(self.session.insert(session))
    }

    fn create_override(&mut self, domain: &str, ip: &str) -> Result<()> {
        let params = [self.session_id()?, Value::from(domain), Value::from(ip)];
        self.client
            .call("create_dns_override", &params)?
            .context(RemoteFaultSnafu {
                explanation: "Could not create a dns override",
            })?;

        tracing::debug!(
            service = SERVICE_NAME,
            domain = domain,
            ip = ip,
            "Created override"
        );
        Ok(())
    }

    fn delete_override(&mut self, domain: &str, ip: Option<&str>) -> Result<Vec<String>> {
        let mut params = vec![self.session_id()?, Value::from(domain)];
        if let Some(ip) = ip {
            params.push(Value::from(ip));
        }

        let response = self
            .client
            .call("delete_dns_override", &params)?
            .context(RemoteFaultSnafu {
                explanation: "Could not delete a dns override",
            })?;

        let affected = affected_domains(response);
        tracing::debug!(
            service = SERVICE_NAME,
            domain = domain,
            ip = ip,
            affected = affected.len(),
            "Deleted override"
        );
        Ok(affected)
    }

    fn list_overrides(&mut self) -> Result<Vec<OverrideRecord>> {
        let params = [self.session_id()?];
        let response = self
            .client
            .call("list_dns_overrides", &params)?
            .context(RemoteFaultSnafu {
                explanation: "Could not list dns overrides",
            })?;

        let records = override_records(response)?;
        tracing::debug!(
            service = SERVICE_NAME,
            records = records.len(),
            "Read completed"
        );
        Ok(records)
    }
}

impl From<super::Config> for WebfactionService {
    fn from(value: super::Config) -> Self {
        Self::new(XmlRpcClient::new(value.api_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;

    const LOGIN_OK: &str = "<methodResponse><params><param><value><array><data>\
        <value><string>sess-1</string></value>\
        <value><struct><member><name>username</name><value><string>jane</string></value>\
        </member></struct></value></data></array></value></param></params></methodResponse>";

    const EMPTY_OK: &str = "<methodResponse><params><param><value><struct></struct></value>\
        </param></params></methodResponse>";

    fn fault(code: i64, message: &str) -> String {
        format!(
            "<methodResponse><fault><value><struct>\
             <member><name>faultCode</name><value><int>{code}</int></value></member>\
             <member><name>faultString</name><value><string>{message}</string></value></member>\
             </struct></value></fault></methodResponse>"
        )
    }

    fn service(server: &mockito::Server) -> WebfactionService {
        WebfactionService::from(super::super::Config {
            api_url: url::Url::parse(&server.url()).unwrap(),
        })
    }

    fn jane() -> Credentials {
        "jane:secret@Web100".parse().unwrap()
    }

    #[test]
    fn login_sends_machine_and_stores_session() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex("<methodName>login</methodName>".into()),
                mockito::Matcher::Regex("<string>Web100</string>".into()),
            ]))
            .with_body(LOGIN_OK)
            .create();

        let mut wf = service(&server);
        let session = wf.login(&jane()).unwrap();
        assert_eq!(session.session_id, "sess-1");
        mock.assert();
    }

    #[test]
    fn login_fault_is_auth_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .with_body(fault(1, "LoginError"))
            .create();

        let err = service(&server).login(&jane()).unwrap_err();
        assert!(matches!(err, Error::AuthError { .. }));
        assert_eq!(err.to_string(), "Could not login :: fault 1: LoginError");
    }

    #[test]
    fn operations_require_login() {
        let server = mockito::Server::new();
        let err = service(&server).list_overrides().unwrap_err();
        assert!(matches!(err, Error::NotLoggedInError));
    }

    #[test]
    fn create_fault_is_remote_fault_with_explanation() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex("<methodName>login".into()))
            .with_body(LOGIN_OK)
            .create();
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex(
                "<methodName>create_dns_override".into(),
            ))
            .with_body(fault(1, "Domain does not exist"))
            .create();

        let mut wf = service(&server);
        wf.login(&jane()).unwrap();
        let err = wf.create_override("example.com", "10.0.0.1").unwrap_err();
        match err {
            Error::RemoteFault {
                explanation,
                source,
            } => {
                assert_eq!(explanation, "Could not create a dns override");
                assert_eq!(source.message, "Domain does not exist");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn delete_without_ip_sends_domain_only() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex("<methodName>login".into()))
            .with_body(LOGIN_OK)
            .create();
        let delete = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex(
                "<methodName>delete_dns_override</methodName><params>\
                 <param><value><string>sess-1</string></value></param>\
                 <param><value><string>example.com</string></value></param></params>"
                    .into(),
            ))
            .with_body(EMPTY_OK)
            .create();

        let mut wf = service(&server);
        wf.login(&jane()).unwrap();
        assert!(wf.delete_override("example.com", None).unwrap().is_empty());
        delete.assert();
    }
}
