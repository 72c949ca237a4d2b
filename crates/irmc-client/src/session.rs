//! Waiting for iRMC sessions
//!
//! Long-running operations (profile exports, firmware updates) run as
//! sessions on the iRMC. A session is polled until its status reports it
//! terminated.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;
use crate::redfish::{json_path, RedfishClient};

/// Status reported for a session that terminated with an error
pub const SESSION_ERROR_STATUS: u16 = 29;

/// Final state of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    /// 200, or [`SESSION_ERROR_STATUS`]
    pub status: u16,
    /// The terminal `Session.Status` text
    pub session_status: String,
    /// Session log, fetched when the session ended in error
    pub log: Option<Value>,
    /// `Session result: <status>`
    pub message: String,
}

impl SessionOutcome {
    /// Whether the session finished without error
    pub fn is_success(&self) -> bool {
        self.status != SESSION_ERROR_STATUS
    }
}

/// Poll a session until it has terminated
///
/// Polls at the client's configured interval.
pub async fn wait_for_session(client: &RedfishClient, id: u64) -> Result<SessionOutcome> {
    let interval = client.config().poll_interval;
    loop {
        let status = client
            .get_json(&format!("sessionInformation/{}/status", id))
            .await?;
        let session_status = status_text(json_path(&status, &["Session", "Status"])?);

        if !session_status.contains("terminated") {
            debug!(session = id, status = %session_status, "session still running");
            tokio::time::sleep(interval).await;
            continue;
        }

        info!(session = id, status = %session_status, "session finished");
        let message = format!("Session result: {}", session_status);
        if session_status.contains("error") {
            let log = client
                .get_json(&format!("sessionInformation/{}/log", id))
                .await?;
            return Ok(SessionOutcome {
                status: SESSION_ERROR_STATUS,
                session_status,
                log: Some(log),
                message,
            });
        }
        return Ok(SessionOutcome {
            status: 200,
            session_status,
            log: None,
            message,
        });
    }
}

fn status_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::transport::{Exchange, HttpRequest, Transport};
    use crate::types::ClientConfig;

    /// Answers each request with the next scripted body
    struct ScriptedTransport {
        responses: Mutex<VecDeque<(u16, String)>>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(responses: &[(u16, &str)]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .iter()
                        .map(|(status, body)| (*status, body.to_string()))
                        .collect(),
                ),
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Exchange {
            self.urls.lock().unwrap().push(request.url.clone());
            let (status, body) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((500, String::new()));
            Exchange::completed(&request, status, body)
        }
    }

    fn client(transport: Arc<ScriptedTransport>) -> RedfishClient {
        let config = ClientConfig::new("irmc.local", "admin", "admin")
            .with_poll_interval(Duration::from_millis(1));
        RedfishClient::with_transport(config, transport)
    }

    #[tokio::test]
    async fn test_wait_until_terminated() {
        let transport = ScriptedTransport::new(&[
            (200, r#"{"Session": {"Id": 5, "Status": "running"}}"#),
            (200, r#"{"Session": {"Id": 5, "Status": "terminated regularly"}}"#),
        ]);

        let outcome = wait_for_session(&client(transport.clone()), 5).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.message, "Session result: terminated regularly");
        assert!(outcome.log.is_none());
        assert_eq!(transport.urls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_terminated_with_error_fetches_log() {
        let transport = ScriptedTransport::new(&[
            (200, r#"{"Session": {"Id": 7, "Status": "terminated with error"}}"#),
            (200, r#"{"SessionLog": {"Entries": ["profile invalid"]}}"#),
        ]);

        let outcome = wait_for_session(&client(transport.clone()), 7).await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.status, SESSION_ERROR_STATUS);
        assert_eq!(
            outcome.log.unwrap()["SessionLog"]["Entries"][0],
            "profile invalid"
        );
        assert_eq!(
            transport.urls.lock().unwrap().last().unwrap(),
            "https://irmc.local/sessionInformation/7/log"
        );
    }

    #[tokio::test]
    async fn test_status_request_failure() {
        let transport = ScriptedTransport::new(&[(404, r#"{"error": {"message": "No such session"}}"#)]);

        let err = wait_for_session(&client(transport), 9).await.unwrap_err();
        assert_eq!(err.status(), 404);
        assert!(err.to_string().ends_with("No such session"));
    }

    #[tokio::test]
    async fn test_missing_status_key() {
        let transport = ScriptedTransport::new(&[(200, r#"{"Session": {"Id": 9}}"#)]);

        let err = wait_for_session(&client(transport), 9).await.unwrap_err();
        assert_eq!(err.to_string(), "Key does not exist: 'Session Status'");
    }
}
