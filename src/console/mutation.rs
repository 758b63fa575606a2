use super::selector::Collection;
use crate::api::{ApiClient, ApiError};
use reqwest::Method;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOrigin {
    /// Token of the form that issued the write.
    Form(u64),
    Delete,
}

/// A validated write, ready to run on the background actor.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    /// Collection re-fetched once the write succeeds.
    pub reload: Collection,
    pub origin: MutationOrigin,
    pub success: String,
    pub failure: String,
}

impl MutationRequest {
    pub async fn execute(&self, api: &ApiClient) -> Result<(), ApiError> {
        api.mutate(self.method.clone(), &self.url, self.body.clone())
            .await
    }

    /// Notification text for the outcome.
    pub fn outcome_message(&self, result: &Result<(), ApiError>) -> String {
        match result {
            Ok(()) => self.success.clone(),
            Err(e) => format!("{}: {}", self.failure, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scripted::ScriptedTransport;
    use serde_json::json;

    fn delete_league() -> MutationRequest {
        MutationRequest {
            method: Method::DELETE,
            url: "http://api.test/ligas/3".into(),
            body: None,
            reload: Collection::Leagues,
            origin: MutationOrigin::Delete,
            success: "League deleted".into(),
            failure: "Could not delete the league".into(),
        }
    }

    #[tokio::test]
    async fn execute_sends_method_url_and_body() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(200, json!({}));
        let mut req = delete_league();
        req.method = Method::POST;
        req.url = "http://api.test/ligas".into();
        req.body = Some(json!({"nombre": "Liga B"}));
        req.execute(&api).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].body, Some(json!({"nombre": "Liga B"})));
    }

    #[tokio::test]
    async fn failure_message_carries_server_text() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(409, json!({"error": "la liga tiene equipos"}));
        let req = delete_league();
        let result = req.execute(&api).await;
        assert_eq!(
            req.outcome_message(&result),
            "Could not delete the league: la liga tiene equipos"
        );
        assert_eq!(req.outcome_message(&Ok(())), "League deleted");
    }
}
