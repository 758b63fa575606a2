use super::form::{capitalize, Resource};
use super::mutation::{MutationOrigin, MutationRequest};
use super::selector::Collection;
use crate::api::Endpoints;
use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: i64,
    pub url: String,
    pub reload: Collection,
    pub noun: &'static str,
}

impl PendingDelete {
    /// `scope` supplies parent keys for nested URLs (player titles, history).
    pub fn of<T: Resource>(scope: &T, ep: &Endpoints, id: i64) -> Self {
        Self {
            id,
            url: scope.resource_url(ep, id),
            reload: T::owner(),
            noun: T::NOUN,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Delete {} with ID {}? This cannot be undone.",
            self.noun, self.id
        )
    }
}

/// Two-step delete: nothing is sent until the prompt is confirmed.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfirmation {
    pending: Option<PendingDelete>,
}

impl DeleteConfirmation {
    pub fn request(&mut self, target: PendingDelete) {
        self.pending = Some(target);
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    pub fn cancel(&mut self) -> Option<PendingDelete> {
        self.pending.take()
    }

    /// Closes the prompt and hands back the DELETE to run. The prompt does
    /// not reopen on failure.
    pub fn confirm(&mut self) -> Option<MutationRequest> {
        let target = self.pending.take()?;
        let noun = target.noun;
        Some(MutationRequest {
            method: Method::DELETE,
            url: target.url,
            body: None,
            reload: target.reload,
            origin: MutationOrigin::Delete,
            success: format!("{} deleted successfully", capitalize(noun)),
            failure: format!("Could not delete the {}", noun),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{League, PlayerTitle};
    use crate::api::scripted::ScriptedTransport;

    fn ep() -> Endpoints {
        Endpoints::new("http://api.test")
    }

    #[test]
    fn request_then_cancel_issues_nothing() {
        let mut confirm = DeleteConfirmation::default();
        confirm.request(PendingDelete::of(&League::default(), &ep(), 3));
        assert!(confirm.is_open());
        assert_eq!(
            confirm.pending().unwrap().prompt(),
            "Delete league with ID 3? This cannot be undone."
        );
        assert!(confirm.cancel().is_some());
        assert!(!confirm.is_open());
        assert!(confirm.confirm().is_none());
    }

    #[test]
    fn confirm_closes_and_builds_delete() {
        let mut confirm = DeleteConfirmation::default();
        confirm.request(PendingDelete::of(&League::default(), &ep(), 3));
        let req = confirm.confirm().unwrap();
        assert!(!confirm.is_open());
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.url, "http://api.test/ligas/3");
        assert_eq!(req.reload, Collection::Leagues);
        assert_eq!(req.success, "League deleted successfully");
    }

    #[test]
    fn nested_delete_uses_parent_scope() {
        let scope = PlayerTitle {
            player_id: Some(7),
            ..PlayerTitle::default()
        };
        let pending = PendingDelete::of(&scope, &ep(), 12);
        assert_eq!(pending.url, "http://api.test/jugadordetalles/7/titulos/12");
        assert_eq!(pending.reload, Collection::PlayerDetail);
    }

    #[tokio::test]
    async fn cancelled_prompt_never_reaches_the_network() {
        let (api, transport) = ScriptedTransport::client();
        let mut confirm = DeleteConfirmation::default();
        confirm.request(PendingDelete::of(&League::default(), api.endpoints(), 3));
        confirm.cancel();
        if let Some(req) = confirm.confirm() {
            req.execute(&api).await.unwrap();
        }
        assert!(transport.requests().is_empty());
    }
}
