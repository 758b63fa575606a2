use super::dto::{League, Player, PlayerDetail, Standing, Team, TeamTitle};
use super::error::ApiError;
use super::transport::{ApiRequest, Transport};
use super::urls::Endpoints;
use crate::normalize::{self, RecordKind};
use log::info;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Typed access to the league API.
///
/// Reads go through the normalization layer before decoding; collection reads
/// carry the configured timeout, mutations run without one.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    list_timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        list_timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            endpoints,
            list_timeout,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_body(&self, url: String) -> Result<Option<Value>, ApiError> {
        let req = ApiRequest::get(url).with_timeout(self.list_timeout);
        self.transport.send(req).await?.into_result()
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        url: String,
    ) -> Result<Vec<T>, ApiError> {
        let body = self.get_body(url).await?;
        normalize::normalize_collection(kind, body)
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(ApiError::from))
            .collect()
    }

    async fn get_detail<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        url: String,
    ) -> Result<T, ApiError> {
        let body = self.get_body(url.clone()).await?;
        let mut record = normalize::unwrap_detail(body)
            .ok_or_else(|| ApiError::Decode(format!("no record returned by {}", url)))?;
        normalize::normalize_record(kind, &mut record);
        Ok(serde_json::from_value(record)?)
    }

    pub async fn leagues(&self) -> Result<Vec<League>, ApiError> {
        self.get_list(RecordKind::League, self.endpoints.leagues()).await
    }

    pub async fn league(&self, league_id: i64) -> Result<League, ApiError> {
        self.get_detail(RecordKind::League, self.endpoints.league_detail(league_id))
            .await
    }

    pub async fn league_teams(&self, league_id: i64) -> Result<Vec<Team>, ApiError> {
        self.get_list(RecordKind::Team, self.endpoints.league_teams(league_id))
            .await
    }

    pub async fn league_standings(&self, league_id: i64) -> Result<Vec<Standing>, ApiError> {
        let mut rows: Vec<Standing> = self
            .get_list(RecordKind::Standing, self.endpoints.league_standings(league_id))
            .await?;
        rows.sort_by_key(|r| r.rank.unwrap_or(i64::MAX));
        Ok(rows)
    }

    pub async fn team_players(&self, team_id: i64) -> Result<Vec<Player>, ApiError> {
        self.get_list(RecordKind::Player, self.endpoints.team_players(team_id))
            .await
    }

    pub async fn team_titles(&self, team_id: i64) -> Result<Vec<TeamTitle>, ApiError> {
        self.get_list(RecordKind::TeamTitle, self.endpoints.team_title(team_id))
            .await
    }

    pub async fn player_detail(&self, player_id: i64) -> Result<PlayerDetail, ApiError> {
        self.get_detail(
            RecordKind::PlayerDetail,
            self.endpoints.player_detail(player_id),
        )
        .await
    }

    /// Executes a create/update/delete. The response body is ignored.
    pub async fn mutate(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        let req = ApiRequest {
            method: method.clone(),
            url: url.to_string(),
            body,
            timeout: None,
        };
        self.transport.send(req).await?.into_result()?;
        info!("{} {} ok", method, url);
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<ApiClient [{}]>", self.endpoints.base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scripted::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn league_teams_are_normalized_before_decoding() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(
            200,
            json!([{"idEquipo": 1, "nombre": "A", "valorMercado": null, "valor_mercado": "500000"}]),
        );
        let teams = api.league_teams(1).await.unwrap();
        assert_eq!(teams[0].market_value.as_deref(), Some("500000"));
        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].url, "http://api.test/liga/equipos/1");
        assert_eq!(sent[0].timeout, Some(Duration::from_secs(8)));
    }

    #[tokio::test]
    async fn standings_are_sorted_by_rank() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(
            200,
            json!([
                {"idPosicion": 1, "idEquipo": 5, "posicion": 3},
                {"idPosicion": 2, "idEquipo": 6, "posicion": 1},
                {"idPosicion": 3, "idEquipo": 7}
            ]),
        );
        let rows = api.league_standings(2).await.unwrap();
        let ranks: Vec<_> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![Some(1), Some(3), None]);
    }

    #[tokio::test]
    async fn non_success_surfaces_server_message() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(400, json!({"message": "nombre requerido"}));
        let err = api
            .mutate(Method::POST, "http://api.test/ligas", Some(json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "nombre requerido");
        assert_eq!(transport.requests()[0].timeout, None);
    }

    #[tokio::test]
    async fn detail_from_single_element_array() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(200, json!([{"idLiga": 4, "nombre": "Liga D"}]));
        let league = api.league(4).await.unwrap();
        assert_eq!(league.name.as_deref(), Some("Liga D"));

        transport.respond(200, json!([]));
        assert!(matches!(api.league(5).await, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn transport_failures_pass_through() {
        let (api, transport) = ScriptedTransport::client();
        transport.fail(ApiError::Timeout);
        assert_eq!(api.leagues().await.unwrap_err(), ApiError::Timeout);
    }
}
