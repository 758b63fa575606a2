//! Per-screen state: selector chain, open form, pending delete.

use super::confirm::{DeleteConfirmation, PendingDelete};
use super::form::{FormController, FormMode, Resource, ValidationError};
use super::mutation::{MutationOrigin, MutationRequest};
use super::notify::{NoticeKind, NotificationQueue};
use super::selector::{Applied, Collection, FetchTicket, Level, Loaded, SelectorChain};
use crate::api::dto::{HistoryEntry, League, Player, PlayerTitle, Standing, Team, TeamTitle};
use crate::api::{ApiError, Endpoints};
use log::{debug, info};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Leagues,
    Teams,
    Standings,
    Titles,
    Players,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 5] = [
        ScreenKind::Leagues,
        ScreenKind::Teams,
        ScreenKind::Standings,
        ScreenKind::Titles,
        ScreenKind::Players,
    ];

    pub fn plan(self) -> &'static [Collection] {
        match self {
            ScreenKind::Leagues => &[Collection::Leagues],
            ScreenKind::Teams => &[Collection::Leagues, Collection::LeagueInfo, Collection::Teams],
            ScreenKind::Standings => &[
                Collection::Leagues,
                Collection::LeagueInfo,
                Collection::Standings,
                Collection::Teams,
            ],
            ScreenKind::Titles => &[
                Collection::Leagues,
                Collection::LeagueInfo,
                Collection::Teams,
                Collection::TeamTitles,
            ],
            ScreenKind::Players => &[
                Collection::Leagues,
                Collection::Teams,
                Collection::Players,
                Collection::PlayerDetail,
            ],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScreenKind::Leagues => "Leagues",
            ScreenKind::Teams => "Teams",
            ScreenKind::Standings => "Standings",
            ScreenKind::Titles => "Team titles",
            ScreenKind::Players => "Players",
        }
    }

    /// Collection shown as the screen's main table.
    pub fn primary(self) -> Collection {
        match self {
            ScreenKind::Leagues => Collection::Leagues,
            ScreenKind::Teams => Collection::Teams,
            ScreenKind::Standings => Collection::Standings,
            ScreenKind::Titles => Collection::TeamTitles,
            ScreenKind::Players => Collection::Players,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScreenKind::Leagues => "leagues",
            ScreenKind::Teams => "teams",
            ScreenKind::Standings => "standings",
            ScreenKind::Titles => "titles",
            ScreenKind::Players => "players",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ScreenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "leagues" | "ligas" | "home" => Ok(ScreenKind::Leagues),
            "teams" | "equipos" => Ok(ScreenKind::Teams),
            "standings" | "posiciones" => Ok(ScreenKind::Standings),
            "titles" | "titulos" => Ok(ScreenKind::Titles),
            "players" | "jugadores" => Ok(ScreenKind::Players),
            other => Err(format!("Unknown screen: {}", other)),
        }
    }
}

/// What an add/delete command acts on within the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Primary,
    Title,
    History,
}

#[derive(Debug, Clone)]
pub enum Editor {
    League(FormController<League>),
    Team(FormController<Team>),
    Player(FormController<Player>),
    Standing(FormController<Standing>),
    TeamTitle(FormController<TeamTitle>),
    PlayerTitle(FormController<PlayerTitle>),
    History(FormController<HistoryEntry>),
}

macro_rules! on_form {
    ($editor:expr, $form:ident => $body:expr) => {
        match $editor {
            Editor::League($form) => $body,
            Editor::Team($form) => $body,
            Editor::Player($form) => $body,
            Editor::Standing($form) => $body,
            Editor::TeamTitle($form) => $body,
            Editor::PlayerTitle($form) => $body,
            Editor::History($form) => $body,
        }
    };
}

impl Editor {
    pub fn title(&self) -> &str {
        on_form!(self, f => f.title.as_str())
    }

    pub fn fields(&self) -> Vec<(String, String)> {
        on_form!(self, f => f.fields())
    }

    pub fn field_names(&self) -> Vec<String> {
        on_form!(self, f => f.field_names())
    }

    pub fn error(&self) -> Option<&str> {
        on_form!(self, f => f.error.as_deref())
    }

    pub fn is_submitting(&self) -> bool {
        on_form!(self, f => f.submitting)
    }

    pub fn mode(&self) -> FormMode {
        on_form!(self, f => f.mode)
    }

    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), ValidationError> {
        on_form!(self, f => f.set_field(key, raw))
    }

    fn token(&self) -> u64 {
        on_form!(self, f => f.token)
    }

    fn set_token(&mut self, token: u64) {
        on_form!(self, f => f.token = token)
    }

    fn complete(&mut self, result: &Result<(), ApiError>) -> bool {
        on_form!(self, f => f.complete(result))
    }
}

fn find<'a, T: Resource>(rows: Option<&'a Vec<T>>, id: i64) -> Option<&'a T> {
    rows?.iter().find(|r| r.id() == Some(id))
}

#[derive(Debug, Clone)]
pub struct ScreenState {
    pub kind: ScreenKind,
    pub chain: SelectorChain,
    pub editor: Option<Editor>,
    pub confirm: DeleteConfirmation,
    /// Highlighted row of the primary table.
    pub cursor: usize,
    /// Bumped for every form opened on this screen.
    form_seq: u64,
}

impl ScreenState {
    pub fn mount(kind: ScreenKind) -> (Self, Vec<FetchTicket>) {
        let mut chain = SelectorChain::new(kind.plan());
        let tickets = chain.mount();
        let state = Self {
            kind,
            chain,
            editor: None,
            confirm: DeleteConfirmation::default(),
            cursor: 0,
            form_seq: 0,
        };
        (state, tickets)
    }

    pub fn select(&mut self, level: Level, id: Option<i64>) -> Result<Vec<FetchTicket>, String> {
        match self.chain.depth() {
            Some(deepest) if level <= deepest => {}
            _ => {
                return Err(format!(
                    "The {} screen has no {:?} selector",
                    self.kind.name(),
                    level
                ))
            }
        }
        if level > Level::League && self.chain.selection(Level::League).is_none() && id.is_some() {
            return Err("Select a league first".to_string());
        }
        if level > Level::Team && self.chain.selection(Level::Team).is_none() && id.is_some() {
            return Err("Select a team first".to_string());
        }
        if self.kind.primary().owner().map(|o| o >= level).unwrap_or(false) {
            self.cursor = 0;
        }
        Ok(self.chain.set_selection(level, id))
    }

    pub fn apply_fetch(&mut self, ticket: &FetchTicket, outcome: Result<Loaded, String>) -> Applied {
        let applied = self.chain.apply(ticket, outcome);
        if applied == Applied::Stale {
            debug!("discarded stale {} response", ticket.collection().label());
        }
        let rows = self.primary_ids().len();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
        applied
    }

    /// Ids of the primary table, in display order.
    pub fn primary_ids(&self) -> Vec<i64> {
        fn ids<T: Resource>(rows: Option<&Vec<T>>) -> Vec<i64> {
            rows.map(|r| r.iter().filter_map(Resource::id).collect())
                .unwrap_or_default()
        }
        match self.kind {
            ScreenKind::Leagues => ids(self.chain.leagues.ready()),
            ScreenKind::Teams => ids(self.chain.teams.ready()),
            ScreenKind::Standings => ids(self.chain.standings.ready()),
            ScreenKind::Titles => ids(self.chain.team_titles.ready()),
            ScreenKind::Players => ids(self.chain.players.ready()),
        }
    }

    pub fn id_at_cursor(&self) -> Option<i64> {
        self.primary_ids().get(self.cursor).copied()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.primary_ids().len();
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, rows as isize - 1) as usize;
    }

    /// Re-fetches every planned collection whose parent is selected.
    pub fn reload_all(&mut self) -> Vec<FetchTicket> {
        self.chain
            .plan()
            .iter()
            .filter_map(|c| self.chain.reload(*c))
            .collect()
    }

    fn ensure_idle(&self) -> Result<(), String> {
        if self.editor.is_some() {
            return Err("Close the open form first".to_string());
        }
        if self.confirm.is_open() {
            return Err("Answer the delete prompt first".to_string());
        }
        Ok(())
    }

    fn require(&self, level: Level) -> Result<i64, String> {
        self.chain.selection(level).ok_or_else(|| match level {
            Level::League => "Select a league first".to_string(),
            Level::Team => "Select a team first".to_string(),
            Level::Player => "Select a player first".to_string(),
        })
    }

    pub fn open_add(&mut self, target: Target) -> Result<(), String> {
        self.ensure_idle()?;
        let editor = match (self.kind, target) {
            (ScreenKind::Leagues, Target::Primary) => {
                Editor::League(FormController::open(None, League::default()))
            }
            (ScreenKind::Teams, Target::Primary) => {
                let league_id = self.require(Level::League)?;
                Editor::Team(FormController::open(
                    None,
                    Team {
                        league_id: Some(league_id),
                        ..Team::default()
                    },
                ))
            }
            (ScreenKind::Standings, Target::Primary) => {
                let league_id = self.require(Level::League)?;
                Editor::Standing(FormController::open(
                    None,
                    Standing {
                        league_id: Some(league_id),
                        ..Standing::default()
                    },
                ))
            }
            (ScreenKind::Titles, Target::Primary | Target::Title) => {
                let team_id = self.require(Level::Team)?;
                Editor::TeamTitle(FormController::open(
                    None,
                    TeamTitle {
                        team_id: Some(team_id),
                        ..TeamTitle::default()
                    },
                ))
            }
            (ScreenKind::Players, Target::Primary) => {
                let team_id = self.require(Level::Team)?;
                Editor::Player(FormController::open(
                    None,
                    Player {
                        team_id: Some(team_id),
                        ..Player::default()
                    },
                ))
            }
            (ScreenKind::Players, Target::Title) => {
                let player_id = self.require(Level::Player)?;
                Editor::PlayerTitle(FormController::open(
                    None,
                    PlayerTitle {
                        player_id: Some(player_id),
                        ..PlayerTitle::default()
                    },
                ))
            }
            (ScreenKind::Players, Target::History) => {
                let player_id = self.require(Level::Player)?;
                Editor::History(FormController::open(
                    None,
                    HistoryEntry {
                        player_id: Some(player_id),
                        ..HistoryEntry::default()
                    },
                ))
            }
            (kind, target) => {
                return Err(format!("Cannot add {:?} on the {} screen", target, kind.name()))
            }
        };
        self.install(editor);
        Ok(())
    }

    pub fn open_edit(&mut self, id: i64) -> Result<(), String> {
        self.ensure_idle()?;
        let not_found = || format!("No {} row with ID {}", self.kind.name(), id);
        let editor = match self.kind {
            ScreenKind::Leagues => {
                let row = find(self.chain.leagues.ready(), id).ok_or_else(not_found)?;
                Editor::League(FormController::open(Some(row), League::default()))
            }
            ScreenKind::Teams => {
                let row = find(self.chain.teams.ready(), id).ok_or_else(not_found)?;
                Editor::Team(FormController::open(Some(row), Team::default()))
            }
            ScreenKind::Standings => {
                let row = find(self.chain.standings.ready(), id).ok_or_else(not_found)?;
                Editor::Standing(FormController::open(Some(row), Standing::default()))
            }
            ScreenKind::Players => {
                let row = find(self.chain.players.ready(), id).ok_or_else(not_found)?;
                Editor::Player(FormController::open(Some(row), Player::default()))
            }
            ScreenKind::Titles => {
                return Err("Team titles can only be added or deleted".to_string())
            }
        };
        self.install(editor);
        Ok(())
    }

    fn install(&mut self, mut editor: Editor) {
        self.form_seq += 1;
        editor.set_token(self.form_seq);
        self.editor = Some(editor);
    }

    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), String> {
        let editor = self.editor.as_mut().ok_or("No form is open")?;
        editor.set_field(key, raw).map_err(|e| e.to_string())
    }

    /// Validates the open form. Standings reject a second row for a team
    /// already present in the loaded table.
    pub fn submit(&mut self, ep: &Endpoints) -> Result<MutationRequest, String> {
        let taken: Vec<i64> = self
            .chain
            .standings
            .ready()
            .map(|rows| rows.iter().filter_map(|r| r.team_id).collect())
            .unwrap_or_default();
        let editor = self.editor.as_mut().ok_or("No form is open")?;
        let result = match editor {
            Editor::Standing(form) => form.submit(ep, |draft, mode| match (mode, draft.team_id) {
                (FormMode::Add, Some(team)) if taken.contains(&team) => {
                    Err(ValidationError::DuplicateStanding)
                }
                _ => Ok(()),
            }),
            Editor::League(form) => form.submit_unguarded(ep),
            Editor::Team(form) => form.submit_unguarded(ep),
            Editor::Player(form) => form.submit_unguarded(ep),
            Editor::TeamTitle(form) => form.submit_unguarded(ep),
            Editor::PlayerTitle(form) => form.submit_unguarded(ep),
            Editor::History(form) => form.submit_unguarded(ep),
        };
        result.map_err(|e| e.to_string())
    }

    pub fn cancel_form(&mut self) -> bool {
        self.editor.take().is_some()
    }

    pub fn request_delete(&mut self, target: Target, id: i64, ep: &Endpoints) -> Result<String, String> {
        self.ensure_idle()?;
        let missing = |noun: &str| format!("No {} with ID {}", noun, id);
        let pending = match (self.kind, target) {
            (ScreenKind::Leagues, Target::Primary) => {
                find(self.chain.leagues.ready(), id).ok_or_else(|| missing(League::NOUN))?;
                PendingDelete::of(&League::default(), ep, id)
            }
            (ScreenKind::Teams, Target::Primary) => {
                find(self.chain.teams.ready(), id).ok_or_else(|| missing(Team::NOUN))?;
                PendingDelete::of(&Team::default(), ep, id)
            }
            (ScreenKind::Standings, Target::Primary) => {
                find(self.chain.standings.ready(), id).ok_or_else(|| missing(Standing::NOUN))?;
                PendingDelete::of(&Standing::default(), ep, id)
            }
            (ScreenKind::Titles, Target::Primary | Target::Title) => {
                find(self.chain.team_titles.ready(), id).ok_or_else(|| missing(TeamTitle::NOUN))?;
                PendingDelete::of(&TeamTitle::default(), ep, id)
            }
            (ScreenKind::Players, Target::Primary) => {
                find(self.chain.players.ready(), id).ok_or_else(|| missing(Player::NOUN))?;
                PendingDelete::of(&Player::default(), ep, id)
            }
            (ScreenKind::Players, Target::Title) => {
                let player_id = self.require(Level::Player)?;
                let titles = self.chain.player_detail.ready().map(|d| &d.titles);
                find(titles, id).ok_or_else(|| missing(PlayerTitle::NOUN))?;
                let scope = PlayerTitle {
                    player_id: Some(player_id),
                    ..PlayerTitle::default()
                };
                PendingDelete::of(&scope, ep, id)
            }
            (ScreenKind::Players, Target::History) => {
                let player_id = self.require(Level::Player)?;
                let history = self.chain.player_detail.ready().map(|d| &d.history);
                find(history, id).ok_or_else(|| missing(HistoryEntry::NOUN))?;
                let scope = HistoryEntry {
                    player_id: Some(player_id),
                    ..HistoryEntry::default()
                };
                PendingDelete::of(&scope, ep, id)
            }
            (kind, target) => {
                return Err(format!("Cannot delete {:?} on the {} screen", target, kind.name()))
            }
        };
        let prompt = pending.prompt();
        self.confirm.request(pending);
        Ok(prompt)
    }

    pub fn confirm_delete(&mut self) -> Option<MutationRequest> {
        self.confirm.confirm()
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.confirm.cancel().is_some()
    }

    /// Applies a finished write: notification, form close, and on success
    /// exactly one reload of the owning collection.
    pub fn finish_mutation(
        &mut self,
        req: &MutationRequest,
        result: &Result<(), ApiError>,
        notices: &mut NotificationQueue,
        now_ms: i64,
    ) -> Option<FetchTicket> {
        let kind = match result {
            Ok(()) => NoticeKind::Success,
            Err(_) => NoticeKind::Error,
        };
        notices.push(req.outcome_message(result), kind, now_ms);

        // a form opened after this write was sent is not touched
        if let MutationOrigin::Form(token) = req.origin {
            let close = self
                .editor
                .as_mut()
                .filter(|e| e.token() == token)
                .map(|e| e.complete(result))
                .unwrap_or(false);
            if close {
                self.editor = None;
            }
        }

        if result.is_err() {
            return None;
        }
        let ticket = self.chain.reload(req.reload);
        info!(
            "{} {} done, reloading {}",
            req.method,
            req.url,
            req.reload.label()
        );
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scripted::ScriptedTransport;
    use crate::api::ApiClient;
    use reqwest::Method;
    use serde_json::json;

    async fn run_all(screen: &mut ScreenState, api: &ApiClient, tickets: Vec<FetchTicket>) {
        for t in tickets {
            let res = t.run(api).await.map_err(|e| e.to_string());
            screen.apply_fetch(&t, res);
        }
    }

    async fn standings_screen(api: &ApiClient, transport: &ScriptedTransport) -> ScreenState {
        transport.respond(200, json!([{"idLiga": 2, "nombre": "Liga B"}]));
        let (mut screen, tickets) = ScreenState::mount(ScreenKind::Standings);
        run_all(&mut screen, api, tickets).await;

        transport.respond(200, json!({"idLiga": 2, "nombre": "Liga B"}));
        transport.respond(
            200,
            json!([{"idPosicion": 1, "idLiga": 2, "idEquipo": 5, "posicion": 1, "puntos": 30}]),
        );
        transport.respond(200, json!([{"idEquipo": 5, "nombre": "Club"}, {"idEquipo": 6, "nombre": "Otro"}]));
        let tickets = screen.select(Level::League, Some(2)).unwrap();
        run_all(&mut screen, api, tickets).await;
        screen
    }

    #[tokio::test]
    async fn duplicate_standing_is_rejected_without_a_request() {
        let (api, transport) = ScriptedTransport::client();
        let mut screen = standings_screen(&api, &transport).await;
        let sent_before = transport.requests().len();

        screen.open_add(Target::Primary).unwrap();
        screen.set_field("idEquipo", "5").unwrap();
        screen.set_field("posicion", "2").unwrap();
        screen.set_field("puntos", "10").unwrap();
        let err = screen.submit(api.endpoints()).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateStanding.to_string());
        assert_eq!(transport.requests().len(), sent_before);
        assert!(screen.editor.is_some());

        screen.set_field("idEquipo", "6").unwrap();
        let req = screen.submit(api.endpoints()).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "http://api.test/posiciones_liga");
    }

    #[tokio::test]
    async fn editing_an_existing_standing_is_not_a_duplicate() {
        let (api, transport) = ScriptedTransport::client();
        let mut screen = standings_screen(&api, &transport).await;
        screen.open_edit(1).unwrap();
        screen.set_field("puntos", "33").unwrap();
        let req = screen.submit(api.endpoints()).unwrap();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.url, "http://api.test/posiciones_liga/1");
    }

    #[tokio::test]
    async fn empty_required_field_never_reaches_the_network() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(200, json!([]));
        let (mut screen, tickets) = ScreenState::mount(ScreenKind::Leagues);
        run_all(&mut screen, &api, tickets).await;

        screen.open_add(Target::Primary).unwrap();
        screen.set_field("nombre", "Liga Z").unwrap();
        assert!(screen.submit(api.endpoints()).is_err());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn successful_create_reloads_owner_exactly_once() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(200, json!([{"idLiga": 1, "nombre": "Liga A"}]));
        let (mut screen, tickets) = ScreenState::mount(ScreenKind::Teams);
        run_all(&mut screen, &api, tickets).await;
        transport.respond(200, json!({"idLiga": 1}));
        transport.respond(200, json!([]));
        let tickets = screen.select(Level::League, Some(1)).unwrap();
        run_all(&mut screen, &api, tickets).await;
        assert_eq!(screen.chain.teams.ready(), Some(&vec![]));

        screen.open_add(Target::Primary).unwrap();
        screen.set_field("nombre", "Club Nuevo").unwrap();
        assert!(screen.submit(api.endpoints()).is_err());
        for (k, v) in [
            ("ciudad", "Talca"),
            ("estadioNombre", "Fiscal"),
            ("ubicacionEstadio", "Talca"),
            ("valorMercado", "250000"),
            ("entrenador", "C. Rojas"),
            ("presidente", "D. Vera"),
            ("logo", "r.png"),
            ("estadioLogo", "f.png"),
        ] {
            screen.set_field(k, v).unwrap();
        }
        let req = screen.submit(api.endpoints()).unwrap();
        assert_eq!(req.body.as_ref().unwrap()["idLiga"], 1);

        transport.respond(201, json!({"idEquipo": 9}));
        let result = req.execute(&api).await;
        let mut notices = NotificationQueue::default();
        let reload = screen.finish_mutation(&req, &result, &mut notices, 0);
        assert!(screen.editor.is_none());
        assert_eq!(notices.iter().next().unwrap().kind, NoticeKind::Success);

        transport.respond(200, json!([{"idEquipo": 9, "nombre": "Club Nuevo"}]));
        run_all(&mut screen, &api, reload.into_iter().collect()).await;
        assert_eq!(transport.count(&Method::POST, "http://api.test/equipo"), 1);
        assert_eq!(transport.count(&Method::GET, "http://api.test/liga/equipos/1"), 2);
        assert_eq!(screen.chain.teams.ready().map(|t| t.len()), Some(1));
    }

    #[tokio::test]
    async fn failed_save_keeps_form_and_skips_reload() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(200, json!([]));
        let (mut screen, tickets) = ScreenState::mount(ScreenKind::Leagues);
        run_all(&mut screen, &api, tickets).await;

        screen.open_add(Target::Primary).unwrap();
        for (k, v) in [
            ("nombre", "Liga B"),
            ("pais", "Chile"),
            ("nivel", "1"),
            ("año_inicio", "1933"),
            ("año_fin", "2024"),
            ("descripcion_historica", "x"),
            ("imagen_logo", "l.png"),
            ("imagen_trofeo", "t.png"),
        ] {
            screen.set_field(k, v).unwrap();
        }
        let req = screen.submit(api.endpoints()).unwrap();
        transport.respond(500, json!({}));
        let result = req.execute(&api).await;
        let mut notices = NotificationQueue::default();
        assert!(screen
            .finish_mutation(&req, &result, &mut notices, 0)
            .is_none());
        let editor = screen.editor.as_ref().unwrap();
        assert_eq!(editor.error(), Some("HTTP 500"));
        assert!(!editor.is_submitting());
        let notice = notices.iter().next().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Could not save the league: HTTP 500");
        assert_eq!(transport.count(&Method::GET, "http://api.test/ligas"), 1);
    }

    #[tokio::test]
    async fn delete_confirm_and_cancel() {
        let (api, transport) = ScriptedTransport::client();
        transport.respond(200, json!([{"idLiga": 1}, {"idLiga": 3}]));
        let (mut screen, tickets) = ScreenState::mount(ScreenKind::Leagues);
        run_all(&mut screen, &api, tickets).await;

        screen.request_delete(Target::Primary, 3, api.endpoints()).unwrap();
        assert!(screen.cancel_delete());
        assert_eq!(transport.count(&Method::DELETE, "http://api.test/ligas/3"), 0);

        assert!(screen.request_delete(Target::Primary, 42, api.endpoints()).is_err());

        screen.request_delete(Target::Primary, 3, api.endpoints()).unwrap();
        let req = screen.confirm_delete().unwrap();
        assert!(!screen.confirm.is_open());
        transport.respond(404, json!({"message": "no existe"}));
        let result = req.execute(&api).await;
        let mut notices = NotificationQueue::default();
        assert!(screen
            .finish_mutation(&req, &result, &mut notices, 0)
            .is_none());
        assert!(!screen.confirm.is_open());
        assert_eq!(
            notices.iter().next().unwrap().message,
            "Could not delete the league: no existe"
        );
    }

    #[tokio::test]
    async fn player_sub_entities_need_a_selected_player() {
        let (api, transport) = ScriptedTransport::client();
        let (mut screen, tickets) = ScreenState::mount(ScreenKind::Players);
        run_all(&mut screen, &api, tickets).await;
        assert_eq!(
            screen.open_add(Target::Title),
            Err("Select a player first".to_string())
        );
        assert_eq!(
            screen.select(Level::Team, Some(4)).unwrap_err(),
            "Select a league first"
        );

        for (level, id) in [(Level::League, 1), (Level::Team, 4)] {
            let tickets = screen.select(level, Some(id)).unwrap();
            run_all(&mut screen, &api, tickets).await;
        }
        transport.respond(
            200,
            json!({"idJugador": 7, "nombre": "Ana", "titulos": [{"idTituloJugador": 12, "nombre_titulo": "Copa"}], "historial": []}),
        );
        let tickets = screen.select(Level::Player, Some(7)).unwrap();
        run_all(&mut screen, &api, tickets).await;
        assert_eq!(transport.count(&Method::GET, "http://api.test/jugadordetalles/7"), 1);

        screen.open_add(Target::History).unwrap();
        assert_eq!(screen.editor.as_ref().unwrap().title(), "Add history entry");
        screen.cancel_form();

        let prompt = screen.request_delete(Target::Title, 12, api.endpoints()).unwrap();
        assert_eq!(prompt, "Delete player title with ID 12? This cannot be undone.");
        let req = screen.confirm_delete().unwrap();
        assert_eq!(req.url, "http://api.test/jugadordetalles/7/titulos/12");
        assert_eq!(req.reload, Collection::PlayerDetail);
    }

    #[test]
    fn leagues_screen_has_no_selectors() {
        let (mut screen, tickets) = ScreenState::mount(ScreenKind::Leagues);
        assert_eq!(tickets.len(), 1);
        assert!(screen.select(Level::League, Some(1)).is_err());
        assert!(screen.open_edit(1).is_err());
    }

    #[test]
    fn screen_names_parse() {
        assert_eq!("Equipos".parse::<ScreenKind>(), Ok(ScreenKind::Teams));
        assert_eq!("standings".parse::<ScreenKind>(), Ok(ScreenKind::Standings));
        assert!("matches".parse::<ScreenKind>().is_err());
    }
}
