//! Add/edit form state shared by every editable entity.

use super::mutation::{MutationOrigin, MutationRequest};
use super::selector::Collection;
use crate::api::dto::{HistoryEntry, League, Player, PlayerTitle, Standing, Team, TeamTitle};
use crate::api::{ApiError, Endpoints};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please fill in the required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Start year ({start}) cannot be later than end year ({end}).")]
    YearRange { start: i64, end: i64 },
    #[error("This team already has a standings row in this league. Edit the existing row instead.")]
    DuplicateStanding,
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("A save is already in progress.")]
    Busy,
}

/// An entity the console can create, edit and delete.
pub trait Resource: Clone + Default + Serialize + DeserializeOwned {
    const NOUN: &'static str;
    /// Wire name of the primary key; never editable.
    const ID_KEY: &'static str;

    fn id(&self) -> Option<i64>;
    fn label(&self) -> String;
    fn collection_url(&self, ep: &Endpoints) -> String;
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String;
    /// Collection that lists this entity, re-fetched after a write.
    fn owner() -> Collection;
    fn missing_fields(&self) -> Vec<&'static str>;

    fn cross_check(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

fn blank(v: &Option<String>) -> bool {
    v.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true)
}

fn unset(v: Option<i64>) -> bool {
    v.unwrap_or(0) == 0
}

fn required(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| *name)
        .collect()
}

fn year_order(start: Option<i64>, end: Option<i64>) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start != 0 && end != 0 && start > end => {
            Err(ValidationError::YearRange { start, end })
        }
        _ => Ok(()),
    }
}

fn name_or(name: &Option<String>, fallback: String) -> String {
    match name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => fallback,
    }
}

impl Resource for League {
    const NOUN: &'static str = "league";
    const ID_KEY: &'static str = "idLiga";

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn label(&self) -> String {
        name_or(&self.name, format!("league #{}", self.id.unwrap_or_default()))
    }
    fn collection_url(&self, ep: &Endpoints) -> String {
        ep.leagues()
    }
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String {
        ep.league_resource(id)
    }
    fn owner() -> Collection {
        Collection::Leagues
    }
    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("nombre", blank(&self.name)),
            ("pais", blank(&self.country)),
            ("nivel", blank(&self.tier)),
            ("año_inicio", unset(self.start_year)),
            ("año_fin", unset(self.end_year)),
            ("descripcion_historica", blank(&self.description)),
            ("imagen_logo", blank(&self.logo_url)),
            ("imagen_trofeo", blank(&self.trophy_url)),
        ])
    }
    fn cross_check(&self) -> Result<(), ValidationError> {
        year_order(self.start_year, self.end_year)
    }
}

impl Resource for Team {
    const NOUN: &'static str = "team";
    const ID_KEY: &'static str = "idEquipo";

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn label(&self) -> String {
        name_or(&self.name, format!("team #{}", self.id.unwrap_or_default()))
    }
    fn collection_url(&self, ep: &Endpoints) -> String {
        ep.teams()
    }
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String {
        ep.team(id)
    }
    fn owner() -> Collection {
        Collection::Teams
    }
    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("nombre", blank(&self.name)),
            ("idLiga", unset(self.league_id)),
            ("ciudad", blank(&self.city)),
            ("estadioNombre", blank(&self.stadium_name)),
            ("ubicacionEstadio", blank(&self.stadium_location)),
            ("valorMercado", blank(&self.market_value)),
            ("entrenador", blank(&self.coach)),
            ("presidente", blank(&self.president)),
            ("logo", blank(&self.logo)),
            ("estadioLogo", blank(&self.stadium_image)),
        ])
    }
}

impl Resource for Player {
    const NOUN: &'static str = "player";
    const ID_KEY: &'static str = "idJugador";

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn label(&self) -> String {
        name_or(&self.name, format!("player #{}", self.id.unwrap_or_default()))
    }
    fn collection_url(&self, ep: &Endpoints) -> String {
        ep.players()
    }
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String {
        ep.player(id)
    }
    fn owner() -> Collection {
        Collection::Players
    }
    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("nombre", blank(&self.name)),
            ("idEquipoActual", unset(self.team_id)),
        ])
    }
}

impl Resource for Standing {
    const NOUN: &'static str = "standing";
    const ID_KEY: &'static str = "idPosicion";

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn label(&self) -> String {
        name_or(
            &self.team_name,
            format!("team #{}", self.team_id.unwrap_or_default()),
        )
    }
    fn collection_url(&self, ep: &Endpoints) -> String {
        ep.standings()
    }
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String {
        ep.standing(id)
    }
    fn owner() -> Collection {
        Collection::Standings
    }
    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("idLiga", unset(self.league_id)),
            ("idEquipo", unset(self.team_id)),
            ("posicion", unset(self.rank)),
            ("puntos", self.points.is_none()),
        ])
    }
}

impl Resource for TeamTitle {
    const NOUN: &'static str = "team title";
    const ID_KEY: &'static str = "idTituloEquipo";

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn label(&self) -> String {
        name_or(&self.name, format!("title #{}", self.id.unwrap_or_default()))
    }
    fn collection_url(&self, ep: &Endpoints) -> String {
        ep.team_titles()
    }
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String {
        ep.team_title(id)
    }
    fn owner() -> Collection {
        Collection::TeamTitles
    }
    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("idEquipo", unset(self.team_id)),
            ("nombre_titulo", blank(&self.name)),
            ("año", unset(self.year)),
        ])
    }
}

impl Resource for PlayerTitle {
    const NOUN: &'static str = "player title";
    const ID_KEY: &'static str = "idTituloJugador";

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn label(&self) -> String {
        name_or(&self.name, format!("title #{}", self.id.unwrap_or_default()))
    }
    fn collection_url(&self, ep: &Endpoints) -> String {
        ep.player_titles(self.player_id.unwrap_or_default())
    }
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String {
        ep.player_title(self.player_id.unwrap_or_default(), id)
    }
    fn owner() -> Collection {
        Collection::PlayerDetail
    }
    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("idJugador", unset(self.player_id)),
            ("nombre_titulo", blank(&self.name)),
            ("año", unset(self.year)),
        ])
    }
}

impl Resource for HistoryEntry {
    const NOUN: &'static str = "history entry";
    const ID_KEY: &'static str = "idHistorial";

    fn id(&self) -> Option<i64> {
        self.id
    }
    fn label(&self) -> String {
        name_or(&self.club, format!("entry #{}", self.id.unwrap_or_default()))
    }
    fn collection_url(&self, ep: &Endpoints) -> String {
        ep.player_history(self.player_id.unwrap_or_default())
    }
    fn resource_url(&self, ep: &Endpoints, id: i64) -> String {
        ep.player_history_entry(self.player_id.unwrap_or_default(), id)
    }
    fn owner() -> Collection {
        Collection::PlayerDetail
    }
    fn missing_fields(&self) -> Vec<&'static str> {
        required(&[
            ("idJugador", unset(self.player_id)),
            ("club", blank(&self.club)),
            ("año_inicio", unset(self.start_year)),
        ])
    }
    fn cross_check(&self) -> Result<(), ValidationError> {
        year_order(self.start_year, self.end_year)
    }
}

pub(super) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(i64),
}

#[derive(Debug, Clone)]
pub struct FormController<T> {
    pub mode: FormMode,
    pub title: String,
    pub draft: T,
    /// Inline error shown inside the form.
    pub error: Option<String>,
    pub submitting: bool,
    /// Set by the owning screen; stamped on every write this form issues.
    pub token: u64,
}

impl<T: Resource> FormController<T> {
    /// Opens in edit mode when `existing` carries an id, add mode otherwise.
    pub fn open(existing: Option<&T>, defaults: T) -> Self {
        let (mode, title, draft) = match existing.and_then(|e| e.id().map(|id| (id, e))) {
            Some((id, entity)) => (
                FormMode::Edit(id),
                format!("Edit {}: {}", T::NOUN, entity.label()),
                entity.clone(),
            ),
            None => (FormMode::Add, format!("Add {}", T::NOUN), defaults),
        };
        Self {
            mode,
            title,
            draft,
            error: None,
            submitting: false,
            token: 0,
        }
    }

    /// Editable fields as `(wire name, display text)`.
    pub fn fields(&self) -> Vec<(String, String)> {
        let value = serde_json::to_value(&self.draft).unwrap_or(Value::Null);
        let Value::Object(map) = value else {
            return Vec::new();
        };
        map.into_iter()
            .filter(|(k, _)| k != T::ID_KEY)
            .map(|(k, v)| {
                let text = match v {
                    Value::Null => String::new(),
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields().into_iter().map(|(k, _)| k).collect()
    }

    /// Sets one field from raw text. Blank text clears the field.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), ValidationError> {
        let invalid = |e: serde_json::Error| ValidationError::InvalidValue {
            field: key.to_string(),
            reason: e.to_string(),
        };
        let mut value = serde_json::to_value(&self.draft).map_err(invalid)?;
        let map = match value.as_object_mut() {
            Some(map) if key != T::ID_KEY && map.contains_key(key) => map,
            _ => return Err(ValidationError::UnknownField(key.to_string())),
        };
        let raw = raw.trim();
        let next = if raw.is_empty() {
            Value::Null
        } else {
            Value::String(raw.to_string())
        };
        map.insert(key.to_string(), next);
        self.draft = serde_json::from_value(value).map_err(invalid)?;
        self.error = None;
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        self.draft.cross_check()
    }

    /// Validates and builds the write. Nothing is sent from here; a
    /// validation failure leaves the form open with the message set.
    pub fn submit<G>(&mut self, ep: &Endpoints, guard: G) -> Result<MutationRequest, ValidationError>
    where
        G: FnOnce(&T, FormMode) -> Result<(), ValidationError>,
    {
        if self.submitting {
            return Err(ValidationError::Busy);
        }
        let checked = self
            .validate()
            .and_then(|_| guard(&self.draft, self.mode));
        if let Err(e) = checked {
            self.error = Some(e.to_string());
            return Err(e);
        }
        let body = serde_json::to_value(&self.draft).map_err(|e| ValidationError::InvalidValue {
            field: T::NOUN.to_string(),
            reason: e.to_string(),
        })?;

        let (method, url, verb) = match self.mode {
            FormMode::Edit(id) => (Method::PUT, self.draft.resource_url(ep, id), "updated"),
            FormMode::Add => (Method::POST, self.draft.collection_url(ep), "added"),
        };
        self.submitting = true;
        self.error = None;
        Ok(MutationRequest {
            method,
            url,
            body: Some(body),
            reload: T::owner(),
            origin: MutationOrigin::Form(self.token),
            success: format!("{} {} successfully", capitalize(T::NOUN), verb),
            failure: format!("Could not save the {}", T::NOUN),
        })
    }

    /// Returns true when the form should close.
    pub fn complete(&mut self, result: &Result<(), ApiError>) -> bool {
        self.submitting = false;
        match result {
            Ok(()) => true,
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

fn no_guard<T>(_: &T, _: FormMode) -> Result<(), ValidationError> {
    Ok(())
}

impl<T: Resource> FormController<T> {
    pub fn submit_unguarded(&mut self, ep: &Endpoints) -> Result<MutationRequest, ValidationError> {
        self.submit(ep, no_guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::MatchResult;
    use serde_json::json;

    fn ep() -> Endpoints {
        Endpoints::new("http://api.test")
    }

    fn full_league(form: &mut FormController<League>) {
        for (k, v) in [
            ("nombre", "Liga B"),
            ("pais", "Chile"),
            ("nivel", "1"),
            ("año_inicio", "1933"),
            ("año_fin", "2024"),
            ("descripcion_historica", "Primera división"),
            ("imagen_logo", "l.png"),
            ("imagen_trofeo", "t.png"),
        ] {
            form.set_field(k, v).unwrap();
        }
    }

    fn full_team(form: &mut FormController<Team>) {
        for (k, v) in [
            ("nombre", "Club"),
            ("ciudad", "Santiago"),
            ("estadioNombre", "Estadio Nacional"),
            ("ubicacionEstadio", "Ñuñoa"),
            ("valorMercado", "500000"),
            ("entrenador", "A. Pérez"),
            ("presidente", "B. Soto"),
            ("logo", "c.png"),
            ("estadioLogo", "e.png"),
        ] {
            form.set_field(k, v).unwrap();
        }
    }

    #[test]
    fn titles_follow_mode() {
        let existing = League {
            id: Some(4),
            name: Some("Liga D".into()),
            ..League::default()
        };
        let edit = FormController::open(Some(&existing), League::default());
        assert_eq!(edit.mode, FormMode::Edit(4));
        assert_eq!(edit.title, "Edit league: Liga D");

        let add = FormController::<League>::open(None, League::default());
        assert_eq!(add.mode, FormMode::Add);
        assert_eq!(add.title, "Add league");
    }

    #[test]
    fn missing_required_fields_block_submission() {
        let mut form = FormController::<League>::open(None, League::default());
        form.set_field("nombre", "Liga B").unwrap();
        let err = form.submit_unguarded(&ep()).unwrap_err();
        match &err {
            ValidationError::MissingFields(fields) => {
                assert!(fields.contains(&"pais"));
                assert!(!fields.contains(&"nombre"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(form.error.as_deref(), Some(err.to_string().as_str()));
        assert!(!form.submitting);
    }

    #[test]
    fn league_year_range_is_checked() {
        let mut form = FormController::<League>::open(None, League::default());
        full_league(&mut form);
        form.set_field("año_inicio", "2030").unwrap();
        assert_eq!(
            form.submit_unguarded(&ep()),
            Err(ValidationError::YearRange {
                start: 2030,
                end: 2024
            })
        );
    }

    #[test]
    fn add_posts_to_collection_and_edit_puts_to_resource() {
        let mut add = FormController::<League>::open(None, League::default());
        full_league(&mut add);
        let req = add.submit_unguarded(&ep()).unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "http://api.test/ligas");
        assert_eq!(req.reload, Collection::Leagues);
        assert_eq!(req.success, "League added successfully");
        let body = req.body.unwrap();
        assert_eq!(body["nombre"], "Liga B");
        assert_eq!(body["año_inicio"], 1933);
        assert!(body.get("idLiga").is_none());

        let existing = League {
            id: Some(9),
            ..add.draft.clone()
        };
        let mut edit = FormController::open(Some(&existing), League::default());
        let req = edit.submit_unguarded(&ep()).unwrap();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.url, "http://api.test/ligas/9");
    }

    #[test]
    fn team_with_only_a_name_is_incomplete() {
        let mut form = FormController::open(
            None,
            Team {
                league_id: Some(1),
                ..Team::default()
            },
        );
        form.set_field("nombre", "Club").unwrap();
        match form.submit_unguarded(&ep()) {
            Err(ValidationError::MissingFields(fields)) => assert_eq!(
                fields,
                vec![
                    "ciudad",
                    "estadioNombre",
                    "ubicacionEstadio",
                    "valorMercado",
                    "entrenador",
                    "presidente",
                    "logo",
                    "estadioLogo"
                ]
            ),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!form.submitting);

        full_team(&mut form);
        form.set_field("descripcionHistorica", "").unwrap();
        let req = form.submit_unguarded(&ep()).unwrap();
        assert_eq!(req.url, "http://api.test/equipo");
    }

    #[test]
    fn unknown_and_id_fields_are_rejected() {
        let mut form = FormController::<Team>::open(None, Team::default());
        assert_eq!(
            form.set_field("colour", "red"),
            Err(ValidationError::UnknownField("colour".into()))
        );
        assert_eq!(
            form.set_field("idEquipo", "3"),
            Err(ValidationError::UnknownField("idEquipo".into()))
        );
        assert!(!form.field_names().contains(&"idEquipo".to_string()));
    }

    #[test]
    fn non_numeric_text_for_number_is_invalid() {
        let mut form = FormController::<Player>::open(None, Player::default());
        assert!(matches!(
            form.set_field("edad", "twenty"),
            Err(ValidationError::InvalidValue { .. })
        ));
        form.set_field("altura", "1.82").unwrap();
        assert_eq!(form.draft.height, Some(1.82));
        form.set_field("altura", "  ").unwrap();
        assert_eq!(form.draft.height, None);
    }

    #[test]
    fn standing_result_codes_are_uppercased() {
        let defaults = Standing {
            league_id: Some(2),
            ..Standing::default()
        };
        let mut form = FormController::open(None, defaults);
        form.set_field("ultimo_partido_1", "g").unwrap();
        form.set_field("idEquipo", "5").unwrap();
        form.set_field("posicion", "1").unwrap();
        form.set_field("puntos", "0").unwrap();
        assert_eq!(form.draft.last_1, Some(MatchResult::G));
        let req = form.submit_unguarded(&ep()).unwrap();
        let body = req.body.unwrap();
        assert_eq!(body["ultimo_partido_1"], "G");
        assert_eq!(body["idLiga"], 2);
        assert!(form.set_field("ultimo_partido_2", "W").is_err());
    }

    #[test]
    fn guard_rejection_stays_local() {
        let mut form = FormController::open(
            None,
            Standing {
                league_id: Some(2),
                team_id: Some(5),
                rank: Some(1),
                points: Some(10),
                ..Standing::default()
            },
        );
        let err = form
            .submit(&ep(), |_, _| Err(ValidationError::DuplicateStanding))
            .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateStanding);
        assert!(form.error.is_some());
        assert!(!form.submitting);
    }

    #[test]
    fn history_requires_ordered_years() {
        let mut form = FormController::open(
            None,
            HistoryEntry {
                player_id: Some(7),
                ..HistoryEntry::default()
            },
        );
        form.set_field("club", "Colo-Colo").unwrap();
        form.set_field("año_inicio", "2020").unwrap();
        form.set_field("año_fin", "2018").unwrap();
        assert!(matches!(
            form.submit_unguarded(&ep()),
            Err(ValidationError::YearRange { .. })
        ));
        form.set_field("año_fin", "").unwrap();
        let req = form.submit_unguarded(&ep()).unwrap();
        assert_eq!(req.url, "http://api.test/jugadordetalles/7/historial");
        assert_eq!(req.reload, Collection::PlayerDetail);
    }

    #[test]
    fn failed_save_keeps_form_open_with_error() {
        let mut form = FormController::open(
            None,
            Team {
                league_id: Some(1),
                ..Team::default()
            },
        );
        full_team(&mut form);
        form.submit_unguarded(&ep()).unwrap();
        assert_eq!(form.submit_unguarded(&ep()), Err(ValidationError::Busy));

        let err = ApiError::from_status(400, Some(&json!({"message": "nombre duplicado"})));
        assert!(!form.complete(&Err(err)));
        assert_eq!(form.error.as_deref(), Some("nombre duplicado"));
        assert!(!form.submitting);
        assert!(form.complete(&Ok(())));
    }
}
