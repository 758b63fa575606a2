//! Reconciles the API's inconsistent field naming into one canonical shape.
//!
//! Every record fetched from the API passes through [`normalize_record`]
//! before it is decoded, so views only ever see canonical keys.

use crate::api::dto::MatchResult;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    League,
    Team,
    Player,
    Standing,
    TeamTitle,
    PlayerDetail,
}

/// `(canonical key, source keys in priority order)`.
type AliasTable = &'static [(&'static str, &'static [&'static str])];

const TEAM_ALIASES: AliasTable = &[
    ("valorMercado", &["valorMercado", "valor_mercado"]),
    ("estadioLogo", &["estadioLogo", "estadiologo"]),
];

const PLAYER_ALIASES: AliasTable = &[
    ("idJugador", &["idJugador", "ID_Jugador"]),
    ("nombre", &["nombre", "Nombre"]),
    ("posicion", &["posicion", "Posicion"]),
    ("edad", &["edad", "Edad"]),
    ("nacionalidad", &["nacionalidad", "Nacionalidad"]),
    ("valor_mercado", &["valor_mercado", "valorMercado", "Valor_Mercado"]),
    ("logo", &["logo", "Foto"]),
];

const RESULT_KEYS: [&str; 5] = [
    "ultimo_partido_1",
    "ultimo_partido_2",
    "ultimo_partido_3",
    "ultimo_partido_4",
    "ultimo_partido_5",
];

fn aliases(kind: RecordKind) -> AliasTable {
    match kind {
        RecordKind::Team => TEAM_ALIASES,
        RecordKind::Player | RecordKind::PlayerDetail => PLAYER_ALIASES,
        RecordKind::League | RecordKind::Standing | RecordKind::TeamTitle => &[],
    }
}

fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Collapses each aliased concept onto its canonical key.
///
/// The first non-empty source wins; alternates are dropped. When every source
/// is empty the canonical key holds `null`. Records carrying none of the
/// sources are left untouched.
fn resolve_aliases(map: &mut Map<String, Value>, table: AliasTable) {
    for (canonical, sources) in table {
        if !sources.iter().any(|k| map.contains_key(*k)) {
            continue;
        }
        let winner = sources
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !is_empty(v))
            .cloned()
            .unwrap_or(Value::Null);
        for k in sources.iter() {
            if k != canonical {
                map.remove(*k);
            }
        }
        map.insert((*canonical).to_string(), winner);
    }
}

fn normalize_results(map: &mut Map<String, Value>) {
    for key in RESULT_KEYS {
        if let Some(v) = map.get_mut(key) {
            let code = v.as_str().and_then(MatchResult::parse);
            *v = match code {
                Some(c) => Value::String(c.code().to_string()),
                None => Value::Null,
            };
        }
    }
}

/// Normalizes a single record in place. Idempotent.
pub fn normalize_record(kind: RecordKind, record: &mut Value) {
    let Value::Object(map) = record else {
        return;
    };
    resolve_aliases(map, aliases(kind));
    if kind == RecordKind::Standing {
        normalize_results(map);
    }
}

/// Unwraps the list shapes the API produces.
///
/// Team titles come back as `[[...]]`; everything else is a flat array. A
/// single object is treated as a one-element list.
pub fn unwrap_collection(kind: RecordKind, body: Option<Value>) -> Vec<Value> {
    match body {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            if kind == RecordKind::TeamTitle {
                if let Some(Value::Array(_)) = items.first() {
                    return match items.into_iter().next() {
                        Some(Value::Array(inner)) => inner,
                        _ => Vec::new(),
                    };
                }
            }
            items
        }
        Some(obj @ Value::Object(_)) => vec![obj],
        Some(_) => Vec::new(),
    }
}

/// Detail endpoints answer with either an object or a one-element array.
pub fn unwrap_detail(body: Option<Value>) -> Option<Value> {
    match body? {
        Value::Array(items) => items.into_iter().next(),
        obj @ Value::Object(_) => Some(obj),
        _ => None,
    }
}

/// Normalizes every record of a fetched collection.
pub fn normalize_collection(kind: RecordKind, body: Option<Value>) -> Vec<Value> {
    let mut items = unwrap_collection(kind, body);
    for item in items.iter_mut() {
        normalize_record(kind, item);
    }
    items
}
