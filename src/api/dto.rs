use serde::{Deserialize, Serialize};

/// Decoders that accept the API's loose typing: numbers arrive as JSON numbers
/// or as strings, text fields occasionally arrive as numbers.
pub mod lenient {
    use super::MatchResult;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected integer, got {}", n))),
            Some(Value::String(s)) => {
                let t = s.trim();
                if t.is_empty() {
                    return Ok(None);
                }
                t.parse::<i64>()
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("expected integer, got \"{}\"", s)))
            }
            Some(other) => Err(D::Error::custom(format!("expected integer, got {}", other))),
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => {
                let t = s.trim();
                if t.is_empty() {
                    return Ok(None);
                }
                t.parse::<f64>()
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("expected number, got \"{}\"", s)))
            }
            Some(other) => Err(D::Error::custom(format!("expected number, got {}", other))),
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(D::Error::custom(format!("expected text, got {}", other))),
        }
    }

    pub fn opt_result<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MatchResult>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => MatchResult::parse(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("result must be G, E or P, got \"{}\"", s))),
            Some(other) => Err(D::Error::custom(format!("expected result code, got {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct League {
    #[serde(rename = "idLiga", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "pais", default, deserialize_with = "lenient::opt_string")]
    pub country: Option<String>,
    #[serde(rename = "nivel", default, deserialize_with = "lenient::opt_string")]
    pub tier: Option<String>,
    #[serde(rename = "año_inicio", default, deserialize_with = "lenient::opt_i64")]
    pub start_year: Option<i64>,
    #[serde(rename = "año_fin", default, deserialize_with = "lenient::opt_i64")]
    pub end_year: Option<i64>,
    #[serde(rename = "descripcion_historica", default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(rename = "imagen_logo", default, deserialize_with = "lenient::opt_string")]
    pub logo_url: Option<String>,
    #[serde(rename = "imagen_trofeo", default, deserialize_with = "lenient::opt_string")]
    pub trophy_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "idEquipo", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "idLiga", default, deserialize_with = "lenient::opt_i64")]
    pub league_id: Option<i64>,
    #[serde(rename = "ciudad", default, deserialize_with = "lenient::opt_string")]
    pub city: Option<String>,
    #[serde(rename = "estadioNombre", default, deserialize_with = "lenient::opt_string")]
    pub stadium_name: Option<String>,
    #[serde(rename = "ubicacionEstadio", default, deserialize_with = "lenient::opt_string")]
    pub stadium_location: Option<String>,
    #[serde(rename = "descripcionHistorica", default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(rename = "valorMercado", default, deserialize_with = "lenient::opt_string")]
    pub market_value: Option<String>,
    #[serde(rename = "entrenador", default, deserialize_with = "lenient::opt_string")]
    pub coach: Option<String>,
    #[serde(rename = "presidente", default, deserialize_with = "lenient::opt_string")]
    pub president: Option<String>,
    #[serde(rename = "logo", default, deserialize_with = "lenient::opt_string")]
    pub logo: Option<String>,
    #[serde(rename = "estadioLogo", default, deserialize_with = "lenient::opt_string")]
    pub stadium_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "idJugador", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "edad", default, deserialize_with = "lenient::opt_i64")]
    pub age: Option<i64>,
    #[serde(rename = "fecha_nacimiento", default, deserialize_with = "lenient::opt_string")]
    pub birth_date: Option<String>,
    #[serde(rename = "nacionalidad", default, deserialize_with = "lenient::opt_string")]
    pub nationality: Option<String>,
    #[serde(rename = "altura", default, deserialize_with = "lenient::opt_f64")]
    pub height: Option<f64>,
    #[serde(rename = "peso", default, deserialize_with = "lenient::opt_f64")]
    pub weight: Option<f64>,
    #[serde(rename = "pierna_habil", default, deserialize_with = "lenient::opt_string")]
    pub preferred_foot: Option<String>,
    #[serde(rename = "posicion", default, deserialize_with = "lenient::opt_string")]
    pub position: Option<String>,
    #[serde(rename = "posicion_ideal", default, deserialize_with = "lenient::opt_string")]
    pub ideal_position: Option<String>,
    #[serde(rename = "idEquipoActual", default, deserialize_with = "lenient::opt_i64")]
    pub team_id: Option<i64>,
    #[serde(rename = "valor_mercado", default, deserialize_with = "lenient::opt_string")]
    pub market_value: Option<String>,
    #[serde(rename = "numero_camiseta", default, deserialize_with = "lenient::opt_i64")]
    pub shirt_number: Option<i64>,
    #[serde(rename = "logo", default, deserialize_with = "lenient::opt_string")]
    pub photo: Option<String>,
    #[serde(rename = "habilidades", default, deserialize_with = "lenient::opt_string")]
    pub skills: Option<String>,
    #[serde(rename = "nacionalidad_logo", default, deserialize_with = "lenient::opt_string")]
    pub nationality_flag: Option<String>,
    #[serde(rename = "caracteristicas", default, deserialize_with = "lenient::opt_string")]
    pub traits: Option<String>,
    #[serde(rename = "atributos", default, deserialize_with = "lenient::opt_string")]
    pub attributes: Option<String>,
}

/// Recent-form code: G (win), E (draw), P (loss).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    G,
    E,
    P,
}

impl MatchResult {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "G" => Some(MatchResult::G),
            "E" => Some(MatchResult::E),
            "P" => Some(MatchResult::P),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            MatchResult::G => "G",
            MatchResult::E => "E",
            MatchResult::P => "P",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    #[serde(rename = "idPosicion", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(rename = "idLiga", default, deserialize_with = "lenient::opt_i64")]
    pub league_id: Option<i64>,
    #[serde(rename = "idEquipo", default, deserialize_with = "lenient::opt_i64")]
    pub team_id: Option<i64>,
    #[serde(rename = "nombreEquipo", default, skip_serializing, deserialize_with = "lenient::opt_string")]
    pub team_name: Option<String>,
    #[serde(rename = "posicion", default, deserialize_with = "lenient::opt_i64")]
    pub rank: Option<i64>,
    #[serde(rename = "puntos", default, deserialize_with = "lenient::opt_i64")]
    pub points: Option<i64>,
    #[serde(rename = "ultimo_partido_1", default, deserialize_with = "lenient::opt_result")]
    pub last_1: Option<MatchResult>,
    #[serde(rename = "ultimo_partido_2", default, deserialize_with = "lenient::opt_result")]
    pub last_2: Option<MatchResult>,
    #[serde(rename = "ultimo_partido_3", default, deserialize_with = "lenient::opt_result")]
    pub last_3: Option<MatchResult>,
    #[serde(rename = "ultimo_partido_4", default, deserialize_with = "lenient::opt_result")]
    pub last_4: Option<MatchResult>,
    #[serde(rename = "ultimo_partido_5", default, deserialize_with = "lenient::opt_result")]
    pub last_5: Option<MatchResult>,
}

impl Standing {
    pub fn last_five(&self) -> [Option<MatchResult>; 5] {
        [self.last_1, self.last_2, self.last_3, self.last_4, self.last_5]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamTitle {
    #[serde(rename = "idTituloEquipo", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(rename = "idEquipo", default, deserialize_with = "lenient::opt_i64")]
    pub team_id: Option<i64>,
    #[serde(rename = "nombre_titulo", default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "año", default, deserialize_with = "lenient::opt_i64")]
    pub year: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerTitle {
    #[serde(rename = "idTituloJugador", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(rename = "idJugador", default, deserialize_with = "lenient::opt_i64")]
    pub player_id: Option<i64>,
    #[serde(rename = "nombre_titulo", default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "año", default, deserialize_with = "lenient::opt_i64")]
    pub year: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "idHistorial", default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(rename = "idJugador", default, deserialize_with = "lenient::opt_i64")]
    pub player_id: Option<i64>,
    #[serde(rename = "club", default, deserialize_with = "lenient::opt_string")]
    pub club: Option<String>,
    #[serde(rename = "año_inicio", default, deserialize_with = "lenient::opt_i64")]
    pub start_year: Option<i64>,
    #[serde(rename = "año_fin", default, deserialize_with = "lenient::opt_i64")]
    pub end_year: Option<i64>,
    #[serde(rename = "logo", default, deserialize_with = "lenient::opt_string")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerDetail {
    #[serde(flatten)]
    pub player: Player,
    #[serde(rename = "titulos", default)]
    pub titles: Vec<PlayerTitle>,
    #[serde(rename = "historial", default)]
    pub history: Vec<HistoryEntry>,
}
