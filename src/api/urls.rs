/// Endpoint builder for the league REST API.
///
/// The base URL comes from configuration, so every path is derived from an
/// `Endpoints` value instead of a compile-time constant.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Leagues
    pub fn leagues(&self) -> String {
        format!("{}/ligas", self.base)
    }
    /// PUT / DELETE target for a league.
    pub fn league_resource(&self, league_id: i64) -> String {
        format!("{}/ligas/{}", self.base, league_id)
    }
    pub fn league_detail(&self, league_id: i64) -> String {
        format!("{}/liga/{}", self.base, league_id)
    }
    pub fn league_teams(&self, league_id: i64) -> String {
        format!("{}/liga/equipos/{}", self.base, league_id)
    }

    /// Teams
    pub fn teams(&self) -> String {
        format!("{}/equipo", self.base)
    }
    pub fn team(&self, team_id: i64) -> String {
        format!("{}/equipo/{}", self.base, team_id)
    }
    pub fn team_players(&self, team_id: i64) -> String {
        format!("{}/equipo/jugadores/{}", self.base, team_id)
    }

    /// Team titles
    pub fn team_titles(&self) -> String {
        format!("{}/equipo/titulo", self.base)
    }
    /// GET lists the titles of a team, DELETE removes a single title.
    pub fn team_title(&self, id: i64) -> String {
        format!("{}/equipo/titulo/{}", self.base, id)
    }

    /// Players
    pub fn players(&self) -> String {
        format!("{}/jugadores", self.base)
    }
    pub fn player(&self, player_id: i64) -> String {
        format!("{}/jugadores/{}", self.base, player_id)
    }
    pub fn player_detail(&self, player_id: i64) -> String {
        format!("{}/jugadordetalles/{}", self.base, player_id)
    }
    pub fn player_titles(&self, player_id: i64) -> String {
        format!("{}/jugadordetalles/{}/titulos", self.base, player_id)
    }
    pub fn player_title(&self, player_id: i64, title_id: i64) -> String {
        format!("{}/{}", self.player_titles(player_id), title_id)
    }
    pub fn player_history(&self, player_id: i64) -> String {
        format!("{}/jugadordetalles/{}/historial", self.base, player_id)
    }
    pub fn player_history_entry(&self, player_id: i64, entry_id: i64) -> String {
        format!("{}/{}", self.player_history(player_id), entry_id)
    }

    /// Standings
    pub fn standings(&self) -> String {
        format!("{}/posiciones_liga", self.base)
    }
    pub fn standing(&self, standing_id: i64) -> String {
        format!("{}/posiciones_liga/{}", self.base, standing_id)
    }
    pub fn league_standings(&self, league_id: i64) -> String {
        format!("{}/posiciones_liga/liga/{}", self.base, league_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let ep = Endpoints::new("http://localhost:3000/api/");
        assert_eq!(ep.leagues(), "http://localhost:3000/api/ligas");
        assert_eq!(ep.league_teams(7), "http://localhost:3000/api/liga/equipos/7");
    }

    #[test]
    fn nested_player_resources() {
        let ep = Endpoints::new("http://h");
        assert_eq!(ep.player_title(3, 9), "http://h/jugadordetalles/3/titulos/9");
        assert_eq!(
            ep.player_history_entry(3, 1),
            "http://h/jugadordetalles/3/historial/1"
        );
        assert_eq!(ep.league_standings(2), "http://h/posiciones_liga/liga/2");
    }
}
