//! Dependent drop-down chain: League → Team → Player.
//!
//! Changing a selection clears everything below it before any fetch is
//! issued. Every collection slot carries a generation counter; a fetch result
//! is stored only if its ticket still matches the slot's generation, so
//! responses for an abandoned parent are dropped.

use crate::api::dto::{League, Player, PlayerDetail, Standing, Team, TeamTitle};
use crate::api::{ApiClient, ApiError};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    League,
    Team,
    Player,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::League, Level::Team, Level::Player];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Leagues,
    LeagueInfo,
    Teams,
    Standings,
    TeamTitles,
    Players,
    PlayerDetail,
}

impl Collection {
    /// The selector level this collection depends on; `None` for root lists.
    pub fn owner(self) -> Option<Level> {
        match self {
            Collection::Leagues => None,
            Collection::LeagueInfo | Collection::Teams | Collection::Standings => {
                Some(Level::League)
            }
            Collection::TeamTitles | Collection::Players => Some(Level::Team),
            Collection::PlayerDetail => Some(Level::Player),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Collection::Leagues => "leagues",
            Collection::LeagueInfo => "league details",
            Collection::Teams => "teams",
            Collection::Standings => "standings",
            Collection::TeamTitles => "titles",
            Collection::Players => "players",
            Collection::PlayerDetail => "player details",
        }
    }

    fn target(self, parent: Option<i64>) -> Option<FetchTarget> {
        Some(match (self, parent) {
            (Collection::Leagues, _) => FetchTarget::Leagues,
            (Collection::LeagueInfo, Some(id)) => FetchTarget::LeagueInfo(id),
            (Collection::Teams, Some(id)) => FetchTarget::Teams(id),
            (Collection::Standings, Some(id)) => FetchTarget::Standings(id),
            (Collection::TeamTitles, Some(id)) => FetchTarget::TeamTitles(id),
            (Collection::Players, Some(id)) => FetchTarget::Players(id),
            (Collection::PlayerDetail, Some(id)) => FetchTarget::PlayerDetail(id),
            (_, None) => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Leagues,
    LeagueInfo(i64),
    Teams(i64),
    Standings(i64),
    TeamTitles(i64),
    Players(i64),
    PlayerDetail(i64),
}

impl FetchTarget {
    pub fn collection(self) -> Collection {
        match self {
            FetchTarget::Leagues => Collection::Leagues,
            FetchTarget::LeagueInfo(_) => Collection::LeagueInfo,
            FetchTarget::Teams(_) => Collection::Teams,
            FetchTarget::Standings(_) => Collection::Standings,
            FetchTarget::TeamTitles(_) => Collection::TeamTitles,
            FetchTarget::Players(_) => Collection::Players,
            FetchTarget::PlayerDetail(_) => Collection::PlayerDetail,
        }
    }
}

/// A fetch handed out by the chain. Only the newest ticket per collection
/// can be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub target: FetchTarget,
    generation: u64,
}

impl FetchTicket {
    pub fn collection(&self) -> Collection {
        self.target.collection()
    }

    pub async fn run(&self, api: &ApiClient) -> Result<Loaded, ApiError> {
        Ok(match self.target {
            FetchTarget::Leagues => Loaded::Leagues(api.leagues().await?),
            FetchTarget::LeagueInfo(id) => Loaded::LeagueInfo(api.league(id).await?),
            FetchTarget::Teams(id) => Loaded::Teams(api.league_teams(id).await?),
            FetchTarget::Standings(id) => Loaded::Standings(api.league_standings(id).await?),
            FetchTarget::TeamTitles(id) => Loaded::TeamTitles(api.team_titles(id).await?),
            FetchTarget::Players(id) => Loaded::Players(api.team_players(id).await?),
            FetchTarget::PlayerDetail(id) => Loaded::PlayerDetail(api.player_detail(id).await?),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Loaded {
    Leagues(Vec<League>),
    LeagueInfo(League),
    Teams(Vec<Team>),
    Standings(Vec<Standing>),
    TeamTitles(Vec<TeamTitle>),
    Players(Vec<Player>),
    PlayerDetail(PlayerDetail),
}

impl Loaded {
    pub fn collection(&self) -> Collection {
        match self {
            Loaded::Leagues(_) => Collection::Leagues,
            Loaded::LeagueInfo(_) => Collection::LeagueInfo,
            Loaded::Teams(_) => Collection::Teams,
            Loaded::Standings(_) => Collection::Standings,
            Loaded::TeamTitles(_) => Collection::TeamTitles,
            Loaded::Players(_) => Collection::Players,
            Loaded::PlayerDetail(_) => Collection::PlayerDetail,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Slot<T> {
    generation: u64,
    pub state: LoadState<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: LoadState::Idle,
        }
    }
}

impl<T> Slot<T> {
    pub fn ready(&self) -> Option<&T> {
        match &self.state {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    fn store(&mut self, generation: u64, outcome: Result<T, String>) -> Applied {
        if generation != self.generation {
            return Applied::Stale;
        }
        self.state = match outcome {
            Ok(v) => LoadState::Ready(v),
            Err(e) => LoadState::Failed(e),
        };
        Applied::Stored
    }
}

/// Type-erased slot bookkeeping.
trait SlotControl {
    fn reset(&mut self);
    fn begin(&mut self) -> u64;
    fn fail(&mut self, generation: u64, message: String) -> Applied;
}

impl<T> SlotControl for Slot<T> {
    fn reset(&mut self) {
        self.generation += 1;
        self.state = LoadState::Idle;
    }

    fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.generation
    }

    fn fail(&mut self, generation: u64, message: String) -> Applied {
        self.store(generation, Err(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Stored,
    Stale,
}

#[derive(Debug, Clone)]
pub struct SelectorChain {
    plan: &'static [Collection],
    selections: [Option<i64>; 3],
    pub leagues: Slot<Vec<League>>,
    pub league_info: Slot<League>,
    pub teams: Slot<Vec<Team>>,
    pub standings: Slot<Vec<Standing>>,
    pub team_titles: Slot<Vec<TeamTitle>>,
    pub players: Slot<Vec<Player>>,
    pub player_detail: Slot<PlayerDetail>,
}

impl SelectorChain {
    pub fn new(plan: &'static [Collection]) -> Self {
        Self {
            plan,
            selections: [None; 3],
            leagues: Slot::default(),
            league_info: Slot::default(),
            teams: Slot::default(),
            standings: Slot::default(),
            team_titles: Slot::default(),
            players: Slot::default(),
            player_detail: Slot::default(),
        }
    }

    pub fn plan(&self) -> &'static [Collection] {
        self.plan
    }

    pub fn uses(&self, collection: Collection) -> bool {
        self.plan.contains(&collection)
    }

    /// Deepest level any planned collection depends on.
    pub fn depth(&self) -> Option<Level> {
        self.plan.iter().filter_map(|c| c.owner()).max()
    }

    fn control(&mut self, collection: Collection) -> &mut dyn SlotControl {
        match collection {
            Collection::Leagues => &mut self.leagues,
            Collection::LeagueInfo => &mut self.league_info,
            Collection::Teams => &mut self.teams,
            Collection::Standings => &mut self.standings,
            Collection::TeamTitles => &mut self.team_titles,
            Collection::Players => &mut self.players,
            Collection::PlayerDetail => &mut self.player_detail,
        }
    }

    fn parent_id(&self, collection: Collection) -> Option<i64> {
        collection.owner().and_then(|level| self.selection(level))
    }

    fn issue(&mut self, collection: Collection) -> Option<FetchTicket> {
        let target = collection.target(self.parent_id(collection))?;
        let generation = self.control(collection).begin();
        Some(FetchTicket { target, generation })
    }

    pub fn selection(&self, level: Level) -> Option<i64> {
        self.selections[level.index()]
    }

    /// Root collections, fetched when the screen is mounted.
    pub fn mount(&mut self) -> Vec<FetchTicket> {
        let roots: Vec<Collection> = self
            .plan
            .iter()
            .copied()
            .filter(|c| c.owner().is_none())
            .collect();
        roots.into_iter().filter_map(|c| self.issue(c)).collect()
    }

    /// Sets one level. Deeper selections and every collection owned by this
    /// level or below are cleared before any ticket is handed out.
    pub fn set_selection(&mut self, level: Level, id: Option<i64>) -> Vec<FetchTicket> {
        for deeper in Level::ALL.iter().filter(|l| **l > level) {
            self.selections[deeper.index()] = None;
        }
        let dependents: Vec<Collection> = [
            Collection::LeagueInfo,
            Collection::Teams,
            Collection::Standings,
            Collection::TeamTitles,
            Collection::Players,
            Collection::PlayerDetail,
        ]
        .into_iter()
        .filter(|c| c.owner().map(|o| o >= level).unwrap_or(false))
        .collect();
        for c in &dependents {
            self.control(*c).reset();
        }

        self.selections[level.index()] = id;
        if id.is_none() {
            return Vec::new();
        }

        let owned: Vec<Collection> = self
            .plan
            .iter()
            .copied()
            .filter(|c| c.owner() == Some(level))
            .collect();
        debug!("selection {:?} -> {:?}, fetching {:?}", level, id, owned);
        owned.into_iter().filter_map(|c| self.issue(c)).collect()
    }

    /// Re-fetches one collection. Nothing is issued while its parent level
    /// has no selection.
    pub fn reload(&mut self, collection: Collection) -> Option<FetchTicket> {
        if !self.uses(collection) {
            return None;
        }
        self.issue(collection)
    }

    pub fn apply(&mut self, ticket: &FetchTicket, outcome: Result<Loaded, String>) -> Applied {
        let generation = ticket.generation;
        let loaded = match outcome {
            Ok(loaded) => loaded,
            Err(message) => return self.control(ticket.collection()).fail(generation, message),
        };
        if loaded.collection() != ticket.collection() {
            return Applied::Stale;
        }
        match loaded {
            Loaded::Leagues(v) => self.leagues.store(generation, Ok(v)),
            Loaded::LeagueInfo(v) => self.league_info.store(generation, Ok(v)),
            Loaded::Teams(v) => self.teams.store(generation, Ok(v)),
            Loaded::Standings(v) => self.standings.store(generation, Ok(v)),
            Loaded::TeamTitles(v) => self.team_titles.store(generation, Ok(v)),
            Loaded::Players(v) => self.players.store(generation, Ok(v)),
            Loaded::PlayerDetail(v) => self.player_detail.store(generation, Ok(v)),
        }
    }
}
