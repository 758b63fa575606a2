use crate::api::{ApiError, Endpoints};
use crate::app_service::ApiJob;
use crate::commands::app_command::{COMMAND_WORDS, HELP};
use crate::commands::AppCommand;
use crate::console::{
    FetchTicket, Level, Loaded, MutationRequest, NoticeKind, NotificationQueue, ScreenKind,
    ScreenState, Target,
};
use crate::theme::{Theme, ThemeStore};
use crossterm::event::KeyCode;
use log::{info, warn};
use std::str::FromStr;
use tokio::sync::mpsc;

#[derive(PartialEq, Debug, Clone)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(PartialEq, Debug, Clone)]
pub enum FocusArea {
    Menu,     // left-hand screen list
    MainView, // table of the current screen
}

#[derive(Debug)]
pub enum AppEvent {
    Fetched {
        epoch: u64,
        ticket: FetchTicket,
        result: Result<Loaded, ApiError>,
    },
    Mutated {
        epoch: u64,
        request: MutationRequest,
        result: Result<(), ApiError>,
    },
    Log(String),
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct App {
    pub input_mode: InputMode,
    pub focus_area: FocusArea,
    pub menu_selected_index: usize,
    pub screen: ScreenState,
    /// Bumped on every screen mount; events from older mounts only notify.
    epoch: u64,
    pub endpoints: Endpoints,
    pub notices: NotificationQueue,
    pub theme: Theme,
    theme_store: ThemeStore,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub log_messages: Vec<String>,
    pub job_tx: mpsc::UnboundedSender<ApiJob>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>,
}

impl App {
    pub fn new(
        startup_info: Vec<String>,
        endpoints: Endpoints,
        notices: NotificationQueue,
        theme_store: ThemeStore,
        job_tx: mpsc::UnboundedSender<ApiJob>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["Console started".to_string()];
        log_messages.extend(startup_info);
        let theme = theme_store.load();
        let (screen, tickets) = ScreenState::mount(ScreenKind::Leagues);

        let mut app = App {
            input_mode: InputMode::Normal,
            focus_area: FocusArea::Menu,
            menu_selected_index: 0,
            screen,
            epoch: 0,
            endpoints,
            notices,
            theme,
            theme_store,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            log_messages,
            job_tx,
            evt_rx: Some(evt_rx),
        };
        app.dispatch(tickets);
        app
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    fn dispatch(&mut self, tickets: Vec<FetchTicket>) {
        for ticket in tickets {
            let job = ApiJob::Fetch {
                epoch: self.epoch,
                ticket,
            };
            if self.job_tx.send(job).is_err() {
                self.add_log("✗ background worker is gone".to_string());
            }
        }
    }

    fn send_mutation(&mut self, request: MutationRequest) {
        self.add_log(format!("→ {} {}", request.method, request.url));
        let job = ApiJob::Mutate {
            epoch: self.epoch,
            request,
        };
        if self.job_tx.send(job).is_err() {
            self.add_log("✗ background worker is gone".to_string());
        }
    }

    pub fn navigate(&mut self, kind: ScreenKind) {
        self.epoch += 1;
        let (screen, tickets) = ScreenState::mount(kind);
        self.screen = screen;
        self.menu_selected_index = ScreenKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(0);
        info!("screen {}", kind.name());
        self.dispatch(tickets);
    }

    pub fn select(&mut self, level: Level, id: Option<i64>) {
        match self.screen.select(level, id) {
            Ok(tickets) => self.dispatch(tickets),
            Err(msg) => self.add_log(format!("⚠ {}", msg)),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent, now: i64) {
        match event {
            AppEvent::Log(msg) => self.add_log(msg),
            AppEvent::Fetched {
                epoch,
                ticket,
                result,
            } => {
                if epoch != self.epoch {
                    return;
                }
                let base = self.endpoints.base().to_string();
                let outcome = result.map_err(|e| e.user_message(&base));
                self.screen.apply_fetch(&ticket, outcome);
            }
            AppEvent::Mutated {
                epoch,
                request,
                result,
            } => {
                match &result {
                    Ok(()) => self.add_log(format!("✓ {}", request.success)),
                    Err(e) => self.add_log(format!("✗ {}: {}", request.failure, e)),
                }
                if epoch != self.epoch {
                    // screen was left: the notice still shows, nothing reloads
                    let kind = if result.is_ok() {
                        NoticeKind::Success
                    } else {
                        NoticeKind::Error
                    };
                    self.notices.push(request.outcome_message(&result), kind, now);
                    return;
                }
                let reload =
                    self.screen
                        .finish_mutation(&request, &result, &mut self.notices, now);
                self.dispatch(reload.into_iter().collect());
            }
        }
    }

    pub fn tick(&mut self, now: i64) {
        self.notices.prune(now);
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        if let Err(e) = self.theme_store.save(self.theme) {
            warn!("could not save theme: {}", e);
            self.add_log(format!("⚠ could not save theme: {}", e));
        }
    }

    /// Runs one console command. Returns true when the app should exit.
    pub fn run_command(&mut self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Screen(kind) => self.navigate(kind),
            AppCommand::Select { level, id } => self.select(level, id),
            AppCommand::Add(target) => {
                if let Err(msg) = self.screen.open_add(target) {
                    self.add_log(format!("⚠ {}", msg));
                }
            }
            AppCommand::Edit { id } => {
                if let Err(msg) = self.screen.open_edit(id) {
                    self.add_log(format!("⚠ {}", msg));
                }
            }
            AppCommand::Set { field, value } => {
                if let Err(msg) = self.screen.set_field(&field, &value) {
                    self.add_log(format!("⚠ {}", msg));
                }
            }
            AppCommand::Save => self.save_form(),
            AppCommand::Cancel => {
                if !self.screen.cancel_form() && !self.screen.cancel_delete() {
                    self.add_log("Nothing to cancel".to_string());
                }
            }
            AppCommand::Delete { target, id } => {
                let endpoints = self.endpoints.clone();
                match self.screen.request_delete(target, id, &endpoints) {
                    Ok(prompt) => self.add_log(format!("{} (yes/no)", prompt)),
                    Err(msg) => self.add_log(format!("⚠ {}", msg)),
                }
            }
            AppCommand::Confirm => match self.screen.confirm_delete() {
                Some(req) => self.send_mutation(req),
                None => self.add_log("No delete is pending".to_string()),
            },
            AppCommand::Decline => {
                if self.screen.cancel_delete() {
                    self.add_log("Delete cancelled".to_string());
                }
            }
            AppCommand::Reload => {
                let tickets = self.screen.reload_all();
                self.dispatch(tickets);
            }
            AppCommand::Theme => self.toggle_theme(),
            AppCommand::Help => self.add_log(HELP.to_string()),
            AppCommand::Quit => return true,
            AppCommand::Unknown(msg) => {
                if !msg.is_empty() {
                    self.add_log(format!("⚠ {}", msg));
                }
            }
        }
        false
    }

    fn save_form(&mut self) {
        let endpoints = self.endpoints.clone();
        match self.screen.submit(&endpoints) {
            Ok(req) => self.send_mutation(req),
            Err(msg) => self.add_log(format!("⚠ {}", msg)),
        }
    }

    /// Enter on a table row: drill into the next level.
    fn open_row(&mut self) {
        let Some(id) = self.screen.id_at_cursor() else {
            return;
        };
        match self.screen.kind {
            ScreenKind::Leagues => {
                self.navigate(ScreenKind::Teams);
                self.select(Level::League, Some(id));
            }
            ScreenKind::Teams => {
                let league = self.screen.chain.selection(Level::League);
                self.navigate(ScreenKind::Players);
                self.select(Level::League, league);
                self.select(Level::Team, Some(id));
            }
            ScreenKind::Players => self.select(Level::Player, Some(id)),
            ScreenKind::Standings | ScreenKind::Titles => {}
        }
    }

    /// Completion suffix for the word under the cursor.
    pub fn get_completion_hint(&self) -> Option<String> {
        let input = self.command_input.as_str();
        if input.trim().is_empty() {
            return None;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        let ends_with_space = input.ends_with(' ');

        let (candidates, cur): (Vec<String>, &str) = if parts.len() == 1 && !ends_with_space {
            (
                COMMAND_WORDS.iter().map(|s| s.to_string()).collect(),
                parts[0],
            )
        } else {
            let cur = if ends_with_space {
                ""
            } else {
                parts.last().copied().unwrap_or("")
            };
            let arg_index = if ends_with_space {
                parts.len()
            } else {
                parts.len() - 1
            };
            if arg_index != 1 {
                return None;
            }
            let words: Vec<String> = match parts[0] {
                "screen" => ScreenKind::ALL.iter().map(|k| k.name().to_string()).collect(),
                "set" => self
                    .screen
                    .editor
                    .as_ref()
                    .map(|e| e.field_names())
                    .unwrap_or_default(),
                "add" | "delete" => vec!["title".to_string(), "history".to_string()],
                "league" | "team" | "player" => vec!["none".to_string()],
                _ => Vec::new(),
            };
            (words, cur)
        };

        candidates
            .into_iter()
            .find(|c| c.starts_with(cur) && c != cur)
            .map(|c| c[cur.len()..].to_string())
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.command_input[..self.command_cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
    }

    fn finish_command_input(&mut self) {
        self.command_history_index = None;
        self.command_input.clear();
        self.command_cursor = 0;
        self.input_mode = InputMode::Normal;
    }

    pub fn handle_key_event(&mut self, key: KeyCode) -> bool {
        if self.input_mode == InputMode::Command {
            match key {
                KeyCode::Enter => {
                    let cmd_owned = self.command_input.trim().to_string();
                    if cmd_owned.is_empty() {
                        self.finish_command_input();
                        return false;
                    }
                    let cmd = AppCommand::from_str(&cmd_owned)
                        .unwrap_or_else(|_| AppCommand::Unknown(cmd_owned.clone()));
                    self.command_history.push(cmd_owned);
                    self.finish_command_input();
                    return self.run_command(cmd);
                }
                KeyCode::Esc => {
                    self.finish_command_input();
                    return false;
                }
                KeyCode::Tab => {
                    if let Some(hint) = self.get_completion_hint() {
                        let insert = format!("{} ", hint);
                        self.command_input.insert_str(self.command_cursor, &insert);
                        self.command_cursor += insert.len();
                    }
                    return false;
                }
                KeyCode::Up => {
                    if self.command_history.is_empty() {
                        return false;
                    }
                    let next = match self.command_history_index {
                        None => self.command_history.len().saturating_sub(1),
                        Some(i) => i.saturating_sub(1),
                    };
                    self.command_history_index = Some(next);
                    if let Some(cmd) = self.command_history.get(next) {
                        self.command_input = cmd.clone();
                        self.command_cursor = self.command_input.len();
                    }
                    return false;
                }
                KeyCode::Down => {
                    let next = match self.command_history_index {
                        None => return false,
                        Some(i) => i + 1,
                    };
                    if next >= self.command_history.len() {
                        self.command_history_index = None;
                        self.command_input.clear();
                        self.command_cursor = 0;
                        return false;
                    }
                    self.command_history_index = Some(next);
                    if let Some(cmd) = self.command_history.get(next) {
                        self.command_input = cmd.clone();
                        self.command_cursor = self.command_input.len();
                    }
                    return false;
                }
                KeyCode::Backspace => {
                    if let Some(idx) = self.prev_boundary() {
                        self.command_input.remove(idx);
                        self.command_cursor = idx;
                    }
                    return false;
                }
                KeyCode::Delete => {
                    if self.command_cursor < self.command_input.len() {
                        self.command_input.remove(self.command_cursor);
                    }
                    return false;
                }
                KeyCode::Left => {
                    if let Some(idx) = self.prev_boundary() {
                        self.command_cursor = idx;
                    }
                    return false;
                }
                KeyCode::Right => {
                    if let Some(c) = self.command_input[self.command_cursor..].chars().next() {
                        self.command_cursor += c.len_utf8();
                    }
                    return false;
                }
                KeyCode::Home => {
                    self.command_cursor = 0;
                    return false;
                }
                KeyCode::End => {
                    self.command_cursor = self.command_input.len();
                    return false;
                }
                KeyCode::Char(c) => {
                    self.command_input.insert(self.command_cursor, c);
                    self.command_cursor += c.len_utf8();
                    return false;
                }
                _ => return false,
            }
        }

        // the delete prompt takes every key until answered
        if self.screen.confirm.is_open() {
            match key {
                KeyCode::Char('y') | KeyCode::Enter => self.run_command(AppCommand::Confirm),
                KeyCode::Char('n') | KeyCode::Esc => self.run_command(AppCommand::Decline),
                _ => false,
            };
            return false;
        }

        match key {
            KeyCode::Char('/') | KeyCode::Char(':') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
                false
            }
            KeyCode::Esc => {
                self.screen.cancel_form();
                false
            }
            KeyCode::Char('s') if self.screen.editor.is_some() => {
                self.save_form();
                false
            }
            KeyCode::Char('q') => self.screen.editor.is_none(),
            KeyCode::Char('t') => {
                self.toggle_theme();
                false
            }
            KeyCode::Char('r') => self.run_command(AppCommand::Reload),
            KeyCode::Left => {
                self.focus_area = FocusArea::Menu;
                false
            }
            KeyCode::Right => {
                self.focus_area = FocusArea::MainView;
                false
            }
            KeyCode::Up => {
                if self.focus_area == FocusArea::Menu {
                    self.menu_selected_index = self.menu_selected_index.saturating_sub(1);
                } else {
                    self.screen.move_cursor(-1);
                }
                false
            }
            KeyCode::Down => {
                if self.focus_area == FocusArea::Menu {
                    if self.menu_selected_index + 1 < ScreenKind::ALL.len() {
                        self.menu_selected_index += 1;
                    }
                } else {
                    self.screen.move_cursor(1);
                }
                false
            }
            KeyCode::Enter => {
                if self.focus_area == FocusArea::Menu {
                    let kind = ScreenKind::ALL[self.menu_selected_index.min(ScreenKind::ALL.len() - 1)];
                    self.navigate(kind);
                    self.focus_area = FocusArea::MainView;
                } else {
                    self.open_row();
                }
                false
            }
            KeyCode::Char('a') if self.focus_area == FocusArea::MainView => {
                self.run_command(AppCommand::Add(Target::Primary))
            }
            KeyCode::Char('e') if self.focus_area == FocusArea::MainView => {
                match self.screen.id_at_cursor() {
                    Some(id) => self.run_command(AppCommand::Edit { id }),
                    None => false,
                }
            }
            KeyCode::Char('d') if self.focus_area == FocusArea::MainView => {
                match self.screen.id_at_cursor() {
                    Some(id) => self.run_command(AppCommand::Delete {
                        target: Target::Primary,
                        id,
                    }),
                    None => false,
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Collection;
    use reqwest::Method;

    fn app() -> (App, mpsc::UnboundedReceiver<ApiJob>) {
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        let prefs = std::env::temp_dir().join(format!("iqscore-app-{}.json", std::process::id()));
        let app = App::new(
            Vec::new(),
            Endpoints::new("http://api.test"),
            NotificationQueue::default(),
            ThemeStore::new(prefs),
            job_tx,
            evt_rx,
        );
        (app, job_rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ApiJob>) -> Vec<ApiJob> {
        let mut jobs = Vec::new();
        while let Ok(job) = rx.try_recv() {
            jobs.push(job);
        }
        jobs
    }

    fn fetched(app: &mut App, job: ApiJob, loaded: Loaded) {
        if let ApiJob::Fetch { epoch, ticket } = job {
            app.handle_event(
                AppEvent::Fetched {
                    epoch,
                    ticket,
                    result: Ok(loaded),
                },
                0,
            );
        }
    }

    fn type_command(app: &mut App, text: &str) -> bool {
        app.handle_key_event(KeyCode::Char('/'));
        for c in text.chars() {
            app.handle_key_event(KeyCode::Char(c));
        }
        app.handle_key_event(KeyCode::Enter)
    }

    #[test]
    fn startup_fetches_leagues() {
        let (_app, mut rx) = app();
        let jobs = drain(&mut rx);
        assert_eq!(jobs.len(), 1);
        assert!(matches!(
            &jobs[0],
            ApiJob::Fetch { ticket, .. } if ticket.collection() == Collection::Leagues
        ));
    }

    #[test]
    fn results_from_a_left_screen_are_ignored() {
        let (mut app, mut rx) = app();
        let old = drain(&mut rx).remove(0);
        app.navigate(ScreenKind::Teams);
        let new = drain(&mut rx).remove(0);

        fetched(&mut app, old, Loaded::Leagues(vec![Default::default(); 3]));
        assert!(app.screen.chain.leagues.is_loading());
        fetched(&mut app, new, Loaded::Leagues(vec![Default::default()]));
        assert_eq!(app.screen.chain.leagues.ready().map(|l| l.len()), Some(1));
    }

    #[test]
    fn delete_flow_through_commands() {
        let (mut app, mut rx) = app();
        let first = drain(&mut rx).remove(0);
        let league = crate::api::dto::League {
            id: Some(3),
            ..Default::default()
        };
        fetched(&mut app, first, Loaded::Leagues(vec![league]));

        type_command(&mut app, "delete 3");
        assert!(app.screen.confirm.is_open());
        app.handle_key_event(KeyCode::Char('n'));
        assert!(!app.screen.confirm.is_open());
        assert!(drain(&mut rx).is_empty());

        type_command(&mut app, "delete 3");
        app.handle_key_event(KeyCode::Char('y'));
        let jobs = drain(&mut rx);
        let (epoch, request) = match jobs.into_iter().next() {
            Some(ApiJob::Mutate { epoch, request }) => (epoch, request),
            other => panic!("expected mutation, got {:?}", other),
        };
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.url, "http://api.test/ligas/3");

        app.handle_event(
            AppEvent::Mutated {
                epoch,
                request,
                result: Ok(()),
            },
            1000,
        );
        let reloads = drain(&mut rx);
        assert_eq!(reloads.len(), 1);
        assert_eq!(app.notices.iter().next().unwrap().kind, NoticeKind::Success);
        app.tick(4000);
        assert!(app.notices.is_empty());
    }

    #[test]
    fn late_save_result_leaves_a_newer_form_alone() {
        let (mut app, mut rx) = app();
        drain(&mut rx);
        type_command(&mut app, "add");
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
            app.screen.set_field(k, v).unwrap();
        }
        app.handle_key_event(KeyCode::Char('s'));
        let (epoch, request) = match drain(&mut rx).into_iter().next() {
            Some(ApiJob::Mutate { epoch, request }) => (epoch, request),
            other => panic!("expected mutation, got {:?}", other),
        };

        app.handle_key_event(KeyCode::Esc);
        assert!(app.screen.editor.is_none());
        type_command(&mut app, "add");
        app.screen.set_field("nombre", "new draft").unwrap();

        app.handle_event(
            AppEvent::Mutated {
                epoch,
                request: request.clone(),
                result: Err(ApiError::from_status(500, None)),
            },
            0,
        );
        let editor = app.screen.editor.as_ref().unwrap();
        assert_eq!(editor.error(), None);
        assert!(!editor.is_submitting());
        assert!(editor
            .fields()
            .contains(&("nombre".to_string(), "new draft".to_string())));
        assert_eq!(app.notices.iter().next().unwrap().kind, NoticeKind::Error);

        app.handle_event(
            AppEvent::Mutated {
                epoch,
                request,
                result: Ok(()),
            },
            0,
        );
        assert!(app.screen.editor.is_some());
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[test]
    fn mutation_after_navigation_only_notifies() {
        let (mut app, mut rx) = app();
        drain(&mut rx);
        let request = MutationRequest {
            method: Method::POST,
            url: "http://api.test/ligas".into(),
            body: None,
            reload: Collection::Leagues,
            origin: crate::console::mutation::MutationOrigin::Form(0),
            success: "League added successfully".into(),
            failure: "Could not save the league".into(),
        };
        app.navigate(ScreenKind::Players);
        drain(&mut rx);
        app.handle_event(
            AppEvent::Mutated {
                epoch: 0,
                request,
                result: Ok(()),
            },
            0,
        );
        assert!(drain(&mut rx).is_empty());
        assert_eq!(app.notices.len(), 1);
    }

    #[test]
    fn selection_commands_reach_the_chain() {
        let (mut app, mut rx) = app();
        type_command(&mut app, "screen teams");
        assert_eq!(app.screen.kind, ScreenKind::Teams);
        drain(&mut rx);
        type_command(&mut app, "league 1");
        let jobs = drain(&mut rx);
        assert_eq!(jobs.len(), 2);
        assert_eq!(app.screen.chain.selection(Level::League), Some(1));
        assert!(type_command(&mut app, "quit"));
    }

    #[test]
    fn completion_hints() {
        let (mut app, _rx) = app();
        app.command_input = "scr".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("een"));
        app.command_input = "screen st".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("andings"));
        app.command_input = "delete ".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("title"));
        app.command_input = "set no".into();
        assert_eq!(app.get_completion_hint(), None);

        app.screen.open_add(Target::Primary).unwrap();
        assert_eq!(app.get_completion_hint().as_deref(), Some("mbre"));
    }
}
