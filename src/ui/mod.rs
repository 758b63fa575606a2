pub mod format;

use crate::api::dto::{League, Player, PlayerDetail};
use crate::app_state::{App, FocusArea, InputMode};
use crate::console::form::{FormMode, Resource};
use crate::console::selector::Slot;
use crate::console::{Level, LoadState, NoticeKind, ScreenKind};
use crate::theme::Palette;
use format::{badge, currency, opt, years};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let palette = app.theme.palette();
    f.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.text)),
        f.size(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title bar
            Constraint::Min(0),    // menu + screen
            Constraint::Min(8),    // command line + log
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app, &palette);

    let middle_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(0)])
        .split(chunks[1]);

    render_left_menu(f, middle_chunks[0], app, &palette);
    render_main_view(f, middle_chunks[1], app, &palette);
    render_bottom_bar(f, chunks[2], app, &palette);

    if app.screen.editor.is_some() {
        render_form(f, middle_chunks[1], app, &palette);
    }
    if app.screen.confirm.is_open() {
        render_confirm(f, middle_chunks[1], app);
    }
    render_notifications(f, f.size(), app);
}

fn focus_style(focused: bool, palette: &Palette) -> Style {
    if focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.text)
    }
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let title = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(palette.accent).bg(palette.header));

    let title_text = Line::from(vec![
        Span::styled(
            " IQSCORE - League Admin ",
            Style::default()
                .fg(palette.header_text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" [{} theme, t to switch]", app.theme.name()),
            Style::default().fg(palette.text_secondary),
        ),
    ]);

    let paragraph = Paragraph::new(title_text)
        .block(title)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_left_menu(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let menu_items: Vec<ListItem> = ScreenKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let is_selected = i == app.menu_selected_index;
            let is_active = *kind == app.screen.kind;

            let style = if is_selected {
                if app.focus_area == FocusArea::Menu {
                    Style::default()
                        .fg(palette.bg)
                        .bg(palette.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD)
                }
            } else if is_active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(palette.text)
            };

            let prefix = if is_active { "● " } else { "○ " };
            ListItem::new(format!("{}{}", prefix, kind.title())).style(style)
        })
        .collect();

    let title = if app.focus_area == FocusArea::Menu {
        "Screens (Enter)"
    } else {
        "Screens (←)"
    };

    let menu = List::new(menu_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(focus_style(app.focus_area == FocusArea::Menu, palette)),
    );

    f.render_widget(menu, area);
}

/// Placeholder lines for a slot that has no rows to show.
fn slot_status<T>(slot: &Slot<Vec<T>>, idle: &str, empty: &str) -> Option<Line<'static>> {
    match &slot.state {
        LoadState::Idle => Some(Line::styled(
            idle.to_string(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
        LoadState::Loading => Some(Line::styled(
            "Loading...".to_string(),
            Style::default().fg(Color::Cyan),
        )),
        LoadState::Failed(e) => Some(Line::styled(
            format!("✗ {}", e),
            Style::default().fg(Color::Red),
        )),
        LoadState::Ready(rows) if rows.is_empty() => Some(Line::styled(
            empty.to_string(),
            Style::default().fg(Color::Gray),
        )),
        LoadState::Ready(_) => None,
    }
}

fn name_of<T: Resource>(rows: Option<&Vec<T>>, id: Option<i64>) -> String {
    match id {
        None => "none".to_string(),
        Some(id) => rows
            .and_then(|r| r.iter().find(|x| x.id() == Some(id)))
            .map(|x| x.label())
            .unwrap_or_else(|| format!("#{}", id)),
    }
}

fn selector_line(app: &App) -> Line<'static> {
    let chain = &app.screen.chain;
    let Some(depth) = chain.depth() else {
        return Line::from("All leagues");
    };
    let mut spans = Vec::new();
    for level in Level::ALL.iter().copied().filter(|l| *l <= depth) {
        let (label, name) = match level {
            Level::League => ("League", name_of(chain.leagues.ready(), chain.selection(level))),
            Level::Team => ("Team", name_of(chain.teams.ready(), chain.selection(level))),
            Level::Player => ("Player", name_of(chain.players.ready(), chain.selection(level))),
        };
        if !spans.is_empty() {
            spans.push(Span::raw("  ›  "));
        }
        spans.push(Span::styled(
            format!("{}: ", label),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(name, Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

fn league_header(league: &League) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            league.label(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  {} · {} · {}",
            opt(league.country.as_deref()),
            opt(league.tier.as_deref()),
            years(league.start_year, league.end_year)
        )),
    ])];
    if let Some(desc) = league.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(Line::styled(
            desc.to_string(),
            Style::default().fg(Color::Gray),
        ));
    }
    lines
}

fn primary_rows(app: &App) -> Result<Vec<Line<'static>>, Line<'static>> {
    let chain = &app.screen.chain;
    match app.screen.kind {
        ScreenKind::Leagues => {
            if let Some(l) = slot_status(&chain.leagues, "", "No leagues yet") {
                return Err(l);
            }
            Ok(chain
                .leagues
                .ready()
                .into_iter()
                .flatten()
                .map(|l| {
                    Line::from(format!(
                        "{:>4}  {:<28} {:<16} {:<14} {}",
                        opt(l.id),
                        l.label(),
                        opt(l.country.as_deref()),
                        opt(l.tier.as_deref()),
                        years(l.start_year, l.end_year)
                    ))
                })
                .collect())
        }
        ScreenKind::Teams => {
            if let Some(l) = slot_status(&chain.teams, "Select a league (league <id>)", "No teams in this league") {
                return Err(l);
            }
            Ok(chain
                .teams
                .ready()
                .into_iter()
                .flatten()
                .map(|t| {
                    Line::from(format!(
                        "{:>4}  {:<24} {:<14} {:<22} {:<18} {}",
                        opt(t.id),
                        t.label(),
                        opt(t.city.as_deref()),
                        opt(t.stadium_name.as_deref()),
                        opt(t.coach.as_deref()),
                        currency(t.market_value.as_deref())
                    ))
                })
                .collect())
        }
        ScreenKind::Standings => {
            if let Some(l) = slot_status(
                &chain.standings,
                "Select a league (league <id>)",
                "No standings for this league",
            ) {
                return Err(l);
            }
            let teams = chain.teams.ready();
            Ok(chain
                .standings
                .ready()
                .into_iter()
                .flatten()
                .map(|s| {
                    let team = s
                        .team_name
                        .clone()
                        .unwrap_or_else(|| name_of(teams, s.team_id));
                    let mut spans = vec![Span::raw(format!(
                        "{:>4}  {:>3}. {:<26} {:>4} pts  ",
                        opt(s.id),
                        opt(s.rank),
                        team,
                        opt(s.points)
                    ))];
                    for r in s.last_five() {
                        let (text, color) = badge(r);
                        spans.push(Span::styled(
                            format!(" {} ", text),
                            Style::default().fg(Color::Black).bg(color),
                        ));
                        spans.push(Span::raw(" "));
                    }
                    Line::from(spans)
                })
                .collect())
        }
        ScreenKind::Titles => {
            if let Some(l) = slot_status(
                &chain.team_titles,
                "Select a league and a team (team <id>)",
                "This team has no titles",
            ) {
                return Err(l);
            }
            Ok(chain
                .team_titles
                .ready()
                .into_iter()
                .flatten()
                .map(|t| {
                    Line::from(format!(
                        "{:>4}  {:<36} {}",
                        opt(t.id),
                        t.label(),
                        opt(t.year)
                    ))
                })
                .collect())
        }
        ScreenKind::Players => {
            if let Some(l) = slot_status(
                &chain.players,
                "Select a league and a team (team <id>)",
                "No players in this team",
            ) {
                return Err(l);
            }
            Ok(chain
                .players
                .ready()
                .into_iter()
                .flatten()
                .map(|p| {
                    Line::from(format!(
                        "{:>4}  #{:<3} {:<24} {:<14} {:<14} {:>3}  {}",
                        opt(p.id),
                        opt(p.shirt_number),
                        p.label(),
                        opt(p.position.as_deref()),
                        opt(p.nationality.as_deref()),
                        opt(p.age),
                        currency(p.market_value.as_deref())
                    ))
                })
                .collect())
        }
    }
}

fn player_lines(detail: &PlayerDetail) -> Vec<Line<'static>> {
    let p: &Player = &detail.player;
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(
                format!("{:<12}", label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(value),
        ])
    };
    let mut lines = vec![
        Line::styled(
            p.label(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        field("Position", opt(p.position.as_deref())),
        field("Ideal", opt(p.ideal_position.as_deref())),
        field("Born", opt(p.birth_date.as_deref())),
        field("Nationality", opt(p.nationality.as_deref())),
        field(
            "Height/Wt",
            format!("{} m / {} kg", opt(p.height), opt(p.weight)),
        ),
        field("Foot", opt(p.preferred_foot.as_deref())),
        field("Value", currency(p.market_value.as_deref())),
        Line::from(""),
        Line::styled("--- Titles ---", Style::default().fg(Color::Yellow)),
    ];
    if detail.titles.is_empty() {
        lines.push(Line::styled("  none", Style::default().fg(Color::Gray)));
    }
    for t in &detail.titles {
        lines.push(Line::from(format!(
            "  [{}] {} ({})",
            opt(t.id),
            opt(t.name.as_deref()),
            opt(t.year)
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "--- History ---",
        Style::default().fg(Color::Yellow),
    ));
    if detail.history.is_empty() {
        lines.push(Line::styled("  none", Style::default().fg(Color::Gray)));
    }
    for h in &detail.history {
        lines.push(Line::from(format!(
            "  [{}] {} {}",
            opt(h.id),
            opt(h.club.as_deref()),
            years(h.start_year, h.end_year)
        )));
    }
    lines
}

fn render_main_view(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let focused = app.focus_area == FocusArea::MainView;
    let shows_league = app.screen.chain.uses(crate::console::Collection::LeagueInfo);

    let mut header = vec![selector_line(app)];
    if shows_league {
        match &app.screen.chain.league_info.state {
            LoadState::Ready(league) => header.extend(league_header(league)),
            LoadState::Loading => header.push(Line::from("Loading league...")),
            LoadState::Failed(e) => header.push(Line::styled(
                format!("✗ {}", e),
                Style::default().fg(Color::Red),
            )),
            LoadState::Idle => {}
        }
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.len() as u16 + 2),
            Constraint::Min(0),
        ])
        .split(area);

    let header_widget = Paragraph::new(header)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.screen.kind.title())
                .style(focus_style(focused, palette)),
        );
    f.render_widget(header_widget, rows[0]);

    let body = if app.screen.kind == ScreenKind::Players {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        render_player_detail(f, split[1], app, palette);
        split[0]
    } else {
        rows[1]
    };

    let title = if focused {
        "↑↓ move, Enter open, a add, e edit, d delete, r reload"
    } else {
        "→ to focus"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(focus_style(focused, palette));

    match primary_rows(app) {
        Err(placeholder) => {
            f.render_widget(Paragraph::new(placeholder).block(block), body);
        }
        Ok(lines) => {
            let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .fg(palette.bg)
                        .bg(palette.text)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol(">> ");
            let mut state = ListState::default();
            state.select(Some(app.screen.cursor));
            f.render_stateful_widget(list, body, &mut state);
        }
    }
}

fn render_player_detail(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let lines = match &app.screen.chain.player_detail.state {
        LoadState::Idle => vec![Line::styled(
            "Select a player (Enter or player <id>)",
            Style::default().fg(Color::Gray),
        )],
        LoadState::Loading => vec![Line::from("Loading player...")],
        LoadState::Failed(e) => vec![Line::styled(
            format!("✗ {}", e),
            Style::default().fg(Color::Red),
        )],
        LoadState::Ready(detail) => player_lines(detail),
    };
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Player (add title / add history)")
            .style(Style::default().fg(palette.text_secondary)),
    );
    f.render_widget(paragraph, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(editor) = app.screen.editor.as_ref() else {
        return;
    };
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let mut lines: Vec<Line> = editor
        .fields()
        .into_iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<24}", key),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(value),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    if let Some(err) = editor.error() {
        lines.push(Line::styled(
            format!("✗ {}", err),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if editor.is_submitting() {
        lines.push(Line::styled("Saving...", Style::default().fg(Color::Yellow)));
    }
    lines.push(Line::styled(
        "set <field> <value>   s save   Esc cancel",
        Style::default().fg(Color::Gray),
    ));

    let mode = match editor.mode() {
        FormMode::Add => "new".to_string(),
        FormMode::Edit(id) => format!("ID {}", id),
    };
    let form = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", editor.title(), mode))
            .style(Style::default().fg(palette.text).bg(palette.input)),
    );
    f.render_widget(form, popup);
}

fn render_confirm(f: &mut Frame, area: Rect, app: &App) {
    let Some(pending) = app.screen.confirm.pending() else {
        return;
    };
    let popup = centered_rect(50, 25, area);
    f.render_widget(Clear, popup);
    let text = vec![
        Line::from(""),
        Line::styled(
            pending.prompt(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" delete    "),
            Span::styled("n", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" keep"),
        ]),
    ];
    let prompt = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm delete")
                .style(Style::default().fg(Color::Red)),
        );
    f.render_widget(prompt, popup);
}

/// Live notifications stacked in the top-right corner, newest last.
fn render_notifications(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.min(48);
    let mut y = area.y + 1;
    for notice in app.notices.iter() {
        if y + 3 > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width, y, width, 3);
        let color = match notice.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        let symbol = match notice.kind {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✗",
        };
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(format!("{} {}", symbol, notice.message)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().fg(color)),
            ),
            rect,
        );
        y += 3;
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let bottom_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let command_prompt = if app.input_mode == InputMode::Command {
        let mut spans = vec![Span::styled(
            "> ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        let cur = app.command_cursor.min(app.command_input.len());
        let (left, right) = app.command_input.split_at(cur);
        spans.push(Span::raw(left));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(right));

        if let Some(hint) = app.get_completion_hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::styled(
                "/ command  ←→ focus  ↑↓ move  Enter open  t theme  r reload  q quit",
                Style::default().fg(palette.text_secondary),
            ),
        ])
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "Command (Enter run, Esc cancel, Tab complete, ↑↓ history)"
            } else {
                "Command"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(palette.text)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if msg.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if msg.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(palette.text)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Log ({})", app.log_messages.len()))
            .style(Style::default().fg(palette.text)),
    );
    f.render_widget(log, bottom_chunks[1]);
}
