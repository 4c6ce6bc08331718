//! Ratatui-based search screen wired to the GitHub lookup.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::backend::TestBackend;
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tracing::{info, warn};

use crate::config::Config;
use crate::model::types::{ResultSet, UserRecord};
use crate::search::client::{GithubClient, ProfileLookup};
use crate::search::debounce::{Clock, Debouncer, SystemClock};
use crate::search::orchestrator::ErrorKind;
use crate::selection::TriState;
use crate::ui::components::theme::ThemePalette;
use crate::ui::driver::SessionDriver;
use crate::ui::shortcuts;
use crate::ui::state::{SearchScreen, Snapshot};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Presentation state the core does not care about.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub cursor: usize,
    pub theme_dark: bool,
    pub status: Option<String>,
    pub frame: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            cursor: 0,
            theme_dark: true,
            status: None,
            frame: 0,
        }
    }
}

impl ViewState {
    fn palette(&self) -> ThemePalette {
        if self.theme_dark {
            ThemePalette::dark()
        } else {
            ThemePalette::light()
        }
    }

    fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Input(char),
    Backspace,
    Up,
    Down,
    Top,
    Bottom,
    ToggleEditMode,
    ToggleTheme,
    ToggleCurrent,
    ToggleAll,
    Duplicate,
    Remove,
    Retry,
    OpenProfile,
    Quit,
}

/// Map a key press to an action. Selection keys only act in edit mode.
pub fn action_for(key: KeyEvent, edit_mode: bool) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc | KeyCode::F(10) => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('r') if ctrl => Some(Action::Retry),
        KeyCode::Char('a') if ctrl && edit_mode => Some(Action::ToggleAll),
        KeyCode::Char('d') if ctrl && edit_mode => Some(Action::Duplicate),
        KeyCode::Char('x') if ctrl && edit_mode => Some(Action::ToggleCurrent),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(Action::Input(c)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete if edit_mode => Some(Action::Remove),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Home => Some(Action::Top),
        KeyCode::End => Some(Action::Bottom),
        KeyCode::F(2) => Some(Action::ToggleEditMode),
        KeyCode::F(3) => Some(Action::ToggleTheme),
        KeyCode::Enter => Some(Action::OpenProfile),
        _ => None,
    }
}

fn current_record(results: Option<&ResultSet>, cursor: usize) -> Option<&UserRecord> {
    results.and_then(|rs| rs.items.get(cursor))
}

/// Apply `action` to the session. Returns false when the screen should close.
pub fn apply_action<L: ProfileLookup, C: Clock>(
    driver: &mut SessionDriver<L, C>,
    view: &mut ViewState,
    action: Action,
) -> bool {
    view.status = None;
    let len = driver.screen().results().map_or(0, |rs| rs.len());
    match action {
        Action::Quit => return false,
        Action::Input(c) => {
            let mut q = driver.screen().query().to_string();
            q.push(c);
            driver.screen_mut().set_query(q);
        }
        Action::Backspace => {
            let mut q = driver.screen().query().to_string();
            q.pop();
            driver.screen_mut().set_query(q);
        }
        Action::Up => view.cursor = view.cursor.saturating_sub(1),
        Action::Down => view.cursor = (view.cursor + 1).min(len.saturating_sub(1)),
        Action::Top => view.cursor = 0,
        Action::Bottom => view.cursor = len.saturating_sub(1),
        Action::ToggleEditMode => {
            let on = driver.screen_mut().toggle_edit_mode();
            view.status = Some(format!("Edit mode {}", if on { "on" } else { "off" }));
        }
        Action::ToggleTheme => view.theme_dark = !view.theme_dark,
        Action::ToggleCurrent => {
            let screen = driver.screen_mut();
            if let Some(id) = current_record(screen.results(), view.cursor).map(|u| u.id) {
                let selected = screen.is_selected(id);
                screen.toggle_one(id, !selected);
            }
        }
        Action::ToggleAll => {
            let screen = driver.screen_mut();
            let select = screen.all_selected() != TriState::Checked;
            screen.toggle_all(select);
        }
        Action::Duplicate => {
            let added = driver.screen_mut().duplicate_selected();
            view.status = Some(format!("Duplicated {added} profile(s)"));
        }
        Action::Remove => {
            let removed = driver.screen_mut().remove_selected();
            view.status = Some(format!("Removed {removed} profile(s)"));
        }
        Action::Retry => driver.retry(),
        Action::OpenProfile => {
            if let Some(user) = current_record(driver.screen().results(), view.cursor) {
                let url = user.html_url.clone();
                view.status = Some(match open_in_browser(&url) {
                    Ok(()) => format!("Opened {url}"),
                    Err(e) => {
                        warn!(url = %url, "failed to open browser: {e}");
                        format!("Could not open {url}: {e}")
                    }
                });
            }
        }
    }
    let len = driver.screen().results().map_or(0, |rs| rs.len());
    view.clamp(len);
    true
}

fn footer_hints(edit_mode: bool) -> String {
    let mut hints = vec![
        format!("{} edit mode", shortcuts::EDIT_MODE),
        format!("{} theme", shortcuts::THEME),
        format!("{} move", shortcuts::CURSOR),
        format!("{} open", shortcuts::OPEN_PROFILE),
    ];
    if edit_mode {
        hints.push(format!("{} select", shortcuts::TOGGLE_SELECT));
        hints.push(format!("{} all", shortcuts::TOGGLE_ALL));
    }
    hints.push(format!("{} quit", shortcuts::QUIT));
    hints.join(" | ")
}

/// Draw one frame of the screen.
pub fn render(f: &mut Frame, snap: &Snapshot, view: &ViewState) {
    let palette = view.palette();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // search bar
            Constraint::Length(1), // actions
            Constraint::Min(0),    // results
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(Line::from(Span::styled("Github Search", palette.title()))),
        chunks[0],
    );

    let bar = Paragraph::new(if snap.query.is_empty() {
        Line::from(Span::styled("Search user", palette.hint_style()))
    } else {
        Line::from(snap.query.clone())
    })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_focus_style())
            .title("Search"),
    )
    .style(palette.surface_style());
    f.render_widget(bar, chunks[1]);

    let actions = if snap.edit_mode {
        Line::from(vec![
            Span::styled(
                format!(
                    "{} {} elements selected",
                    snap.all_selected.marker(),
                    snap.selected_count
                ),
                palette.selected_style(),
            ),
            Span::styled(
                format!(
                    "   {} duplicate  {} remove",
                    shortcuts::DUPLICATE,
                    shortcuts::REMOVE
                ),
                palette.hint_style(),
            ),
        ])
    } else {
        Line::from(Span::styled(
            format!("Edit mode off ({} to enable)", shortcuts::EDIT_MODE),
            palette.hint_style(),
        ))
    };
    f.render_widget(Paragraph::new(actions), chunks[2]);

    render_body(f, chunks[3], snap, view, palette);

    let footer = view
        .status
        .clone()
        .unwrap_or_else(|| footer_hints(snap.edit_mode));
    f.render_widget(
        Paragraph::new(Span::styled(footer, palette.hint_style())),
        chunks[4],
    );
}

fn render_body(
    f: &mut Frame,
    area: Rect,
    snap: &Snapshot,
    view: &ViewState,
    palette: ThemePalette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style());

    if snap.loading {
        let spin = SPINNER[view.frame % SPINNER.len()];
        f.render_widget(
            Paragraph::new(format!("{spin} Searching...")).block(block),
            area,
        );
        return;
    }
    if let Some(err) = &snap.error {
        let style = match err.kind {
            ErrorKind::RateLimited => palette.warning_style(),
            ErrorKind::Generic => palette.error_style(),
        };
        let mut lines = vec![Line::from(Span::styled(err.message, style))];
        if err.retryable {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Retry: {}", shortcuts::RETRY),
                palette.hint_style(),
            )));
        }
        f.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            area,
        );
        return;
    }
    if let Some(notice) = &snap.notice {
        f.render_widget(
            Paragraph::new(Span::styled(notice.clone(), palette.hint_style()))
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
        return;
    }
    let Some(rs) = &snap.results else {
        f.render_widget(block, area);
        return;
    };

    let items: Vec<ListItem> = rs
        .items
        .iter()
        .enumerate()
        .map(|(row, user)| {
            let mut spans = Vec::new();
            if snap.edit_mode {
                let selected = snap.is_selected(user.id);
                spans.push(Span::styled(
                    if selected { "[x] " } else { "[ ] " },
                    if selected {
                        palette.selected_style()
                    } else {
                        palette.hint_style()
                    },
                ));
            }
            spans.push(Span::raw(format!("{:<24}", user.login)));
            spans.push(Span::styled(
                format!(" #{:<10} {}", user.id, user.html_url),
                palette.hint_style(),
            ));
            ListItem::new(Line::from(spans)).style(palette.stripe(row))
        })
        .collect();
    let title = format!("{} results ({} shown)", rs.total_count, rs.len());
    let list = List::new(items)
        .block(block.title(title))
        .highlight_style(palette.highlight_style());
    let mut state = ListState::default();
    if !rs.is_empty() {
        state.select(Some(view.cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Render a frame off-screen and return its rows.
pub fn render_to_lines(
    snap: &Snapshot,
    view: &ViewState,
    width: u16,
    height: u16,
) -> Result<Vec<String>> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    terminal.draw(|f| render(f, snap, view))?;
    let buffer = terminal.backend().buffer();
    Ok((0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect())
}

pub fn open_in_browser(url: &str) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .spawn()?;
    }
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }
    Ok(())
}

fn new_driver(config: &Config) -> Result<SessionDriver<GithubClient, SystemClock>> {
    let client = Arc::new(GithubClient::from_config(config)?);
    let mut screen = SearchScreen::new(Debouncer::new(config.debounce()));
    screen.set_edit_mode(config.edit_mode);
    if !config.initial_query.is_empty() {
        screen.set_query(config.initial_query.clone());
    }
    Ok(SessionDriver::new(screen, client))
}

pub async fn run_tui(config: &Config, once: bool) -> Result<()> {
    let mut driver = new_driver(config)?;
    let mut view = ViewState::default();

    if once && dotenvy::var("TUI_HEADLESS").is_ok() {
        let snap = driver.screen().snapshot();
        for line in render_to_lines(&snap, &view, 100, 24)? {
            println!("{}", line.trim_end());
        }
        return Ok(());
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!(once, "tui started");

    let result = event_loop(&mut terminal, &mut driver, &mut view, once).await;

    driver.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("tui closed");
    result
}

async fn event_loop<L: ProfileLookup, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    driver: &mut SessionDriver<L, C>,
    view: &mut ViewState,
    once: bool,
) -> Result<()> {
    let tick_rate = Duration::from_millis(30);
    let mut needs_draw = true;
    loop {
        if needs_draw {
            let snap = driver.screen().snapshot();
            terminal.draw(|f| render(f, &snap, &*view))?;
            view.frame = view.frame.wrapping_add(1);
            needs_draw = false;
            if once {
                return Ok(());
            }
        }

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = action_for(key, driver.screen().edit_mode()) {
                        if !apply_action(driver, view, action) {
                            return Ok(());
                        }
                        needs_draw = true;
                    }
                }
                Event::Resize(_, _) => needs_draw = true,
                _ => {}
            }
        }

        if driver.pump() || driver.screen().is_loading() {
            needs_draw = true;
        }
        tokio::time::sleep(tick_rate).await;
    }
}
