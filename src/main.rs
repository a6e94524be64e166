use std::fs::OpenOptions;
use std::io;
use std::sync::{Mutex, mpsc};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Block, Borders, Cell, Paragraph, Row as TableRow, Table, TableState as ScrollState,
};
use tracing_subscriber::EnvFilter;

use league_tables::column_plan::View;
use league_tables::feed::{run_load, spawn_provider};
use league_tables::sheet_fetch::load_sheet;
use league_tables::sources::SheetSources;
use league_tables::state::{AppState, Delta, ProviderCommand, TableState, apply_delta};
use league_tables::table_view::{EMPTY_MESSAGE, TableView};

const DEFAULT_LOG_FILE: &str = "league_tables.log";
const MAX_COLUMN_WIDTH: usize = 32;

struct CliArgs {
    view: View,
    query: String,
    json: bool,
}

struct App {
    state: AppState,
    should_quit: bool,
    search_active: bool,
    selected: usize,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            search_active: false,
            selected: 0,
            cmd_tx,
        }
    }

    fn load(&mut self, view: View) {
        let ticket = self.state.begin_load(view);
        self.selected = 0;
        self.search_active = false;
        if self.cmd_tx.send(ProviderCommand::Load(ticket)).is_err() {
            self.state.push_log("[WARN] Load request failed");
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.load(View::ALL[idx]);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.load(self.state.view),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('c') => {
                self.state.set_query("");
                self.selected = 0;
            }
            KeyCode::Char('v') => self.state.toggle_raw_columns(),
            KeyCode::Char('j') | KeyCode::Down => {
                let shown = self.state.table().map(|t| t.rows.len()).unwrap_or(0);
                self.selected = (self.selected + 1).min(shown.saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        let mut query = self.state.query.clone();
        match key.code {
            KeyCode::Esc => {
                query.clear();
                self.search_active = false;
            }
            KeyCode::Enter => self.search_active = false,
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(c) => query.push(c),
            _ => return,
        }
        self.state.set_query(&query);
        self.selected = 0;
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = parse_args()?;
    let sources = SheetSources::from_env();

    if args.json {
        init_logging(false)?;
        return dump_json(&sources, args.view, &args.query);
    }
    init_logging(true)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx, sources);

    let mut app = App::new(cmd_tx);
    app.load(args.view);
    if !args.query.is_empty() {
        app.state.set_query(&args.query);
    }
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn init_logging(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if to_file {
        let path = std::env::var("LEAGUE_LOG_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open log file {path}"))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(io::stderr).init();
    }
    Ok(())
}

/// One synchronous load, printed as JSON for an external renderer.
fn dump_json(sources: &SheetSources, view: View, query: &str) -> Result<()> {
    let mut state = AppState::new();
    let ticket = state.begin_load(view);
    let loader = |v: View| load_sheet(sources, v);
    apply_delta(&mut state, run_load(&loader, ticket));
    state.set_query(query);

    let Some(table) = state.table() else {
        bail!("{}", state.status);
    };
    let json = serde_json::to_string_pretty(&table).context("serialize table")?;
    println!("{json}");
    Ok(())
}

fn parse_args() -> Result<CliArgs> {
    let mut out = CliArgs {
        view: View::Standings,
        query: String::new(),
        json: false,
    };
    for arg in std::env::args().skip(1) {
        if let Some(key) = arg.strip_prefix("--view=") {
            out.view = View::from_key(key).with_context(|| format!("unknown view: {key}"))?;
        } else if let Some(query) = arg.strip_prefix("--query=") {
            out.query = query.to_string();
        } else if arg == "--json" {
            out.json = true;
        } else {
            bail!("unrecognized argument: {arg}");
        }
    }
    Ok(out)
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(200);

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], app);

    let footer = Paragraph::new(footer_text(app))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);
}

fn header_text(state: &AppState) -> String {
    let tabs = View::ALL
        .iter()
        .enumerate()
        .map(|(idx, view)| {
            if *view == state.view {
                format!("[{} {}]", idx + 1, view.title())
            } else {
                format!(" {} {} ", idx + 1, view.title())
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let updated = state
        .loaded_at
        .map(|t| format!(" | updated {}", t.format("%H:%M:%S")))
        .unwrap_or_default();
    let raw = if state.raw_columns { " | raw columns" } else { "" };
    format!("{tabs}\n{}{updated}{raw}", state.status)
}

fn footer_text(app: &App) -> String {
    let search = if app.search_active {
        format!("Search: {}▏", app.state.query)
    } else if app.state.query.is_empty() {
        "Search: (press /)".to_string()
    } else {
        format!("Search: {}", app.state.query)
    };
    let keys = "1-4 View | r Refresh | / Search | c Clear | v Raw columns | j/k Move | q Quit";
    format!("{search}\n{keys}\n{}", last_log(&app.state))
}

fn last_log(state: &AppState) -> String {
    state.logs.back().cloned().unwrap_or_default()
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    let message = match &app.state.table_state {
        TableState::Idle => Some("Nothing loaded yet".to_string()),
        TableState::Loading => Some(format!("Loading {}…", app.state.view.title())),
        TableState::Failed { message } => Some(format!(
            "Failed to load. Check that the sheet is still published to the web.\n{message}"
        )),
        TableState::Ready => None,
    };
    if let Some(message) = message {
        let p = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(p, area);
        return;
    }

    let Some(table) = app.state.table() else {
        return;
    };
    if table.is_empty() {
        let p = Paragraph::new(EMPTY_MESSAGE).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(p, area);
        return;
    }

    let widths = column_widths(&table);
    let header = TableRow::new(table.columns.iter().map(|c| Cell::from(c.label.clone())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = table.rows.iter().map(|cells| {
        TableRow::new(cells.iter().map(|cell| {
            let style = if cell.role.is_some_and(|r| r.is_team_identity()) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Cell::from(cell.display.text().to_string()).style(style)
        }))
    });
    let widget = Table::new(rows, widths)
        .header(header)
        .highlight_style(Style::default().fg(Color::White).bg(Color::DarkGray));

    let mut scroll = ScrollState::default().with_selected(Some(app.selected.min(table.rows.len() - 1)));
    frame.render_stateful_widget(widget, area, &mut scroll);
}

fn column_widths(table: &TableView) -> Vec<Constraint> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|r| r.get(idx))
                .map(|c| c.display.text().chars().count())
                .chain(std::iter::once(col.label.chars().count()))
                .max()
                .unwrap_or(0);
            Constraint::Length((widest.min(MAX_COLUMN_WIDTH) + 1) as u16)
        })
        .collect()
}
