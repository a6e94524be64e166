use std::collections::VecDeque;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::column_plan::{ColumnPlan, View, plan_passthrough};
use crate::search_filter::filter_rows;
use crate::sheet_decode::{DecodeWarning, Row, Sheet};
use crate::table_view::{TableView, prepare_rows, render_table};

const LOG_CAPACITY: usize = 200;

/// Identifies one load request. Only the newest ticket may write results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub view: View,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableState {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    pub generation: u64,
    pub table_state: TableState,
    pub headers: Vec<String>,
    pub plan: ColumnPlan,
    pub rows: Vec<Row>,
    pub query: String,
    pub raw_columns: bool,
    pub status: String,
    pub warnings: Vec<DecodeWarning>,
    pub loaded_at: Option<DateTime<Local>>,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Standings,
            generation: 0,
            table_state: TableState::Idle,
            headers: Vec::new(),
            plan: ColumnPlan::default(),
            rows: Vec::new(),
            query: String::new(),
            raw_columns: false,
            status: String::new(),
            warnings: Vec::new(),
            loaded_at: None,
            logs: VecDeque::new(),
        }
    }

    /// Switch to `view` and start a fresh load. Anything still in flight for an
    /// older ticket will be ignored when it lands.
    pub fn begin_load(&mut self, view: View) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.view = view;
        self.table_state = TableState::Loading;
        self.headers.clear();
        self.plan = ColumnPlan::default();
        self.rows.clear();
        self.warnings.clear();
        self.query.clear();
        self.status = format!("Loading {}…", view.title());
        LoadTicket {
            view,
            generation: self.generation,
        }
    }

    pub fn refresh(&mut self) -> LoadTicket {
        self.begin_load(self.view)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.view == self.view
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        if self.table_state == TableState::Ready {
            self.status = self.ready_status();
        }
    }

    pub fn toggle_raw_columns(&mut self) {
        self.raw_columns = !self.raw_columns;
    }

    /// Plan used for rendering: the view's plan, or every header in raw mode.
    pub fn active_plan(&self) -> ColumnPlan {
        if self.raw_columns {
            plan_passthrough(&self.headers)
        } else {
            self.plan.clone()
        }
    }

    /// Current table after search; `None` unless a load has succeeded.
    pub fn table(&self) -> Option<TableView> {
        if self.table_state != TableState::Ready {
            return None;
        }
        let shown = filter_rows(&self.rows, &self.query);
        let mut table = render_table(self.view.title(), &shown, &self.active_plan());
        table.total_rows = self.rows.len();
        Some(table)
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push_back(line.into());
        while self.logs.len() > LOG_CAPACITY {
            self.logs.pop_front();
        }
    }

    fn ready_status(&self) -> String {
        let title = self.view.title();
        if self.query.trim().is_empty() {
            format!("OK: {title} loaded ({} rows).", self.rows.len())
        } else {
            let shown = filter_rows(&self.rows, &self.query).len();
            format!(
                "OK: {title} ({shown}/{} rows, filtered).",
                self.rows.len()
            )
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SheetLoaded { ticket: LoadTicket, sheet: Sheet },
    LoadFailed { ticket: LoadTicket, error: String },
    Log(String),
}

#[derive(Debug, Clone, Copy)]
pub enum ProviderCommand {
    Load(LoadTicket),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SheetLoaded { ticket, sheet } => {
            if !state.is_current(ticket) {
                debug!(view = ticket.view.key(), generation = ticket.generation, "dropping stale sheet");
                return;
            }
            let (plan, rows) = prepare_rows(ticket.view, &sheet);
            state.headers = sheet.header_set();
            state.plan = plan;
            state.rows = rows;
            for w in &sheet.warnings {
                state.push_log(format!("[WARN] line {}: {}", w.line, w.message));
            }
            state.warnings = sheet.warnings;
            state.loaded_at = Some(Local::now());
            state.table_state = TableState::Ready;
            state.status = state.ready_status();
            let line = format!("[INFO] {}", state.status);
            state.push_log(line);
        }
        Delta::LoadFailed { ticket, error } => {
            if !state.is_current(ticket) {
                debug!(view = ticket.view.key(), generation = ticket.generation, "dropping stale failure");
                return;
            }
            state.rows.clear();
            state.table_state = TableState::Failed {
                message: error.clone(),
            };
            state.status = format!("Error: {error}");
            state.push_log(format!("[WARN] {} load failed: {error}", ticket.view.title()));
        }
        Delta::Log(line) => state.push_log(line),
    }
}
