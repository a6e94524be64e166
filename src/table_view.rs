use serde::Serialize;

use crate::cell_format::{CellDisplay, format_cell};
use crate::column_plan::{ColumnPlan, Role, View, plan_columns};
use crate::search_filter::filter_rows;
use crate::sheet_decode::{Row, Sheet};
use crate::standings_sort::sort_standings;

pub const EMPTY_MESSAGE: &str = "No data.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub header: String,
    pub label: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedCell {
    pub column: String,
    pub display: CellDisplay,
    pub role: Option<Role>,
}

/// What the renderer mounts for one view load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<FormattedCell>>,
    pub total_rows: usize,
}

impl TableView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Format `rows` through `plan`. Rows are rendered in the order given.
pub fn render_table(title: &str, rows: &[Row], plan: &ColumnPlan) -> TableView {
    let columns = plan
        .columns
        .iter()
        .map(|c| TableColumn {
            header: c.header.clone(),
            label: c.label.clone(),
            role: c.role,
        })
        .collect();

    let rows = rows
        .iter()
        .map(|row| {
            plan.columns
                .iter()
                .map(|c| FormattedCell {
                    column: c.header.clone(),
                    display: format_cell(row.get(&c.header), c.role),
                    role: c.role,
                })
                .collect()
        })
        .collect::<Vec<Vec<FormattedCell>>>();

    TableView {
        title: title.to_string(),
        total_rows: rows.len(),
        columns,
        rows,
    }
}

/// Plan, order and format a freshly decoded sheet for `view`.
///
/// Standings are sorted once here; the result is what gets kept for later
/// search re-renders.
pub fn prepare_rows(view: View, sheet: &Sheet) -> (ColumnPlan, Vec<Row>) {
    let plan = plan_columns(view, &sheet.header_set());
    let rows = if view == View::Standings {
        sort_standings(&sheet.rows, &plan)
    } else {
        sheet.rows.clone()
    };
    (plan, rows)
}

/// Full pipeline for one sheet and query: plan, sort, filter, render.
pub fn build_table(view: View, sheet: &Sheet, query: &str) -> TableView {
    let (plan, rows) = prepare_rows(view, sheet);
    let shown = filter_rows(&rows, query);
    let mut table = render_table(view.title(), &shown, &plan);
    table.total_rows = rows.len();
    table
}
