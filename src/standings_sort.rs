use std::cmp::Ordering;

use crate::column_plan::{ColumnPlan, Role};
use crate::sheet_decode::{CellValue, Row};

/// Win percentage on a 0..100 scale.
///
/// Values at or below 1 are read as fractions. That misreads a genuine
/// percentage of 1% or less; kept as-is until the sheet format says otherwise.
pub fn parse_win_pct(value: &CellValue) -> Option<f64> {
    let raw = match value {
        CellValue::Empty => return None,
        CellValue::Number(v) => *v,
        CellValue::Text(s) => parse_decimal(&s.replace('%', ""))?,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(if raw <= 1.0 { raw * 100.0 } else { raw })
}

/// Win/loss counts (and any other plain number a sheet may write with a
/// decimal comma).
pub fn parse_count(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(v) => v.is_finite().then_some(*v),
        CellValue::Text(s) => parse_decimal(s),
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn role_value<'a>(row: &'a Row, plan: &ColumnPlan, role: Role) -> Option<&'a CellValue> {
    plan.column_for(role).and_then(|header| row.get(header))
}

fn key(row: &Row, plan: &ColumnPlan, role: Role, parse: fn(&CellValue) -> Option<f64>) -> Option<f64> {
    role_value(row, plan, role).and_then(parse)
}

/// Parseable before unparseable, then by `order` between two parsed values.
fn cmp_parsed(a: Option<f64>, b: Option<f64>, order: impl Fn(f64, f64) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn team_name(row: &Row, plan: &ColumnPlan) -> String {
    role_value(row, plan, Role::Team)
        .map(|v| v.to_string().trim().to_string())
        .unwrap_or_default()
}

/// Standings order: WIN% desc, W desc, L asc, team name asc.
pub fn compare_standings(a: &Row, b: &Row, plan: &ColumnPlan) -> Ordering {
    cmp_parsed(
        key(a, plan, Role::WinPct, parse_win_pct),
        key(b, plan, Role::WinPct, parse_win_pct),
        |x, y| y.total_cmp(&x),
    )
    .then_with(|| {
        cmp_parsed(
            key(a, plan, Role::Win, parse_count),
            key(b, plan, Role::Win, parse_count),
            |x, y| y.total_cmp(&x),
        )
    })
    .then_with(|| {
        cmp_parsed(
            key(a, plan, Role::Loss, parse_count),
            key(b, plan, Role::Loss, parse_count),
            |x, y| x.total_cmp(&y),
        )
    })
    .then_with(|| team_name(a, plan).cmp(&team_name(b, plan)))
}

/// Sorted copy of `rows`; the input is left untouched.
pub fn sort_standings(rows: &[Row], plan: &ColumnPlan) -> Vec<Row> {
    let mut out = rows.to_vec();
    out.sort_by(|a, b| compare_standings(a, b, plan));
    out
}
