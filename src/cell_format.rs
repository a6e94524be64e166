use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::column_plan::Role;
use crate::sheet_decode::CellValue;
use crate::standings_sort::{parse_count, parse_win_pct};

pub const TEAM_LOGO_DIR: &str = "./assets/teams/";

// URI component rules: only the unreserved marks survive unescaped.
const LOGO_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellDisplay {
    Text { text: String },
    Team { name: String, logo: Option<String> },
}

impl CellDisplay {
    pub fn text(&self) -> &str {
        match self {
            CellDisplay::Text { text } => text,
            CellDisplay::Team { name, .. } => name,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        CellDisplay::Text { text: text.into() }
    }
}

/// Asset path for a team's logo. Same name, same path: the asset store is keyed
/// on the exact display name.
pub fn team_logo_path(name: &str) -> String {
    format!("{TEAM_LOGO_DIR}{}.png", utf8_percent_encode(name, LOGO_NAME))
}

// Outside this range a sheet shows numbers in exponent form.
const PLAIN_MAX: f64 = 1e21;
const PLAIN_MIN: f64 = 1e-6;

/// Numbers the way the sheet shows them: `5` not `5.0`, never `-0`, and
/// `1e+25` rather than a wall of digits.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let magnitude = v.abs();
    if magnitude >= PLAIN_MAX || magnitude < PLAIN_MIN {
        let exp = format!("{v:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    format!("{v}")
}

/// One decimal place, ties rounded away from zero (`56.25` shows as `56.3`).
fn one_decimal(v: f64) -> String {
    let rounded = (v * 10.0).round() / 10.0;
    format!("{rounded:.1}")
}

/// Render one raw field for display according to its column role.
///
/// Values that don't parse for their role pass through untouched. Nothing
/// here adds markup-significant characters; escaping stays with the renderer.
pub fn format_cell(value: Option<&CellValue>, role: Option<Role>) -> CellDisplay {
    let raw = value.map(|v| v.to_string()).unwrap_or_default();
    let Some(role) = role else {
        return CellDisplay::plain(raw);
    };

    if role.is_team_identity() {
        let name = raw.trim().to_string();
        let logo = (!name.is_empty()).then(|| team_logo_path(&name));
        return CellDisplay::Team { name, logo };
    }

    let Some(value) = value else {
        return CellDisplay::plain(raw);
    };
    match role {
        Role::WinPct => match parse_win_pct(value) {
            Some(pct) => CellDisplay::plain(format!("{}%", one_decimal(pct))),
            None => CellDisplay::plain(raw),
        },
        Role::Win | Role::Loss => match parse_count(value) {
            Some(n) => CellDisplay::plain(format_number(n)),
            None => CellDisplay::plain(raw),
        },
        Role::Delta => match parse_count(value) {
            Some(n) if n > 0.0 => CellDisplay::plain(format!("+{}", format_number(n))),
            Some(n) => CellDisplay::plain(format_number(n)),
            None => CellDisplay::plain(raw),
        },
        _ => CellDisplay::plain(raw),
    }
}
