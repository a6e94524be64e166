use std::collections::HashMap;
use std::env;

use crate::column_plan::View;

const SHEET_BASE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRYWM5IreOqW2E2BAOSczd40_uwSh4678zDw6E7g2aea5_0elsET9EZeMCl7VUWLw/pub";

fn default_gid(view: View) -> &'static str {
    match view {
        View::Standings => "1515860354",
        View::PowerRanking => "1046538265",
        View::PowerRankingPlus => "1897631088",
        View::Matchups => "624759412",
    }
}

fn env_key(view: View) -> &'static str {
    match view {
        View::Standings => "LEAGUE_SHEET_STANDINGS",
        View::PowerRanking => "LEAGUE_SHEET_PR",
        View::PowerRankingPlus => "LEAGUE_SHEET_PRP",
        View::Matchups => "LEAGUE_SHEET_MATCHUPS",
    }
}

pub fn default_url(view: View) -> String {
    format!(
        "{SHEET_BASE}?gid={}&single=true&output=csv",
        default_gid(view)
    )
}

/// Published CSV export per view.
#[derive(Debug, Clone)]
pub struct SheetSources {
    urls: HashMap<View, String>,
}

impl Default for SheetSources {
    fn default() -> Self {
        Self {
            urls: View::ALL.into_iter().map(|v| (v, default_url(v))).collect(),
        }
    }
}

impl SheetSources {
    /// Defaults, overridden per view by `LEAGUE_SHEET_*`. Blank values are ignored.
    pub fn from_env() -> Self {
        let mut sources = Self::default();
        for view in View::ALL {
            if let Ok(raw) = env::var(env_key(view))
                && !raw.trim().is_empty()
            {
                sources.set(view, raw.trim());
            }
        }
        sources
    }

    pub fn set(&mut self, view: View, url: &str) {
        self.urls.insert(view, url.to_string());
    }

    pub fn url(&self, view: View) -> Option<&str> {
        self.urls.get(&view).map(String::as_str)
    }
}
