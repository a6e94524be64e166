use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Standings,
    PowerRanking,
    PowerRankingPlus,
    Matchups,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Standings,
        View::PowerRanking,
        View::PowerRankingPlus,
        View::Matchups,
    ];

    pub fn key(self) -> &'static str {
        match self {
            View::Standings => "standings",
            View::PowerRanking => "pr",
            View::PowerRankingPlus => "prp",
            View::Matchups => "matchups",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Standings => "Standings",
            View::PowerRanking => "Power Ranking",
            View::PowerRankingPlus => "Power Ranking+",
            View::Matchups => "Matchups",
        }
    }

    pub fn from_key(raw: &str) -> Option<View> {
        let key = raw.trim();
        View::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Team,
    Conference,
    Win,
    Loss,
    WinPct,
    Rank,
    Delta,
    Away,
    Home,
}

impl Role {
    /// Roles whose cells name a team and carry a logo.
    pub fn is_team_identity(self) -> bool {
        matches!(self, Role::Team | Role::Away | Role::Home)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedColumn {
    pub header: String,
    pub label: String,
    pub role: Option<Role>,
}

/// Selected columns in display order. Roles live on the columns themselves, so
/// a bound role always points at a selected header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnPlan {
    pub columns: Vec<PlannedColumn>,
}

impl ColumnPlan {
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header.as_str())
    }

    pub fn label_for(&self, header: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.header == header)
            .map(|c| c.label.as_str())
    }

    pub fn column_for(&self, role: Role) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.role == Some(role))
            .map(|c| c.header.as_str())
    }

    pub fn role_of(&self, header: &str) -> Option<Role> {
        self.columns
            .iter()
            .find(|c| c.header == header)
            .and_then(|c| c.role)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn push(&mut self, header: &str, label: &str, role: Option<Role>) {
        self.columns.push(PlannedColumn {
            header: header.to_string(),
            label: label.to_string(),
            role,
        });
    }
}

/// One way of locating a column. A chain of these is tried in order and the
/// first hit wins.
#[derive(Debug, Clone, Copy)]
pub enum ColumnMatcher {
    /// Case-sensitive exact name, in preference order.
    Named(&'static [&'static str]),
    /// Trimmed, case-insensitive equality with any keyword.
    Keyword(&'static [&'static str]),
    /// Case-insensitive substring of any keyword.
    Contains(&'static [&'static str]),
    /// Zero-based position in the header set.
    Position(usize),
}

impl ColumnMatcher {
    fn find<'a>(&self, headers: &'a [String], taken: &[&str]) -> Option<&'a str> {
        let free = headers
            .iter()
            .map(String::as_str)
            .filter(|h| !taken.contains(h));
        match *self {
            ColumnMatcher::Named(names) => {
                let free: Vec<&str> = free.collect();
                names
                    .iter()
                    .find_map(|name| free.iter().copied().find(|h| h == name))
            }
            ColumnMatcher::Keyword(words) => {
                let mut free = free;
                free.find(|h| {
                    let h = h.trim().to_lowercase();
                    words.iter().any(|w| h == *w)
                })
            }
            ColumnMatcher::Contains(words) => {
                let mut free = free;
                free.find(|h| {
                    let h = h.to_lowercase();
                    words.iter().any(|w| h.contains(w))
                })
            }
            ColumnMatcher::Position(idx) => headers
                .get(idx)
                .map(String::as_str)
                .filter(|h| !taken.contains(h)),
        }
    }
}

pub fn resolve_column<'a>(
    headers: &'a [String],
    chain: &[ColumnMatcher],
    taken: &[&str],
) -> Option<&'a str> {
    chain.iter().find_map(|m| m.find(headers, taken))
}

const TEAM_NAMES: &[&str] = &["team", "Team", "team_name", "team_sorted", "team_name_conf", "Teamname"];
const TEAM_CHAIN: &[ColumnMatcher] = &[ColumnMatcher::Named(TEAM_NAMES), ColumnMatcher::Contains(&["team"])];

const STANDINGS_LABELS: [(&str, Role); 5] = [
    ("Team", Role::Team),
    ("Conf", Role::Conference),
    ("W", Role::Win),
    ("L", Role::Loss),
    ("WIN%", Role::WinPct),
];
// Columns I..M of the published standings tab.
const STANDINGS_OFFSET: usize = 8;
const STANDINGS_WIDTH: usize = 5;

const DELTA_CHAIN: &[ColumnMatcher] = &[
    ColumnMatcher::Keyword(&["delta"]),
    ColumnMatcher::Contains(&["delta"]),
    ColumnMatcher::Position(3),
];

const AWAY_WORDS: &[&str] = &["away", "away team", "visitor", "away_team"];
const SCORE_WORDS: &[&str] = &["score", "current", "result"];
const HOME_WORDS: &[&str] = &["home", "home team", "host", "home_team"];
const PROJECTION_WORDS: &[&str] = &["projection", "proj", "projected", "proj_score"];

const MATCHUP_SLOTS: [(&[&str], &str, Option<Role>); 4] = [
    (AWAY_WORDS, "Away", Some(Role::Away)),
    (SCORE_WORDS, "Score", None),
    (HOME_WORDS, "Home", Some(Role::Home)),
    (PROJECTION_WORDS, "Projection", None),
];

/// Team column heuristic for sheets without a positional rule.
pub fn guess_team_column(headers: &[String]) -> Option<&str> {
    resolve_column(headers, TEAM_CHAIN, &[])
}

/// Derive the column plan for a view from the header set of the current fetch.
pub fn plan_columns(view: View, headers: &[String]) -> ColumnPlan {
    match view {
        View::Standings => plan_standings(headers),
        View::PowerRanking => plan_power_ranking(headers),
        View::PowerRankingPlus => plan_power_ranking_plus(headers),
        View::Matchups => plan_matchups(headers),
    }
}

/// Every header as-is, with only the team column tagged.
pub fn plan_passthrough(headers: &[String]) -> ColumnPlan {
    let team = guess_team_column(headers);
    let mut plan = ColumnPlan::default();
    for header in headers {
        let role = (Some(header.as_str()) == team).then_some(Role::Team);
        plan.push(header, header, role);
    }
    plan
}

fn plan_standings(headers: &[String]) -> ColumnPlan {
    let start = if headers.len() >= STANDINGS_OFFSET + STANDINGS_WIDTH {
        STANDINGS_OFFSET
    } else {
        0
    };
    let mut plan = ColumnPlan::default();
    for (header, (label, role)) in headers.iter().skip(start).zip(STANDINGS_LABELS) {
        plan.push(header, label, Some(role));
    }
    plan
}

fn plan_power_ranking(headers: &[String]) -> ColumnPlan {
    let mut plan = ColumnPlan::default();
    let labels = [("Rank", Some(Role::Rank)), ("Team", Some(Role::Team)), ("Score", None)];
    for (header, (label, role)) in headers.iter().zip(labels) {
        plan.push(header, label, role);
    }
    if plan.column_for(Role::Team).is_none() {
        let selected: Vec<String> = plan.headers().map(str::to_string).collect();
        if let Some(team) = guess_team_column(&selected).map(str::to_string)
            && let Some(col) = plan.columns.iter_mut().find(|c| c.header == team)
        {
            col.role = Some(Role::Team);
        }
    }
    plan
}

fn plan_power_ranking_plus(headers: &[String]) -> ColumnPlan {
    let mut plan = plan_power_ranking(headers);
    let taken: Vec<&str> = plan.headers().collect();
    let delta = resolve_column(headers, DELTA_CHAIN, &taken).map(str::to_string);
    if let Some(delta) = delta {
        plan.push(&delta, "Delta", Some(Role::Delta));
    }
    plan
}

fn plan_matchups(headers: &[String]) -> ColumnPlan {
    let mut found: [Option<&str>; 4] = [None; 4];
    let mut taken: Vec<&str> = Vec::new();

    // Exact names for every role first, so a substring hit for one role can't
    // steal another role's exact column.
    for (slot, (words, _, _)) in found.iter_mut().zip(MATCHUP_SLOTS) {
        if let Some(h) = resolve_column(headers, &[ColumnMatcher::Keyword(words)], &taken) {
            *slot = Some(h);
            taken.push(h);
        }
    }
    for (slot, (words, _, _)) in found.iter_mut().zip(MATCHUP_SLOTS) {
        if slot.is_some() {
            continue;
        }
        if let Some(h) = resolve_column(headers, &[ColumnMatcher::Contains(words)], &taken) {
            *slot = Some(h);
            taken.push(h);
        }
    }

    if found.iter().all(Option::is_none) {
        for (idx, slot) in found.iter_mut().enumerate() {
            *slot = headers.get(idx).map(String::as_str);
        }
    }

    let mut plan = ColumnPlan::default();
    for (header, (_, label, role)) in found.iter().zip(MATCHUP_SLOTS) {
        if let Some(header) = header {
            plan.push(header, label, role);
        }
    }
    plan
}
