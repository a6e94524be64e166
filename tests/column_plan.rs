use league_tables::column_plan::{
    ColumnPlan, Role, View, guess_team_column, plan_columns, plan_passthrough,
};

fn hs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn labels(plan: &ColumnPlan) -> Vec<&str> {
    plan.columns.iter().map(|c| c.label.as_str()).collect()
}

fn headers(plan: &ColumnPlan) -> Vec<&str> {
    plan.headers().collect()
}

#[test]
fn standings_uses_positions_nine_to_thirteen() {
    let raw: Vec<String> = (1..=13).map(|i| format!("col{i}")).collect();
    let plan = plan_columns(View::Standings, &raw);
    assert_eq!(headers(&plan), vec!["col9", "col10", "col11", "col12", "col13"]);
    assert_eq!(labels(&plan), vec!["Team", "Conf", "W", "L", "WIN%"]);
    assert_eq!(plan.column_for(Role::Team), Some("col9"));
    assert_eq!(plan.column_for(Role::Conference), Some("col10"));
    assert_eq!(plan.column_for(Role::Win), Some("col11"));
    assert_eq!(plan.column_for(Role::Loss), Some("col12"));
    assert_eq!(plan.column_for(Role::WinPct), Some("col13"));
}

#[test]
fn standings_ignores_names_outside_the_window() {
    let raw = hs(&[
        "team", "conf", "W", "L", "T", "PF", "PA", "win_pct", "a", "b", "c", "d", "e", "extra",
    ]);
    let plan = plan_columns(View::Standings, &raw);
    assert_eq!(headers(&plan), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn short_standings_sheet_takes_first_five() {
    let raw = hs(&["Team", "Conf", "W", "L", "Pct", "Streak"]);
    let plan = plan_columns(View::Standings, &raw);
    assert_eq!(headers(&plan), vec!["Team", "Conf", "W", "L", "Pct"]);
    assert_eq!(plan.column_for(Role::WinPct), Some("Pct"));
}

#[test]
fn tiny_standings_sheet_binds_what_exists() {
    let raw = hs(&["Team", "Conf"]);
    let plan = plan_columns(View::Standings, &raw);
    assert_eq!(labels(&plan), vec!["Team", "Conf"]);
    assert_eq!(plan.column_for(Role::WinPct), None);
    assert_eq!(plan.column_for(Role::Win), None);
}

#[test]
fn power_ranking_takes_first_three() {
    let raw = hs(&["#", "Club", "Pts", "Notes"]);
    let plan = plan_columns(View::PowerRanking, &raw);
    assert_eq!(headers(&plan), vec!["#", "Club", "Pts"]);
    assert_eq!(labels(&plan), vec!["Rank", "Team", "Score"]);
    assert_eq!(plan.column_for(Role::Team), Some("Club"));
    assert_eq!(plan.column_for(Role::Rank), Some("#"));
    assert_eq!(plan.column_for(Role::Delta), None);
}

#[test]
fn power_ranking_single_column_falls_back_to_heuristic() {
    let raw = hs(&["team"]);
    let plan = plan_columns(View::PowerRanking, &raw);
    assert_eq!(plan.columns.len(), 1);
    assert_eq!(plan.columns[0].label, "Rank");
    assert_eq!(plan.column_for(Role::Team), Some("team"));
}

#[test]
fn power_ranking_plus_prefers_delta_header() {
    let raw = hs(&["Rank", "Team", "Score", "Trend", "Delta Rank"]);
    let plan = plan_columns(View::PowerRankingPlus, &raw);
    assert_eq!(headers(&plan), vec!["Rank", "Team", "Score", "Delta Rank"]);
    assert_eq!(labels(&plan), vec!["Rank", "Team", "Score", "Delta"]);
    assert_eq!(plan.column_for(Role::Delta), Some("Delta Rank"));
}

#[test]
fn power_ranking_plus_exact_delta_beats_partial() {
    let raw = hs(&["Rank", "Team", "Score", "delta_prev", "DELTA"]);
    let plan = plan_columns(View::PowerRankingPlus, &raw);
    assert_eq!(plan.column_for(Role::Delta), Some("DELTA"));
}

#[test]
fn power_ranking_plus_falls_back_to_fourth_column() {
    let raw = hs(&["Rank", "Team", "Score", "Change", "Notes"]);
    let plan = plan_columns(View::PowerRankingPlus, &raw);
    assert_eq!(plan.column_for(Role::Delta), Some("Change"));
    assert_eq!(plan.label_for("Change"), Some("Delta"));
}

#[test]
fn power_ranking_plus_without_fourth_column_omits_delta() {
    let raw = hs(&["Rank", "Team", "Score"]);
    let plan = plan_columns(View::PowerRankingPlus, &raw);
    assert_eq!(plan.columns.len(), 3);
    assert_eq!(plan.column_for(Role::Delta), None);
}

#[test]
fn matchups_resolve_by_keyword() {
    let raw = hs(&["Away Team", "Score", "Home Team", "Proj"]);
    let plan = plan_columns(View::Matchups, &raw);
    assert_eq!(headers(&plan), vec!["Away Team", "Score", "Home Team", "Proj"]);
    assert_eq!(labels(&plan), vec!["Away", "Score", "Home", "Projection"]);
    assert_eq!(plan.column_for(Role::Away), Some("Away Team"));
    assert_eq!(plan.column_for(Role::Home), Some("Home Team"));
}

#[test]
fn matchups_reorder_into_role_order() {
    let raw = hs(&["Week", "host", "visitor", "projected", "result"]);
    let plan = plan_columns(View::Matchups, &raw);
    assert_eq!(headers(&plan), vec!["visitor", "result", "host", "projected"]);
}

#[test]
fn matchups_exact_match_wins_over_substring() {
    // "proj_score" contains "score" but is an exact projection keyword.
    let raw = hs(&["away", "proj_score", "home", "Current Score"]);
    let plan = plan_columns(View::Matchups, &raw);
    assert_eq!(plan.label_for("proj_score"), Some("Projection"));
    assert_eq!(plan.label_for("Current Score"), Some("Score"));
}

#[test]
fn matchups_fall_back_to_first_four() {
    let raw = hs(&["A", "B", "C", "D", "E"]);
    let plan = plan_columns(View::Matchups, &raw);
    assert_eq!(headers(&plan), vec!["A", "B", "C", "D"]);
    assert_eq!(labels(&plan), vec!["Away", "Score", "Home", "Projection"]);
    assert_eq!(plan.column_for(Role::Away), Some("A"));
    assert_eq!(plan.column_for(Role::Home), Some("C"));
}

#[test]
fn matchups_partial_resolution_keeps_only_found_roles() {
    let raw = hs(&["Visitor", "Host", "Kickoff"]);
    let plan = plan_columns(View::Matchups, &raw);
    assert_eq!(labels(&plan), vec!["Away", "Home"]);
}

#[test]
fn team_heuristic_prefers_listed_names() {
    assert_eq!(guess_team_column(&hs(&["My Team", "team_sorted"])), Some("team_sorted"));
    assert_eq!(guess_team_column(&hs(&["Rank", "TeamX"])), Some("TeamX"));
    assert_eq!(guess_team_column(&hs(&["Rank", "Club"])), None);
}

#[test]
fn passthrough_keeps_every_header() {
    let raw = hs(&["Rank", "Teamname", "Pts"]);
    let plan = plan_passthrough(&raw);
    assert_eq!(headers(&plan), vec!["Rank", "Teamname", "Pts"]);
    assert_eq!(labels(&plan), vec!["Rank", "Teamname", "Pts"]);
    assert_eq!(plan.column_for(Role::Team), Some("Teamname"));
}

#[test]
fn bound_roles_always_reference_selected_headers() {
    let sheets = [
        hs(&["a", "b"]),
        hs(&["Away Team", "Score", "Home Team", "Proj"]),
        (1..=15).map(|i| format!("h{i}")).collect(),
    ];
    for raw in &sheets {
        for view in View::ALL {
            let plan = plan_columns(view, raw);
            for col in &plan.columns {
                assert!(raw.contains(&col.header));
            }
            let mut seen: Vec<&str> = plan.headers().collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), plan.columns.len(), "no header used twice");
        }
    }
}

#[test]
fn empty_header_set_yields_empty_plan() {
    for view in View::ALL {
        assert!(plan_columns(view, &[]).is_empty());
    }
}
