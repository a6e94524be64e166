use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA, USER_AGENT};
use tracing::{info, warn};

use crate::column_plan::View;
use crate::http_client::http_client;
use crate::sheet_decode::{Sheet, decode_sheet};
use crate::sources::SheetSources;

/// GET a published sheet export as text. Non-success statuses are errors.
pub fn fetch_sheet_text(client: &Client, url: &str) -> Result<String> {
    // Published exports are edited live; never serve an intermediate cache copy.
    let resp = client
        .get(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .header(CACHE_CONTROL, "no-store")
        .header(PRAGMA, "no-cache")
        .send()
        .context("request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!(
            "http {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        ));
    }
    resp.text().context("failed reading body")
}

/// Fetch and decode the sheet behind `view`. Decode warnings are logged and
/// left on the returned sheet.
pub fn load_sheet(sources: &SheetSources, view: View) -> Result<Sheet> {
    let url = sources
        .url(view)
        .with_context(|| format!("no source configured for {}", view.key()))?;
    let client = http_client()?;

    info!(view = view.key(), "fetching sheet");
    let text = fetch_sheet_text(client, url)
        .with_context(|| format!("fetch failed for {}", view.title()))?;
    let sheet = decode_sheet(&text);
    for w in &sheet.warnings {
        warn!(view = view.key(), line = w.line, kind = ?w.kind, "{}", w.message);
    }
    info!(view = view.key(), rows = sheet.rows.len(), "sheet decoded");
    Ok(sheet)
}
