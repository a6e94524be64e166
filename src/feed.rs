use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use anyhow::Result;
use tracing::{info, warn};

use crate::column_plan::View;
use crate::sheet_decode::Sheet;
use crate::sheet_fetch::load_sheet;
use crate::sources::SheetSources;
use crate::state::{Delta, LoadTicket, ProviderCommand};

/// Worker that loads sheets one at a time and reports back as deltas.
pub fn spawn_provider(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    sources: SheetSources,
) -> JoinHandle<()> {
    spawn_provider_with(tx, cmd_rx, move |view| load_sheet(&sources, view))
}

pub fn spawn_provider_with<F>(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    loader: F,
) -> JoinHandle<()>
where
    F: Fn(View) -> Result<Sheet> + Send + 'static,
{
    thread::spawn(move || {
        while let Ok(mut cmd) = cmd_rx.recv() {
            // Requests queued behind a slow fetch are already stale except the
            // last one.
            while let Ok(next) = cmd_rx.try_recv() {
                cmd = next;
            }
            let ProviderCommand::Load(ticket) = cmd;
            if tx.send(run_load(&loader, ticket)).is_err() {
                break;
            }
        }
    })
}

/// Execute one load and turn the outcome into a delta for `ticket`.
pub fn run_load<F>(loader: &F, ticket: LoadTicket) -> Delta
where
    F: Fn(View) -> Result<Sheet>,
{
    match loader(ticket.view) {
        Ok(sheet) => {
            info!(view = ticket.view.key(), rows = sheet.rows.len(), "load finished");
            Delta::SheetLoaded { ticket, sheet }
        }
        Err(err) => {
            warn!(view = ticket.view.key(), "load failed: {err:#}");
            Delta::LoadFailed {
                ticket,
                error: format!("{err:#}"),
            }
        }
    }
}
