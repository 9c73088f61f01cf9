//! File watching for `brewview watch`
//!
//! The parent directory is watched rather than the file itself: most editors
//! save by writing a new file and renaming it over the old one, which drops
//! a watch held on the original inode.

use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Quiet period that collapses the burst of events one save produces
const SETTLE: Duration = Duration::from_millis(75);

/// Block until the watch ends, calling `on_change` after each save of `file`.
///
/// An error from `on_change` stops the watch and is returned.
pub fn watch_file<F, E>(file: &Path, on_change: F) -> Result<(), E>
where
    F: FnMut() -> Result<(), E>,
    E: From<notify::Error>,
{
    let file_name = file
        .file_name()
        .ok_or_else(|| notify::Error::generic("watched path has no file name"))?
        .to_os_string();
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = tx.send(res);
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %file.display(), "Watching for changes");

    dispatch_events(&rx, &file_name, on_change)
}

/// Collapse each burst of events on `rx` into one `on_change` call.
/// Returns when the channel closes or `on_change` fails.
fn dispatch_events<F, E>(
    rx: &Receiver<notify::Result<Event>>,
    file_name: &OsStr,
    mut on_change: F,
) -> Result<(), E>
where
    F: FnMut() -> Result<(), E>,
{
    while let Ok(res) = rx.recv() {
        let mut changed = is_relevant(res, file_name);
        while let Ok(res) = rx.recv_timeout(SETTLE) {
            changed |= is_relevant(res, file_name);
        }
        if changed {
            on_change()?;
        }
    }
    Ok(())
}

fn is_relevant(res: Result<Event, notify::Error>, file_name: &OsStr) -> bool {
    match res {
        Ok(event) => touches_file(&event, file_name),
        Err(err) => {
            tracing::warn!(error = %err, "File watch error");
            false
        }
    }
}

/// Whether `event` created or modified the file named `file_name`
pub fn touches_file(event: &Event, file_name: &OsStr) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name))
}
