//! Configuration file watcher for hot reload.
//!
//! Editors often emit several events per save; each event re-reads the
//! file, and a configuration equal to the last one delivered is dropped.
//! Files that fail to load or validate are logged and skipped, so the
//! running service keeps its previous configuration.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AgentConfig;

/// Watches one configuration file and emits validated updates.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AgentConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AgentConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching in notify's background thread.
    ///
    /// The returned watcher must be kept alive for events to flow.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let reload_path = path.clone();
        // Serialized TOML of the last configuration sent.
        let last_sent: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_content_change(&event.kind) => {
                    reload(&reload_path, &update_tx, &last_sent);
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}

fn reload(
    path: &Path,
    update_tx: &mpsc::UnboundedSender<AgentConfig>,
    last_sent: &Mutex<Option<String>>,
) {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Config reload rejected; keeping current configuration"
            );
            return;
        }
    };

    let fingerprint = toml::to_string(&config).ok();
    if let Ok(mut last) = last_sent.lock() {
        if fingerprint.is_some() && *last == fingerprint {
            tracing::debug!("Config unchanged; reload skipped");
            return;
        }
        *last = fingerprint;
    }

    tracing::info!(
        path = %path.display(),
        role = %config.service.role,
        "Config file change detected"
    );
    let _ = update_tx.send(config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_fails_to_watch() {
        let (watcher, _rx) = ConfigWatcher::new(Path::new("/definitely/not/here.toml"));
        assert!(watcher.run().is_err());
    }

    #[test]
    fn test_reload_sends_valid_and_skips_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nrole = \"ia\"").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let last = Mutex::new(None);

        reload(file.path(), &tx, &last);
        reload(file.path(), &tx, &last);

        let update = rx.try_recv().unwrap();
        assert_eq!(update.service.role, crate::config::Role::Ia);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reload_ignores_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[auth]\ntoken = \"\"").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        reload(file.path(), &tx, &Mutex::new(None));
        assert!(rx.try_recv().is_err());
    }
}
