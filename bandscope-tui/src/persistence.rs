//! UI state persistence: JSON save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_file: Option<PathBuf>,
    pub active_panel: Panel,
    pub welcome_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            last_file: None,
            active_panel: Panel::Data,
            welcome_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_file: app.file_path.clone(),
        active_panel: app.active_panel,
        welcome_dismissed: app.welcome_dismissed || app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state. The last file is reopened when it still exists.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    app.welcome_dismissed = state.welcome_dismissed;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
    if let Some(path) = state.last_file.filter(|p| p.is_file()) {
        app.open_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            last_file: Some(PathBuf::from("/data/valuations.csv")),
            active_panel: Panel::Category,
            welcome_dismissed: true,
        };
        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.last_file, state.last_file);
        assert_eq!(loaded.active_panel, Panel::Category);
        assert!(loaded.welcome_dismissed);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert!(loaded.last_file.is_none());
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load(&path).active_panel, Panel::Data);
    }

    #[test]
    fn apply_shows_welcome_until_dismissed() {
        let mut app = AppState::default();
        apply(&mut app, PersistedState::default());
        assert_eq!(app.overlay, Overlay::Welcome);
        assert!(!extract(&app).welcome_dismissed);

        app.overlay = Overlay::None;
        assert!(extract(&app).welcome_dismissed);
    }

    #[test]
    fn apply_reopens_existing_last_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("v.csv");
        std::fs::write(&csv, "Year,Symbol,Cheap,Fair,Expensive,Close\n2023,AAPL,1,2,3,2\n").unwrap();

        let mut app = AppState::default();
        apply(
            &mut app,
            PersistedState {
                last_file: Some(csv.clone()),
                active_panel: Panel::Stock,
                welcome_dismissed: true,
            },
        );
        assert_eq!(app.active_panel, Panel::Stock);
        assert!(app.table().is_some());
        assert_eq!(extract(&app).last_file, Some(csv));
    }

    #[test]
    fn apply_skips_vanished_last_file() {
        let mut app = AppState::default();
        apply(
            &mut app,
            PersistedState {
                last_file: Some(PathBuf::from("/nonexistent/v.csv")),
                active_panel: Panel::Data,
                welcome_dismissed: true,
            },
        );
        assert!(app.outcome.is_none());
        assert!(app.error_history.is_empty());
    }
}
