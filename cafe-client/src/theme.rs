// cafe-client/src/theme.rs
// 主题状态 - 单一数据源，订阅者通过 watch 通道同步

use tokio::sync::watch;

use crate::ClientResult;
use crate::storage::LocalStorage;

pub const THEME_KEY: &str = "isDarkTheme";
/// Older builds wrote this key; read once, removed on the next write
pub const LEGACY_THEME_KEY: &str = "darkMode";

/// Shared dark/light theme state
///
/// Every receiver from [`ThemeStore::subscribe`] sees a change as soon as
/// `set`/`toggle` returns.
#[derive(Debug)]
pub struct ThemeStore {
    tx: watch::Sender<bool>,
    storage: LocalStorage,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl ThemeStore {
    /// Load the persisted theme (light when nothing is stored)
    pub fn load(storage: LocalStorage) -> Self {
        let is_dark = storage
            .get(THEME_KEY)
            .and_then(|v| parse_flag(&v))
            .or_else(|| storage.get(LEGACY_THEME_KEY).and_then(|v| parse_flag(&v)))
            .unwrap_or(false);
        let (tx, _) = watch::channel(is_dark);
        Self { tx, storage }
    }

    pub fn is_dark(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Persist, then notify; a failed write changes nothing
    pub fn set(&self, is_dark: bool) -> ClientResult<()> {
        self.storage
            .set(THEME_KEY, if is_dark { "true" } else { "false" })?;
        if let Err(e) = self.storage.remove(LEGACY_THEME_KEY) {
            tracing::warn!(error = %e, "Could not remove legacy theme key");
        }
        self.tx.send_replace(is_dark);
        tracing::debug!(is_dark, "Theme changed");
        Ok(())
    }

    /// Flip the theme, returning the new value
    pub fn toggle(&self) -> ClientResult<bool> {
        let is_dark = !self.is_dark();
        self.set(is_dark)?;
        Ok(is_dark)
    }
}
