//! Persisted display theme preference.

use std::sync::Arc;

use tracing::warn;

use airsight_types::ThemePreference;

use crate::traits::KeyValueStore;

/// Storage key for the theme preference.
pub const THEME_KEY: &str = "airsight.theme";

/// Persisted single-value theme preference.
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

impl PreferenceStore {
    /// Create a preference store over a key-value backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the theme, defaulting to [`ThemePreference::Dark`] when unset or
    /// unreadable.
    pub async fn load(&self) -> ThemePreference {
        match self.store.get(THEME_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring stored theme");
                ThemePreference::default()
            }),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read theme preference");
                ThemePreference::default()
            }
        }
    }

    /// Persist the theme. Failures are logged and swallowed.
    pub async fn set(&self, theme: ThemePreference) {
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()).await {
            warn!(error = %e, %theme, "Failed to persist theme preference");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemoryStore;

    #[tokio::test]
    async fn test_default_is_dark() {
        let prefs = PreferenceStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(prefs.load().await, ThemePreference::Dark);
    }

    #[tokio::test]
    async fn test_set_then_load() {
        let store = Arc::new(MemoryStore::new());
        let prefs = PreferenceStore::new(store.clone());
        prefs.set(ThemePreference::Light).await;
        assert_eq!(store.value(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(PreferenceStore::new(store).load().await, ThemePreference::Light);
    }

    #[tokio::test]
    async fn test_garbage_value_is_dark() {
        let store = Arc::new(MemoryStore::new());
        store.insert(THEME_KEY, "neon");
        let prefs = PreferenceStore::new(store);
        assert_eq!(prefs.load().await, ThemePreference::Dark);
    }

    #[tokio::test]
    async fn test_set_failure_is_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.set_should_fail(true);
        let prefs = PreferenceStore::new(store.clone());
        prefs.set(ThemePreference::Light).await;
        store.set_should_fail(false);
        assert_eq!(prefs.load().await, ThemePreference::Dark);
    }
}
