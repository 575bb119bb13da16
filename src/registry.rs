//! Service registries
//!
//! Each kind of service (shorteners, uploaders) is kept as an ordered JSON
//! array on disk. The orchestration core never touches these files; it only
//! receives the snapshot returned by [`ServiceRegistry::list_active`].

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config_utils::{self, StoreError};
use crate::types::{ServiceEntry, ServiceStatus};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid {kind} index {index}")]
    InvalidIndex { kind: &'static str, index: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read side of a registry, as seen by an orchestration run
pub trait ServiceRegistry<T> {
    /// Active entries, in registration order
    fn list_active(&self) -> Result<Vec<T>, RegistryError>;
}

/// A plain list works as a registry, which keeps runs easy to set up in tests
impl<T: ServiceEntry + Clone> ServiceRegistry<T> for Vec<T> {
    fn list_active(&self) -> Result<Vec<T>, RegistryError> {
        Ok(self.iter().filter(|entry| entry.is_active()).cloned().collect())
    }
}

/// Registry persisted as a JSON array file
pub struct JsonRegistry<T> {
    path: PathBuf,
    _entry: PhantomData<T>,
}

impl<T> JsonRegistry<T>
where
    T: ServiceEntry + Serialize + DeserializeOwned + Clone,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entry: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, active or paused. An unparseable file reads as empty.
    pub fn load(&self) -> Result<Vec<T>, RegistryError> {
        Ok(config_utils::load_json_or_default(&self.path)?)
    }

    /// Entries for a read-modify-write; an unparseable file is an error
    fn load_for_update(&self) -> Result<Vec<T>, RegistryError> {
        Ok(config_utils::load_json(&self.path)?)
    }

    fn save(&self, entries: &[T]) -> Result<(), RegistryError> {
        Ok(config_utils::save_json_atomic(&self.path, &entries)?)
    }

    /// Append a new entry
    pub fn add(&self, entry: T) -> Result<(), RegistryError> {
        let mut entries = self.load_for_update()?;
        tracing::info!(kind = T::KIND, name = entry.name(), "registering service");
        entries.push(entry);
        self.save(&entries)
    }

    /// Flip the entry at the 1-based `index` between active and paused
    pub fn toggle(&self, index: usize) -> Result<T, RegistryError> {
        let mut entries = self.load_for_update()?;
        let slot = position(index, entries.len()).ok_or(RegistryError::InvalidIndex {
            kind: T::KIND,
            index,
        })?;

        let entry = &mut entries[slot];
        let status = entry.status().toggled();
        entry.set_status(status);
        let updated = entry.clone();

        self.save(&entries)?;
        tracing::info!(kind = T::KIND, name = updated.name(), status = status.label(), "service toggled");
        Ok(updated)
    }

    /// Remove the entry at the 1-based `index`
    pub fn remove(&self, index: usize) -> Result<T, RegistryError> {
        let mut entries = self.load_for_update()?;
        let slot = position(index, entries.len()).ok_or(RegistryError::InvalidIndex {
            kind: T::KIND,
            index,
        })?;

        let removed = entries.remove(slot);
        self.save(&entries)?;
        tracing::info!(kind = T::KIND, name = removed.name(), "service removed");
        Ok(removed)
    }

    /// Numbered listing for display
    pub fn listing(&self) -> Result<String, RegistryError> {
        Ok(render_listing(&self.load()?))
    }
}

impl<T> ServiceRegistry<T> for JsonRegistry<T>
where
    T: ServiceEntry + Serialize + DeserializeOwned + Clone,
{
    fn list_active(&self) -> Result<Vec<T>, RegistryError> {
        Ok(self.load()?.into_iter().filter(|entry| entry.is_active()).collect())
    }
}

fn position(index: usize, len: usize) -> Option<usize> {
    (1..=len).contains(&index).then(|| index - 1)
}

/// Render entries as `1. Name (Active)` lines, or an empty-state hint
pub fn render_listing<T: ServiceEntry>(entries: &[T]) -> String {
    if entries.is_empty() {
        return format!(
            "No {kind}s configured yet.\nUse `{kind} add` to add one.",
            kind = T::KIND
        );
    }

    let mut result = format!("{}s:\n", capitalize(T::KIND));
    for (i, entry) in entries.iter().enumerate() {
        result.push_str(&format!("{}. {} ({})\n", i + 1, entry.name(), entry.status().label()));
    }
    result
}

/// Message shown after a successful toggle
pub fn toggle_message<T: ServiceEntry>(entry: &T) -> String {
    let verb = match entry.status() {
        ServiceStatus::Active => "resumed",
        ServiceStatus::Paused => "paused",
    };
    format!("{} '{}' {}.", capitalize(T::KIND), entry.name(), verb)
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ShortenerConfig, UploaderConfig};
    use std::fs;
    use tempfile::TempDir;

    fn shortener_registry(dir: &TempDir) -> JsonRegistry<ShortenerConfig> {
        JsonRegistry::new(dir.path().join("shorteners.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let registry = shortener_registry(&temp_dir);

        assert!(registry.load().unwrap().is_empty());
        assert!(registry.list_active().unwrap().is_empty());
    }

    #[test]
    fn test_add_persists_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let registry = shortener_registry(&temp_dir);

        registry.add(ShortenerConfig::new("GPLinks", "https://gplinks.in/api?api=", "k1")).unwrap();
        registry.add(ShortenerConfig::new("ShrinkMe", "https://shrinkme.io/api?api=", "k2")).unwrap();

        let reloaded = shortener_registry(&temp_dir).load().unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].name, "GPLinks");
        assert_eq!(reloaded[1].name, "ShrinkMe");
    }

    #[test]
    fn test_toggle_filters_active_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let registry = shortener_registry(&temp_dir);
        registry.add(ShortenerConfig::new("A", "https://a/?k=", "1")).unwrap();
        registry.add(ShortenerConfig::new("B", "https://b/?k=", "2")).unwrap();
        registry.add(ShortenerConfig::new("C", "https://c/?k=", "3")).unwrap();

        let paused = registry.toggle(2).unwrap();
        assert_eq!(paused.status, ServiceStatus::Paused);
        assert_eq!(toggle_message(&paused), "Shortener 'B' paused.");

        let active: Vec<String> = registry.list_active().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(active, vec!["A", "C"]);

        let resumed = registry.toggle(2).unwrap();
        assert_eq!(toggle_message(&resumed), "Shortener 'B' resumed.");
        assert_eq!(registry.list_active().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_index() {
        let temp_dir = TempDir::new().unwrap();
        let registry = shortener_registry(&temp_dir);
        registry.add(ShortenerConfig::new("A", "https://a/?k=", "1")).unwrap();

        assert!(matches!(registry.toggle(0), Err(RegistryError::InvalidIndex { index: 0, .. })));
        assert!(matches!(registry.remove(2), Err(RegistryError::InvalidIndex { index: 2, .. })));

        let err = registry.remove(5).unwrap_err();
        assert_eq!(err.to_string(), "invalid shortener index 5");
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let registry: JsonRegistry<UploaderConfig> = JsonRegistry::new(temp_dir.path().join("uploads.json"));
        registry.add(UploaderConfig::new("FilePress", "https://fp/api", "k")).unwrap();
        registry.add(UploaderConfig::new("GDToT", "https://gd/api", "k")).unwrap();

        let removed = registry.remove(1).unwrap();
        assert_eq!(removed.name, "FilePress");

        let remaining = registry.load().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "GDToT");
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let registry = shortener_registry(&temp_dir);
        fs::write(registry.path(), "[{\"name\": ").unwrap();

        assert!(registry.load().unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_file_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let registry = shortener_registry(&temp_dir);
        let contents = r#"[{"name": "A", "base": "https://a/?k=", "status": "active"}]"#;
        fs::write(registry.path(), contents).unwrap();

        let err = registry.add(ShortenerConfig::new("C", "https://c/?k=", "3")).unwrap_err();
        assert!(matches!(err, RegistryError::Store(StoreError::Parse { .. })));
        assert!(matches!(registry.toggle(1), Err(RegistryError::Store(StoreError::Parse { .. }))));
        assert!(matches!(registry.remove(1), Err(RegistryError::Store(StoreError::Parse { .. }))));

        assert_eq!(fs::read_to_string(registry.path()).unwrap(), contents);
    }

    #[test]
    fn test_hand_edited_status_keeps_entries() {
        let temp_dir = TempDir::new().unwrap();
        let registry = shortener_registry(&temp_dir);
        fs::write(
            registry.path(),
            r#"[
                {"name": "A", "base": "https://a/?k=", "api": "1", "status": "active"},
                {"name": "B", "base": "https://b/?k=", "api": "2", "status": "Active"}
            ]"#,
        )
        .unwrap();

        registry.add(ShortenerConfig::new("C", "https://c/?k=", "3")).unwrap();

        let names: Vec<String> = registry.load().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        let active: Vec<String> = registry.list_active().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(active, vec!["A", "C"]);
    }

    #[test]
    fn test_loads_existing_registry_file() {
        let temp_dir = TempDir::new().unwrap();
        let registry: JsonRegistry<UploaderConfig> = JsonRegistry::new(temp_dir.path().join("uploads.json"));
        fs::write(
            registry.path(),
            r#"[
                {"name": "FilePress", "endpoint": "https://filepress.in/api/upload", "api": "k", "status": "active"},
                {"name": "Paused", "endpoint": "https://p/api", "api": "k", "status": "paused"}
            ]"#,
        )
        .unwrap();

        let active = registry.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].endpoint, "https://filepress.in/api/upload");
    }

    #[test]
    fn test_render_listing() {
        let empty: Vec<UploaderConfig> = vec![];
        assert_eq!(
            render_listing(&empty),
            "No uploaders configured yet.\nUse `uploader add` to add one."
        );

        let mut paused = ShortenerConfig::new("B", "https://b/?k=", "2");
        paused.status = ServiceStatus::Paused;
        let entries = vec![ShortenerConfig::new("A", "https://a/?k=", "1"), paused];
        assert_eq!(render_listing(&entries), "Shorteners:\n1. A (Active)\n2. B (Paused)\n");
    }

    #[test]
    fn test_vec_registry_filters_paused() {
        let mut paused = UploaderConfig::new("Off", "https://off", "k");
        paused.status = ServiceStatus::Paused;
        let registry = vec![UploaderConfig::new("On", "https://on", "k"), paused];

        let active = registry.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "On");
    }
}
