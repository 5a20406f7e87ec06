use serde_json::{Map, Value};
use tracing::info;

use super::error::DomainError;
use super::outcome::Outcome;
use super::Foundation;
use crate::repository::collections::SITE_SETTINGS;
use crate::repository::{BackupInfo, Export};
use crate::store::Store;

impl<S: Store> Foundation<S> {
    pub fn export_data(&self) -> Result<Export, DomainError> {
        Ok(self.repo().export(&self.export_version)?)
    }

    /// Replace every collection named in `export`.
    pub fn import_data(&self, export: &Export) -> Result<Outcome<Vec<String>>, DomainError> {
        let imported = self.repo().import(export)?;
        Ok(Outcome::new("Data imported successfully", imported))
    }

    pub fn create_backup(&self) -> Result<Outcome<String>, DomainError> {
        let key = self.repo().create_backup(&self.export_version)?;
        Ok(Outcome::new("Backup created successfully", key))
    }

    pub fn restore_backup(&self, key: &str) -> Result<Outcome<Vec<String>>, DomainError> {
        let restored = self.repo().restore_backup(key)?;
        info!(backup = key, "backup restored");
        Ok(Outcome::new("Backup restored successfully", restored))
    }

    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, DomainError> {
        Ok(self.repo().list_backups()?)
    }

    pub fn site_settings(&self) -> Result<Map<String, Value>, DomainError> {
        Ok(self.repo().document(SITE_SETTINGS)?)
    }

    /// Shallow-merge `patch` into the site settings.
    pub fn update_site_settings(
        &self,
        patch: &Map<String, Value>,
    ) -> Result<Outcome<Map<String, Value>>, DomainError> {
        let settings = self.repo().merge_document(SITE_SETTINGS, patch)?;
        Ok(Outcome::new("Settings updated successfully", settings))
    }
}
