//! Mapping documents (statistics, site settings), export/import and backups.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::collections::{self, BACKUP_PREFIX, SITE_SETTINGS, STATISTICS};
use super::error::RepositoryError;
use super::repository::CollectionRepository;
use crate::record::{self, Record};
use crate::store::{Store, StoreError};

/// How `update_statistic` combines the new value with the stored one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatOp {
    #[default]
    Set,
    Increment,
    Decrement,
}

impl FromStr for StatOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(StatOp::Set),
            "increment" => Ok(StatOp::Increment),
            "decrement" => Ok(StatOp::Decrement),
            other => Err(format!("unknown statistic operation: {}", other)),
        }
    }
}

/// Full snapshot of every collection and document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    pub data: BTreeMap<String, Value>,
    pub exported_at: String,
    pub version: String,
}

/// A stored backup snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    pub key: String,
    pub timestamp: String,
    pub size: usize,
}

fn default_statistics() -> Value {
    json!({
        "trees_planted": 50000,
        "people_reached": 100000,
        "projects_completed": 150,
        "volunteers": 5000,
        "donations_total": 250000,
        "newsletter_subscribers": 12000,
        "years_active": 15
    })
}

fn default_site_settings() -> Value {
    json!({
        "site_name": "Jivan-Jyoti Foundation",
        "contact_email": "contact@jivanjyoti.org",
        "contact_phone": "+1-555-0123",
        "address": "123 Green Street, Eco City, EC 12345",
        "social_media": {
            "facebook": "https://facebook.com/jivanjyoti",
            "twitter": "https://twitter.com/jivanjyoti",
            "instagram": "https://instagram.com/jivanjyoti",
            "linkedin": "https://linkedin.com/company/jivanjyoti"
        }
    })
}

impl<S: Store> CollectionRepository<S> {
    /// Seed empty collections and default documents that are not yet stored.
    pub fn initialize(&self) -> Result<(), RepositoryError> {
        for name in collections::ALL {
            let key = self.key(name);
            if self.store().get(&key)?.is_none() {
                self.store().set(&key, &Value::Array(Vec::new()))?;
            }
        }
        for (name, default) in [
            (STATISTICS, default_statistics()),
            (SITE_SETTINGS, default_site_settings()),
        ] {
            let key = self.key(name);
            if self.store().get(&key)?.is_none() {
                self.store().set(&key, &default)?;
            }
        }
        debug!(namespace = self.namespace(), "storage initialized");
        Ok(())
    }

    /// Load a mapping document. Absent documents are empty objects.
    pub fn document(&self, name: &str) -> Result<Map<String, Value>, RepositoryError> {
        match self.store().get(&self.key(name))? {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(RepositoryError::MalformedRecord(name.to_string())),
        }
    }

    pub fn set_document(
        &self,
        name: &str,
        document: Map<String, Value>,
    ) -> Result<Map<String, Value>, RepositoryError> {
        let _guard = self.locks.acquire(name)?;
        self.store()
            .set(&self.key(name), &Value::Object(document.clone()))?;
        Ok(document)
    }

    /// Shallow-merge `patch` into a mapping document.
    pub fn merge_document(
        &self,
        name: &str,
        patch: &Map<String, Value>,
    ) -> Result<Map<String, Value>, RepositoryError> {
        let _guard = self.locks.acquire(name)?;
        let mut document = self.document(name)?;
        for (key, value) in patch {
            document.insert(key.clone(), value.clone());
        }
        self.store()
            .set(&self.key(name), &Value::Object(document.clone()))?;
        Ok(document)
    }

    pub fn statistics(&self) -> Result<Map<String, Value>, RepositoryError> {
        self.document(STATISTICS)
    }

    /// Apply `op` to one metric. A missing metric counts as 0.
    pub fn update_statistic(
        &self,
        metric: &str,
        value: f64,
        op: StatOp,
    ) -> Result<Map<String, Value>, RepositoryError> {
        let _guard = self.locks.acquire(STATISTICS)?;
        let mut stats = self.document(STATISTICS)?;
        let current = stats.get(metric).and_then(record::as_number).unwrap_or(0.0);
        let next = match op {
            StatOp::Set => value,
            StatOp::Increment => current + value,
            StatOp::Decrement => current - value,
        };
        stats.insert(metric.to_string(), record::number_value(next));
        self.store()
            .set(&self.key(STATISTICS), &Value::Object(stats.clone()))?;
        debug!(metric, value = next, "statistic updated");
        Ok(stats)
    }

    /// Snapshot every collection and document.
    pub fn export(&self, version: &str) -> Result<Export, RepositoryError> {
        let mut data = BTreeMap::new();
        for name in collections::ALL.iter().chain(collections::DOCUMENTS.iter()) {
            let value = self.store().get(&self.key(name))?.unwrap_or(Value::Null);
            data.insert(name.to_string(), value);
        }
        Ok(Export {
            data,
            exported_at: record::timestamp(),
            version: version.to_string(),
        })
    }

    /// Overwrite each collection named in the export wholesale.
    ///
    /// Only known collections and documents may be named. Everything is
    /// validated before anything is written, so a malformed export leaves
    /// storage untouched.
    pub fn import(&self, export: &Export) -> Result<Vec<String>, RepositoryError> {
        let documents = collections::DOCUMENTS;
        for (name, value) in &export.data {
            if !collections::ALL.contains(&name.as_str()) && !documents.contains(&name.as_str()) {
                return Err(RepositoryError::InvalidImport(format!(
                    "unknown collection {}",
                    name
                )));
            }
            let ok = if documents.contains(&name.as_str()) {
                value.is_object() || value.is_null()
            } else {
                value.is_null()
                    || value
                        .as_array()
                        .map(|items| items.iter().all(Value::is_object))
                        .unwrap_or(false)
            };
            if !ok {
                return Err(RepositoryError::InvalidImport(format!(
                    "unexpected shape for {}",
                    name
                )));
            }
        }

        let mut imported = Vec::new();
        for (name, value) in &export.data {
            if value.is_null() {
                continue;
            }
            let _guard = self.locks.acquire(name)?;
            self.store().set(&self.key(name), value)?;
            imported.push(name.clone());
        }
        info!(collections = imported.len(), "data imported");
        Ok(imported)
    }

    /// Store a full export under `backup_<unix millis>` and return that key.
    pub fn create_backup(&self, version: &str) -> Result<String, RepositoryError> {
        let export = self.export(version)?;
        let value = serde_json::to_value(&export).map_err(StoreError::from)?;

        let mut millis = Utc::now().timestamp_millis();
        let key = loop {
            let candidate = format!("{}{}", BACKUP_PREFIX, millis);
            if self.store().get(&self.key(&candidate))?.is_none() {
                break candidate;
            }
            millis += 1;
        };

        self.store().set(&self.key(&key), &value)?;
        info!(backup = %key, "backup created");
        Ok(key)
    }

    /// Import a stored backup.
    pub fn restore_backup(&self, key: &str) -> Result<Vec<String>, RepositoryError> {
        let raw = self
            .store()
            .get(&self.key(key))?
            .ok_or_else(|| RepositoryError::BackupNotFound(key.to_string()))?;
        let export: Export = serde_json::from_value(raw)
            .map_err(|e| RepositoryError::InvalidImport(e.to_string()))?;
        self.import(&export)
    }

    /// Stored backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, RepositoryError> {
        let prefix = self.key(BACKUP_PREFIX);
        let mut backups = Vec::new();
        for full_key in self.store().keys()? {
            let Some(stamp) = full_key.strip_prefix(&prefix) else {
                continue;
            };
            let Ok(millis) = stamp.parse::<i64>() else {
                continue;
            };
            let timestamp = Utc
                .timestamp_millis_opt(millis)
                .single()
                .map(record::format_timestamp)
                .unwrap_or_default();
            let size = self.store().raw_len(&full_key)?.unwrap_or(0);
            backups.push((
                millis,
                BackupInfo {
                    key: format!("{}{}", BACKUP_PREFIX, stamp),
                    timestamp,
                    size,
                },
            ));
        }
        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, info)| info).collect())
    }

    /// Records of a collection as they would appear in an export.
    pub fn export_collection(&self, collection: &str) -> Result<Vec<Record>, RepositoryError> {
        self.load(collection)
    }
}
