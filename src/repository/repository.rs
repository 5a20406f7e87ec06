use serde_json::{Map, Value};
use tracing::debug;

use super::error::RepositoryError;
use super::lock::CollectionLocks;
use super::query::{self, Page, PageRequest, SortDirection};
use crate::record::Record;
use crate::store::Store;

/// Generic CRUD and query operations over named JSON collections.
///
/// Generic over `S`, the store backing it. Reads take no lock; every write
/// runs its full read-modify-write under the collection's lock via
/// [`transact`](Self::transact).
pub struct CollectionRepository<S> {
    store: S,
    namespace: String,
    pub(super) locks: CollectionLocks,
}

impl<S: Store> CollectionRepository<S> {
    /// Create a repository whose keys are `namespace + collection`.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            locks: CollectionLocks::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn key(&self, name: &str) -> String {
        format!("{}{}", self.namespace, name)
    }

    /// Load a collection. An absent collection is empty.
    pub fn load(&self, collection: &str) -> Result<Vec<Record>, RepositoryError> {
        match self.store.get(&self.key(collection))? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| {
                    Record::from_value(item)
                        .ok_or_else(|| RepositoryError::MalformedRecord(collection.to_string()))
                })
                .collect(),
            Some(_) => Err(RepositoryError::NotACollection(collection.to_string())),
        }
    }

    fn persist(&self, collection: &str, records: &[Record]) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(records).map_err(crate::store::StoreError::from)?;
        self.store.set(&self.key(collection), &value)?;
        debug!(collection, count = records.len(), "collection persisted");
        Ok(())
    }

    /// Run `f` over the collection under its write lock.
    ///
    /// The collection is stored back only if `f` succeeds, so a rejected
    /// operation leaves storage untouched.
    pub fn transact<T, E, F>(&self, collection: &str, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Vec<Record>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let _guard = self.locks.acquire(collection)?;
        let mut records = self.load(collection)?;
        let result = f(&mut records)?;
        self.persist(collection, &records)?;
        Ok(result)
    }

    /// Overwrite a collection wholesale.
    pub fn replace(&self, collection: &str, records: &[Record]) -> Result<(), RepositoryError> {
        let _guard = self.locks.acquire(collection)?;
        self.persist(collection, records)
    }

    /// Append a new record with a fresh id and timestamps.
    pub fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, RepositoryError> {
        self.transact(collection, |records| {
            let record = Record::stamped(fields);
            records.push(record.clone());
            debug!(collection, id = record.id(), "record created");
            Ok::<_, RepositoryError>(record)
        })
    }

    /// Fetch one record by id.
    pub fn read(&self, collection: &str, id: &str) -> Result<Option<Record>, RepositoryError> {
        Ok(self.load(collection)?.into_iter().find(|r| r.id() == id))
    }

    /// Fetch one record by id, failing with `NotFound` when absent.
    pub fn get(&self, collection: &str, id: &str) -> Result<Record, RepositoryError> {
        self.read(collection, id)?
            .ok_or_else(|| RepositoryError::not_found(collection, id))
    }

    /// Fetch every record in insertion order.
    pub fn read_all(&self, collection: &str) -> Result<Vec<Record>, RepositoryError> {
        self.load(collection)
    }

    /// Shallow-merge `patch` over the record with `id`.
    pub fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<Record, RepositoryError> {
        self.transact(collection, |records| {
            let record = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| RepositoryError::not_found(collection, id))?;
            record.merge(patch);
            debug!(collection, id, "record updated");
            Ok(record.clone())
        })
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete(&self, collection: &str, id: &str) -> Result<bool, RepositoryError> {
        self.transact(collection, |records| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            let removed = records.len() < before;
            debug!(collection, id, removed, "record delete");
            Ok::<_, RepositoryError>(removed)
        })
    }

    /// Case-insensitive substring search, order preserved.
    pub fn search(
        &self,
        collection: &str,
        query: &str,
        fields: &[&str],
    ) -> Result<Vec<Record>, RepositoryError> {
        let needle = query.to_lowercase();
        Ok(self
            .load(collection)?
            .into_iter()
            .filter(|r| query::matches_query(r, &needle, fields))
            .collect())
    }

    /// Records satisfying `predicate`, order preserved.
    pub fn filter<F>(&self, collection: &str, predicate: F) -> Result<Vec<Record>, RepositoryError>
    where
        F: Fn(&Record) -> bool,
    {
        Ok(self
            .load(collection)?
            .into_iter()
            .filter(|r| predicate(r))
            .collect())
    }

    /// First record satisfying `predicate`.
    pub fn find_one<F>(
        &self,
        collection: &str,
        predicate: F,
    ) -> Result<Option<Record>, RepositoryError>
    where
        F: Fn(&Record) -> bool,
    {
        Ok(self.load(collection)?.into_iter().find(|r| predicate(r)))
    }

    pub fn count<F>(&self, collection: &str, predicate: F) -> Result<usize, RepositoryError>
    where
        F: Fn(&Record) -> bool,
    {
        Ok(self.load(collection)?.iter().filter(|r| predicate(r)).count())
    }

    /// All records ordered by `field`.
    pub fn sort(
        &self,
        collection: &str,
        field: &str,
        direction: SortDirection,
    ) -> Result<Vec<Record>, RepositoryError> {
        let mut records = self.load(collection)?;
        query::sort_records(&mut records, field, direction);
        Ok(records)
    }

    /// Sort, then slice out one page.
    pub fn paginate(
        &self,
        collection: &str,
        request: &PageRequest,
    ) -> Result<Page, RepositoryError> {
        let sorted = self.sort(collection, &request.sort_field, request.direction)?;
        Ok(query::paginate(sorted, request.page, request.per_page))
    }
}
