use super::Journal;
use async_trait::async_trait;
use chainscan_index::{
    BulkFailure, BulkItem, BulkOutcome, CreateOutcome, DEFAULT_SEARCH_SIZE, Hit, IndexError,
    IndexStore, RecordKind, SearchQuery, SortKey, SortOrder,
};
use serde_json::Value;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// An operation applied to the [`MemoryIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOp {
    /// A single create.
    Create(RecordKind, String),
    /// A bulk create with these ids.
    BulkCreate(RecordKind, Vec<String>),
    /// A bulk update with these ids.
    BulkUpdate(RecordKind, Vec<String>),
    /// A bulk delete with these ids.
    BulkDelete(RecordKind, Vec<String>),
    /// A search.
    Search(RecordKind),
    /// An index recreation.
    Recreate(RecordKind),
}

#[derive(Debug, Default)]
struct IndexState {
    documents: BTreeMap<RecordKind, BTreeMap<String, Value>>,
    ops: Vec<IndexOp>,
    faults: VecDeque<IndexError>,
    rejected: HashSet<String>,
    journal: Option<Journal>,
}

/// An in-memory [`IndexStore`] with Elasticsearch create, update and search semantics.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    state: Arc<Mutex<IndexState>>,
}

impl MemoryIndex {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a journal that records every write.
    pub fn with_journal(self, journal: Journal) -> Self {
        self.lock().journal = Some(journal);
        self
    }

    fn lock(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a document directly.
    pub fn insert(&self, kind: RecordKind, id: impl Into<String>, document: Value) {
        self.lock().documents.entry(kind).or_default().insert(id.into(), document);
    }

    /// Returns the document `id` of `kind`.
    pub fn get(&self, kind: RecordKind, id: &str) -> Option<Value> {
        self.lock().documents.get(&kind).and_then(|docs| docs.get(id)).cloned()
    }

    /// Returns all documents of `kind` keyed by id.
    pub fn documents(&self, kind: RecordKind) -> BTreeMap<String, Value> {
        self.lock().documents.get(&kind).cloned().unwrap_or_default()
    }

    /// Returns every operation applied so far.
    pub fn ops(&self) -> Vec<IndexOp> {
        self.lock().ops.clone()
    }

    /// Counts the bulk creates issued for `kind`.
    pub fn bulk_creates(&self, kind: RecordKind) -> usize {
        self.lock().ops.iter().filter(|op| matches!(op, IndexOp::BulkCreate(k, _) if *k == kind)).count()
    }

    /// Fails the next operation with `err`.
    pub fn fail_next(&self, err: IndexError) {
        self.lock().faults.push_back(err);
    }

    /// Rejects every bulk item with this id.
    pub fn reject_id(&self, id: impl Into<String>) {
        self.lock().rejected.insert(id.into());
    }

    fn begin(&self, op: IndexOp) -> Result<MutexGuard<'_, IndexState>, IndexError> {
        let mut state = self.lock();
        if let Some(journal) = &state.journal {
            journal.record(match &op {
                IndexOp::Create(kind, id) => format!("index create {kind} {id}"),
                IndexOp::BulkCreate(kind, ids) => format!("index bulk create {kind} {}", ids.len()),
                IndexOp::BulkUpdate(kind, ids) => format!("index bulk update {kind} {}", ids.len()),
                IndexOp::BulkDelete(kind, ids) => format!("index bulk delete {kind} {}", ids.len()),
                IndexOp::Search(kind) => format!("index search {kind}"),
                IndexOp::Recreate(kind) => format!("index recreate {kind}"),
            });
        }
        state.ops.push(op);
        match state.faults.pop_front() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    fn bulk(
        &self,
        op: IndexOp,
        kind: RecordKind,
        items: Vec<BulkItem>,
        apply: impl Fn(&mut BTreeMap<String, Value>, BulkItem) -> Result<bool, (u16, String)>,
    ) -> Result<BulkOutcome, IndexError> {
        let mut state = self.begin(op)?;
        let rejected = state.rejected.clone();
        let documents = state.documents.entry(kind).or_default();

        let mut outcome = BulkOutcome::default();
        for item in items {
            if rejected.contains(&item.id) {
                outcome.failures.push(BulkFailure::new(item.id, 400, "rejected".into()));
                continue;
            }
            let id = item.id.clone();
            match apply(documents, item) {
                Ok(true) => outcome.succeeded += 1,
                Ok(false) => outcome.conflicts += 1,
                Err((status, reason)) => outcome.failures.push(BulkFailure::new(id, status, reason)),
            }
        }
        outcome.into_result()
    }
}

fn field_u64(document: &Value, field: &str) -> Option<u64> {
    document.get(field).and_then(Value::as_u64)
}

fn sort_value(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(f64::MIN)
}

/// Orders `document` against `other` by the query's sort keys. `other` yields the
/// value for the key at each position.
fn compare<'a>(
    document: &Value,
    sort: &[SortKey],
    mut other: impl FnMut(usize, &SortKey) -> Option<&'a Value>,
) -> Ordering {
    sort.iter().enumerate().fold(Ordering::Equal, |ordering, (position, key)| {
        ordering.then_with(|| {
            let ordering =
                sort_value(document.get(key.field)).total_cmp(&sort_value(other(position, key)));
            if key.order == SortOrder::Desc { ordering.reverse() } else { ordering }
        })
    })
}

#[async_trait]
impl IndexStore for MemoryIndex {
    async fn create_one(
        &self,
        kind: RecordKind,
        id: String,
        document: Value,
    ) -> Result<CreateOutcome, IndexError> {
        let mut state = self.begin(IndexOp::Create(kind, id.clone()))?;
        let documents = state.documents.entry(kind).or_default();
        if documents.contains_key(&id) {
            return Ok(CreateOutcome::Existed);
        }
        documents.insert(id, document);
        Ok(CreateOutcome::Created)
    }

    async fn bulk_create(
        &self,
        kind: RecordKind,
        items: Vec<BulkItem>,
    ) -> Result<BulkOutcome, IndexError> {
        let ids = items.iter().map(|item| item.id.clone()).collect();
        self.bulk(IndexOp::BulkCreate(kind, ids), kind, items, |documents, item| {
            if documents.contains_key(&item.id) {
                return Ok(false);
            }
            documents.insert(item.id, item.document);
            Ok(true)
        })
    }

    async fn bulk_update(
        &self,
        kind: RecordKind,
        items: Vec<BulkItem>,
    ) -> Result<BulkOutcome, IndexError> {
        let ids = items.iter().map(|item| item.id.clone()).collect();
        self.bulk(IndexOp::BulkUpdate(kind, ids), kind, items, |documents, item| {
            let Some(Value::Object(existing)) = documents.get_mut(&item.id) else {
                return Err((404, "document_missing_exception".into()));
            };
            if let Value::Object(partial) = item.document {
                existing.extend(partial);
            }
            Ok(true)
        })
    }

    async fn bulk_delete(
        &self,
        kind: RecordKind,
        ids: Vec<String>,
    ) -> Result<BulkOutcome, IndexError> {
        let items = ids.iter().map(|id| BulkItem::new(id.clone(), Value::Null)).collect();
        self.bulk(IndexOp::BulkDelete(kind, ids), kind, items, |documents, item| {
            Ok(documents.remove(&item.id).is_some())
        })
    }

    async fn search(&self, kind: RecordKind, query: SearchQuery) -> Result<Vec<Hit>, IndexError> {
        let state = self.begin(IndexOp::Search(kind))?;
        let Some(documents) = state.documents.get(&kind) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<Hit> = documents
            .iter()
            .filter(|(_, doc)| {
                query.range.as_ref().is_none_or(|range| {
                    field_u64(doc, range.field).is_some_and(|value| range.contains(value))
                })
            })
            .filter(|(_, doc)| {
                query.missing.is_none_or(|field| doc.get(field).is_none_or(Value::is_null))
            })
            .map(|(id, doc)| Hit::new(id.clone(), doc.clone()))
            .collect();

        hits.sort_by(|a, b| compare(&a.source, &query.sort, |_, key| b.source.get(key.field)));
        if let Some(cursor) = &query.search_after {
            hits.retain(|hit| {
                compare(&hit.source, &query.sort, |position, _| cursor.get(position)).is_gt()
            });
        }
        hits.truncate(query.size.unwrap_or(DEFAULT_SEARCH_SIZE));
        Ok(hits)
    }

    async fn highest_block_number(&self) -> Result<Option<u64>, IndexError> {
        let state = self.lock();
        Ok(state
            .documents
            .get(&RecordKind::Block)
            .and_then(|docs| docs.values().filter_map(|doc| field_u64(doc, "number")).max()))
    }

    async fn count(&self, kind: RecordKind) -> Result<u64, IndexError> {
        Ok(self.lock().documents.get(&kind).map_or(0, |docs| docs.len() as u64))
    }

    async fn recreate(&self, kind: RecordKind) -> Result<(), IndexError> {
        let mut state = self.begin(IndexOp::Recreate(kind))?;
        state.documents.remove(&kind);
        Ok(())
    }
}
