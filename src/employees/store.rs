//! In-memory employee store guarded by a single async mutex.

use crate::employees::types::{AddOutcome, Employee};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::Mutex;

/// Owns the authoritative set of employee records.
///
/// Every operation takes the same lock for its whole duration, so `add`, `remove`, and `list`
/// execute in some total order and never observe each other's partial effects. The lock is a
/// `tokio` mutex: contended callers yield to the runtime instead of parking a worker thread.
/// Construct the store once near process start and share it through an `Arc`.
#[derive(Default)]
pub struct EmployeeStore {
    records: Mutex<Records>,
}

/// Abstraction over the store used by the HTTP surface.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    /// Insert a record unless its email is already taken.
    async fn add(&self, employee: Employee) -> AddOutcome;

    /// Delete the record with the given id, reporting whether anything was removed.
    async fn remove(&self, id: &str) -> bool;

    /// Return an owned snapshot of every stored record.
    async fn list(&self) -> Vec<Employee>;
}

/// Lock-protected state. Records are keyed by insertion sequence so snapshots come back in
/// insertion order; `ids` and `emails` index into them.
#[derive(Default)]
struct Records {
    next_seq: u64,
    entries: BTreeMap<u64, Employee>,
    ids: HashMap<String, u64>,
    emails: HashSet<String>,
}

impl Records {
    fn insert(&mut self, employee: Employee) -> AddOutcome {
        if self.emails.contains(&employee.email) {
            return AddOutcome::Conflict;
        }
        if self.ids.contains_key(&employee.id) {
            tracing::warn!(employee_id = %employee.id, "Rejected insert with an id already in use");
            return AddOutcome::Conflict;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.ids.insert(employee.id.clone(), seq);
        self.emails.insert(employee.email.clone());
        self.entries.insert(seq, employee.clone());
        AddOutcome::Created(employee)
    }

    fn remove(&mut self, id: &str) -> bool {
        let Some(seq) = self.ids.remove(id) else {
            return false;
        };
        if let Some(employee) = self.entries.remove(&seq) {
            self.emails.remove(&employee.email);
        }
        true
    }

    fn snapshot(&self) -> Vec<Employee> {
        self.entries.values().cloned().collect()
    }
}

impl EmployeeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically insert `employee` unless another record already uses its email.
    ///
    /// Email comparison is exact (case-sensitive, no normalization beyond the trimming done
    /// during validation).
    pub async fn add(&self, employee: Employee) -> AddOutcome {
        let outcome = self.records.lock().await.insert(employee);
        match &outcome {
            AddOutcome::Created(employee) => tracing::debug!(
                employee_id = %employee.id,
                email = %employee.email,
                "Employee stored"
            ),
            AddOutcome::Conflict => tracing::debug!("Employee insert rejected as duplicate"),
        }
        outcome
    }

    /// Atomically remove the record with `id`. Returns `false` when no such record exists.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.records.lock().await.remove(id);
        tracing::debug!(employee_id = id, removed, "Employee removal processed");
        removed
    }

    /// Atomically copy out every stored record, oldest first.
    pub async fn list(&self) -> Vec<Employee> {
        self.records.lock().await.snapshot()
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.records.lock().await.entries.len()
    }

    /// Whether the store currently holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EmployeeApi for EmployeeStore {
    async fn add(&self, employee: Employee) -> AddOutcome {
        EmployeeStore::add(self, employee).await
    }

    async fn remove(&self, id: &str) -> bool {
        EmployeeStore::remove(self, id).await
    }

    async fn list(&self) -> Vec<Employee> {
        EmployeeStore::list(self).await
    }
}
