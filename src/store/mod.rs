//! In-memory storage seam
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! Storage is a capability here (insert, lookup-by-id, list), not a
//! commitment to a mechanism: the stores are transient vectors behind an
//! `RwLock`, and a deployment that needs durability swaps this module for a
//! database-backed one without touching the scheduler or the directories.

use crate::models::{Client, Reminder};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide id sequence shared by all record tables.
///
/// Ids are strictly increasing and unique across record kinds: creating a
/// client and then a reminder yields consecutive ids.
#[derive(Clone)]
pub struct IdSeq {
    next: Arc<AtomicI64>,
}

impl IdSeq {
    pub fn new() -> Self {
        IdSeq {
            next: Arc::new(AtomicI64::new(1)),
        }
    }

    pub fn next(&self) -> i64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for IdSeq {
    fn default() -> Self {
        Self::new()
    }
}

/// A record with a stable numeric identity.
pub trait Record {
    fn id(&self) -> i64;
}

impl Record for Client {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Reminder {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Append-ordered in-memory table of records.
#[derive(Clone)]
pub struct Table<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T: Record + Clone> Table<T> {
    pub fn new() -> Self {
        Table {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn insert(&self, row: T) {
        self.rows.write().await.push(row);
    }

    pub async fn get(&self, id: i64) -> Option<T> {
        self.rows.read().await.iter().find(|r| r.id() == id).cloned()
    }

    /// All rows, most-recently-inserted first.
    pub async fn newest_first(&self) -> Vec<T> {
        let rows = self.rows.read().await;
        rows.iter().rev().cloned().collect()
    }

    /// Rows matching a predicate, in insertion order.
    pub async fn filtered(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let rows = self.rows.read().await;
        rows.iter().filter(|r| pred(r)).cloned().collect()
    }

    /// Mutate the row with the given id in place, returning the updated copy.
    pub async fn update(&self, id: i64, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut rows = self.rows.write().await;
        let row = rows.iter_mut().find(|r| r.id() == id)?;
        f(row);
        Some(row.clone())
    }
}

impl<T: Record + Clone> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn client(id: i64, name: &str) -> Client {
        Client {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            phone: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_id_seq_is_strictly_increasing() {
        let ids = IdSeq::new();
        let a = ids.next();
        let b = ids.next();
        let c = ids.next();
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn test_id_seq_shared_across_clones() {
        // Clients and reminders draw from the same sequence, so ids stay
        // globally unique across record kinds.
        let ids = IdSeq::new();
        let other = ids.clone();
        assert_eq!(ids.next(), 1);
        assert_eq!(other.next(), 2);
        assert_eq!(ids.next(), 3);
    }

    #[tokio::test]
    async fn test_table_insert_get_update() {
        let table: Table<Client> = Table::new();
        table.insert(client(1, "ada")).await;
        table.insert(client(2, "grace")).await;

        assert_eq!(table.get(1).await.unwrap().name, "ada");
        assert!(table.get(99).await.is_none());

        let updated = table.update(2, |c| c.name = "hopper".to_string()).await;
        assert_eq!(updated.unwrap().name, "hopper");
        assert_eq!(table.get(2).await.unwrap().name, "hopper");
    }

    #[tokio::test]
    async fn test_table_newest_first_ordering() {
        let table: Table<Client> = Table::new();
        for i in 1..=4 {
            table.insert(client(i, "c")).await;
        }
        let ids: Vec<i64> = table.newest_first().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }
}
