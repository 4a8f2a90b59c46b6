//! # Feature: Client Directory
//!
//! Holds client records and identity lookup. Clients are immutable after
//! creation and never deleted.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use crate::core::{AppError, Clock, Result};
use crate::features::activity::{category, ActivityLog};
use crate::models::{Client, NewClient};
use crate::store::{IdSeq, Table};
use log::info;
use regex::Regex;
use std::sync::Arc;
use std::sync::OnceLock;

/// RFC-lite shape check: `local@domain.tld`.
fn email_pattern() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
    })
}

/// Shared handle to the client directory.
#[derive(Clone)]
pub struct ClientDirectory {
    table: Table<Client>,
    ids: IdSeq,
    log: ActivityLog,
    clock: Arc<dyn Clock>,
}

impl ClientDirectory {
    pub fn new(ids: IdSeq, log: ActivityLog, clock: Arc<dyn Clock>) -> Self {
        ClientDirectory {
            table: Table::new(),
            ids,
            log,
            clock,
        }
    }

    /// Register a client. Name and email are required; the email must look
    /// like `local@domain.tld`.
    pub async fn add_client(&self, input: NewClient) -> Result<Client> {
        let name = input.name.trim().to_string();
        let email = input.email.trim().to_string();

        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }
        if email.is_empty() {
            return Err(AppError::validation("email is required"));
        }
        if !email_pattern().is_match(&email) {
            return Err(AppError::validation(format!(
                "email does not look like local@domain.tld: {email}"
            )));
        }

        let client = Client {
            id: self.ids.next(),
            name,
            email,
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            created_at: self.clock.now(),
        };

        self.table.insert(client.clone()).await;
        info!("client #{} added: {}", client.id, client.name);
        self.log
            .append(
                category::CLIENT,
                format!("client #{} added: {} <{}>", client.id, client.name, client.email),
            )
            .await;

        Ok(client)
    }

    /// All clients, most-recently-added first.
    pub async fn list_clients(&self) -> Vec<Client> {
        self.table.newest_first().await
    }

    pub async fn find_client(&self, id: i64) -> Option<Client> {
        self.table.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SystemClock;

    fn directory() -> (ClientDirectory, ActivityLog) {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let log = ActivityLog::new(clock.clone());
        (
            ClientDirectory::new(IdSeq::new(), log.clone(), clock),
            log,
        )
    }

    fn input(name: &str, email: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_client_assigns_increasing_ids() {
        let (dir, _) = directory();
        let a = dir.add_client(input("Ada", "ada@x.com")).await.unwrap();
        let b = dir.add_client(input("Grace", "grace@x.com")).await.unwrap();
        assert!(b.id > a.id);

        // Retrievable by exact id
        assert_eq!(dir.find_client(a.id).await.unwrap().name, "Ada");
        assert!(dir.find_client(999).await.is_none());
    }

    #[tokio::test]
    async fn test_add_client_rejects_missing_fields() {
        let (dir, _) = directory();
        assert!(matches!(
            dir.add_client(input("", "a@x.com")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            dir.add_client(input("Ada", "")).await,
            Err(AppError::Validation(_))
        ));
        // Whitespace-only counts as missing
        assert!(matches!(
            dir.add_client(input("   ", "a@x.com")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_add_client_rejects_malformed_email() {
        let (dir, _) = directory();
        for bad in ["plainaddress", "a@x", "a @x.com", "@x.com", "a@.com", "a@x."] {
            let result = dir.add_client(input("Ada", bad)).await;
            assert!(
                matches!(result, Err(AppError::Validation(_))),
                "expected rejection for {bad:?}"
            );
        }
        assert!(dir.add_client(input("Ada", "a.b+c@mail.example.org")).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_client_logs_and_lists_newest_first() {
        let (dir, log) = directory();
        dir.add_client(input("Ada", "ada@x.com")).await.unwrap();
        dir.add_client(input("Grace", "grace@x.com")).await.unwrap();

        let clients = dir.list_clients().await;
        assert_eq!(clients[0].name, "Grace");
        assert_eq!(clients[1].name, "Ada");

        let entries = log.recent_in(category::CLIENT, 10).await;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].detail.contains("Grace"));
    }
}
