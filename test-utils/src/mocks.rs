//! Mock implementations for testing.
//!
//! This module provides a recording mock of the administrative command
//! surface so script execution can be tested without a live instance.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use testbed_bootstrap::{AdminCommands, BootstrapError, BootstrapResult};
use tokio::sync::RwLock;

/// A command issued to the mock, with its target partition.
#[derive(Debug, Clone)]
pub struct IssuedCommand {
    /// Partition the command targeted
    pub database: String,
    /// The command payload
    pub command: Document,
}

/// Mock administrative command executor.
///
/// Records every issued command in order, keeps a per-partition principal
/// registry, and rejects duplicate user creation the way the server does.
#[derive(Debug, Default)]
pub struct MockAdminCommands {
    issued: Arc<RwLock<Vec<IssuedCommand>>>,
    users: Arc<RwLock<HashMap<(String, String), Document>>>,
    documents: Arc<RwLock<HashMap<(String, String), Vec<Document>>>>,
}

impl MockAdminCommands {
    /// Create a new mock executor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands issued so far, in order.
    pub async fn issued(&self) -> Vec<IssuedCommand> {
        self.issued.read().await.clone()
    }

    /// Number of commands issued so far.
    pub async fn issued_count(&self) -> usize {
        self.issued.read().await.len()
    }

    /// The stored `createUser` payload for a principal, if it was created.
    pub async fn user(&self, database: &str, name: &str) -> Option<Document> {
        self.users
            .read()
            .await
            .get(&(database.to_string(), name.to_string()))
            .cloned()
    }

    /// Names of the principals registered on a partition.
    pub async fn users_in(&self, database: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .users
            .read()
            .await
            .keys()
            .filter(|(partition, _)| partition == database)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Role grants of a registered principal as (role, partition) pairs.
    pub async fn roles_of(&self, database: &str, name: &str) -> Vec<(String, String)> {
        let users = self.users.read().await;
        let Some(command) = users.get(&(database.to_string(), name.to_string())) else {
            return Vec::new();
        };
        command
            .get_array("roles")
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(|entry| {
                        let grant = entry.as_document()?;
                        Some((
                            grant.get_str("role").ok()?.to_string(),
                            grant.get_str("db").ok()?.to_string(),
                        ))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Documents inserted into a collection, in insertion order.
    pub async fn documents(&self, database: &str, collection: &str) -> Vec<Document> {
        self.documents
            .read()
            .await
            .get(&(database.to_string(), collection.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Reset all recorded state.
    pub async fn clear(&self) {
        self.issued.write().await.clear();
        self.users.write().await.clear();
        self.documents.write().await.clear();
    }
}

#[async_trait]
impl AdminCommands for MockAdminCommands {
    async fn run_command(&self, database: &str, command: Document) -> BootstrapResult<Document> {
        self.issued.write().await.push(IssuedCommand {
            database: database.to_string(),
            command: command.clone(),
        });

        if let Ok(name) = command.get_str("createUser") {
            let key = (database.to_string(), name.to_string());
            let mut users = self.users.write().await;
            if users.contains_key(&key) {
                return Err(BootstrapError::duplicate(name, database));
            }
            users.insert(key, command);
        }

        Ok(doc! { "ok": 1 })
    }

    async fn insert_one(
        &self,
        database: &str,
        collection: &str,
        document: Document,
    ) -> BootstrapResult<()> {
        // Record the insert in wire-command form so ordering assertions see
        // every step in one log.
        self.issued.write().await.push(IssuedCommand {
            database: database.to_string(),
            command: doc! { "insert": collection, "documents": [document.clone()] },
        });

        self.documents
            .write()
            .await
            .entry((database.to_string(), collection.to_string()))
            .or_default()
            .push(document);
        Ok(())
    }
}
