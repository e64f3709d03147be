//! Sequential script execution over an administrative command seam.

use async_trait::async_trait;
use mongodb::bson::Document;
use tracing::{debug, info};

use crate::error::BootstrapResult;
use crate::script::{SeedScript, SeedStep};

/// Administrative command surface of a database connection.
///
/// The driver-backed client implements this; tests substitute a recording
/// mock.
#[async_trait]
pub trait AdminCommands: Send + Sync {
    /// Run an administrative command against the named partition.
    async fn run_command(&self, database: &str, command: Document) -> BootstrapResult<Document>;

    /// Insert a single document into a collection on the named partition.
    async fn insert_one(
        &self,
        database: &str,
        collection: &str,
        document: Document,
    ) -> BootstrapResult<()>;
}

/// Counts of what a script application created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Principals created
    pub users_created: u32,
    /// Documents inserted
    pub documents_inserted: u32,
}

/// Apply a seed script, issuing its steps strictly in order.
///
/// Execution is single-task and sequential. The first failing step aborts
/// the run and its error propagates unchanged; earlier steps are not rolled
/// back and later steps are not attempted.
///
/// # Errors
///
/// Returns the error of the first failing step.
pub async fn apply<E>(exec: &E, script: &SeedScript) -> BootstrapResult<SeedSummary>
where
    E: AdminCommands + ?Sized,
{
    info!(script = script.name(), steps = script.len(), "applying seed script");
    let mut summary = SeedSummary::default();

    for (index, step) in script.steps().iter().enumerate() {
        match step {
            SeedStep::CreateUser {
                database,
                principal,
                write_concern,
            } => {
                debug!(step = index, database = %database, principal = %principal.name, "creating principal");
                exec.run_command(database, principal.create_user_command(write_concern.as_ref()))
                    .await?;
                summary.users_created += 1;
            }
            SeedStep::InsertOne {
                database,
                collection,
                document,
            } => {
                debug!(step = index, database = %database, collection = %collection, "inserting document");
                exec.insert_one(database, collection, document.clone()).await?;
                summary.documents_inserted += 1;
            }
        }
    }

    info!(
        script = script.name(),
        users = summary.users_created,
        documents = summary.documents_inserted,
        "seed script applied"
    );
    Ok(summary)
}
