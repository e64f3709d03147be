//! Driver-backed administrative client.

use async_trait::async_trait;
use mongodb::Client;
use mongodb::bson::{Document, doc};
use mongodb::error::ErrorKind;
use tracing::{info, instrument};

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, BootstrapResult};
use crate::exec::{self, AdminCommands, SeedSummary};
use crate::script::SeedScript;

/// Server code for `createUser` against an already-existing user.
const DUPLICATE_USER_CODE: i32 = 51003;

/// Administrative client for the instance being bootstrapped.
pub struct BootstrapClient {
    config: BootstrapConfig,
    inner: Client,
}

impl BootstrapClient {
    /// Connect to the instance and verify it is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::InvalidConfig`] for an empty host,
    /// [`BootstrapError::Unavailable`] when the instance does not answer a
    /// ping within the configured timeout, and driver errors otherwise.
    #[instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn connect(config: BootstrapConfig) -> BootstrapResult<Self> {
        if config.host.is_empty() {
            return Err(BootstrapError::invalid_config("host must not be empty"));
        }

        let inner = Client::with_options(config.client_options())?;
        inner
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| BootstrapError::unavailable(err.to_string()))?;

        info!("connected to database instance");
        Ok(Self { config, inner })
    }

    /// Apply a seed script over this connection.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing step.
    pub async fn apply(&self, script: &SeedScript) -> BootstrapResult<SeedSummary> {
        exec::apply(self, script).await
    }

    /// The underlying driver client, for follow-on verification queries.
    #[must_use]
    pub const fn handle(&self) -> &Client {
        &self.inner
    }

    /// The configuration this client was built from.
    #[must_use]
    pub const fn config(&self) -> &BootstrapConfig {
        &self.config
    }
}

#[async_trait]
impl AdminCommands for BootstrapClient {
    async fn run_command(&self, database: &str, command: Document) -> BootstrapResult<Document> {
        let user = command.get_str("createUser").ok().map(str::to_owned);
        self.inner
            .database(database)
            .run_command(command)
            .await
            .map_err(|err| classify_command_error(err, user.as_deref(), database))
    }

    async fn insert_one(
        &self,
        database: &str,
        collection: &str,
        document: Document,
    ) -> BootstrapResult<()> {
        self.inner
            .database(database)
            .collection::<Document>(collection)
            .insert_one(document)
            .await?;
        Ok(())
    }
}

fn classify_command_error(
    err: mongodb::error::Error,
    user: Option<&str>,
    database: &str,
) -> BootstrapError {
    if let ErrorKind::Command(ref failure) = *err.kind {
        if failure.code == DUPLICATE_USER_CODE {
            if let Some(name) = user {
                return BootstrapError::duplicate(name, database);
            }
        }
        return BootstrapError::CommandFailed {
            code: failure.code,
            message: failure.message.clone(),
        };
    }
    BootstrapError::Driver(err)
}
