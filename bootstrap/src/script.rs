//! Declarative seed scripts executed at instance bootstrap.

use std::time::Duration;

use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::principal::{EXTERNAL_AUTH_DB, Principal, Role, WriteAck};

/// Application partition seeded by both scripts.
pub const APP_PARTITION: &str = "mydb";
/// Second application partition seeded by the extended script.
pub const CONNECTOR_PARTITION: &str = "embulk_test";
/// Administrative partition targeted by user-management grants.
pub const ADMIN_PARTITION: &str = "admin";
/// Collection holding the sample document seeded by the extended script.
pub const SAMPLE_COLLECTION: &str = "products";
/// Username of the local application principal.
pub const APP_USERNAME: &str = "mongo_user";
/// Password of the local application principal.
pub const APP_PASSWORD: &str = "dbpass";
/// Distinguished name of the certificate principal.
pub const CERT_SUBJECT: &str = "CN=localhost";

/// Write-concern timeout applied to certificate principal creation.
const CERT_USER_WTIMEOUT: Duration = Duration::from_millis(5000);

/// One administrative step of a seed script.
#[derive(Debug, Clone)]
pub enum SeedStep {
    /// Create a principal on a partition via the `createUser` command.
    CreateUser {
        /// Partition the principal is created on
        database: String,
        /// Principal to create
        principal: Principal,
        /// Acknowledgment required for the creation, if any
        write_concern: Option<WriteAck>,
    },
    /// Insert a single document into a collection.
    InsertOne {
        /// Partition holding the collection
        database: String,
        /// Target collection
        collection: String,
        /// Document to insert
        document: Document,
    },
}

/// An ordered sequence of administrative steps.
///
/// Scripts are plain data. Applying one issues its steps strictly in order
/// against a single connection; the first failure aborts the run.
#[derive(Debug, Clone)]
pub struct SeedScript {
    name: &'static str,
    steps: Vec<SeedStep>,
}

impl SeedScript {
    /// Create an empty script.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn with_step(mut self, step: SeedStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Script name, used in log output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[SeedStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The baseline seed script.
    ///
    /// Creates the certificate principal on the external-auth partition with
    /// read/write access to the application partition and user management on
    /// `admin`, then the local application principal on the application
    /// partition.
    #[must_use]
    pub fn baseline() -> Self {
        Self::new("baseline")
            .with_step(SeedStep::CreateUser {
                database: EXTERNAL_AUTH_DB.to_string(),
                principal: Principal::x509(CERT_SUBJECT)
                    .with_role(Role::ReadWrite, APP_PARTITION)
                    .with_role(Role::UserAdminAnyDatabase, ADMIN_PARTITION),
                write_concern: Some(WriteAck::majority(CERT_USER_WTIMEOUT)),
            })
            .with_step(SeedStep::CreateUser {
                database: APP_PARTITION.to_string(),
                principal: Principal::local(APP_USERNAME, APP_PASSWORD)
                    .with_role(Role::ReadWrite, APP_PARTITION),
                write_concern: None,
            })
    }

    /// The extended seed script.
    ///
    /// Everything the baseline script does, plus the connector partition:
    /// the certificate principal additionally gets read/write access there,
    /// the local principal is repeated on it, and one sample product is
    /// inserted for connector read tests.
    #[must_use]
    pub fn extended() -> Self {
        Self::new("extended")
            .with_step(SeedStep::CreateUser {
                database: EXTERNAL_AUTH_DB.to_string(),
                principal: Principal::x509(CERT_SUBJECT)
                    .with_role(Role::ReadWrite, APP_PARTITION)
                    .with_role(Role::ReadWrite, CONNECTOR_PARTITION)
                    .with_role(Role::UserAdminAnyDatabase, ADMIN_PARTITION),
                write_concern: Some(WriteAck::majority(CERT_USER_WTIMEOUT)),
            })
            .with_step(SeedStep::CreateUser {
                database: APP_PARTITION.to_string(),
                principal: Principal::local(APP_USERNAME, APP_PASSWORD)
                    .with_role(Role::ReadWrite, APP_PARTITION),
                write_concern: None,
            })
            .with_step(SeedStep::CreateUser {
                database: CONNECTOR_PARTITION.to_string(),
                principal: Principal::local(APP_USERNAME, APP_PASSWORD)
                    .with_role(Role::ReadWrite, CONNECTOR_PARTITION),
                write_concern: None,
            })
            .with_step(SeedStep::InsertOne {
                database: CONNECTOR_PARTITION.to_string(),
                collection: SAMPLE_COLLECTION.to_string(),
                document: Product::sample().into_document(),
            })
    }
}

/// Sample record the extended script seeds for connector read tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product category
    pub category: String,
    /// Product name
    pub name: String,
    /// Units in stock
    pub stock: i32,
}

impl Product {
    /// The single record seeded into the sample collection.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            category: "A".to_string(),
            name: "camera case".to_string(),
            stock: 5,
        }
    }

    /// Render the record as a BSON document.
    #[must_use]
    pub fn into_document(self) -> Document {
        doc! {
            "category": self.category,
            "name": self.name,
            "stock": self.stock,
        }
    }
}
