//! Test fixtures with sample data.
//!
//! This module provides pre-built test data for use in tests.

use mongodb::bson::{Document, doc};
use testbed_bootstrap::script::{APP_PASSWORD, APP_USERNAME, CERT_SUBJECT};

/// Default host of the ephemeral instance under test.
pub const DEFAULT_HOST: &str = "localhost";
/// Default port of the ephemeral instance under test.
pub const DEFAULT_PORT: u16 = 27017;

/// Plain-text application credentials, as the seed scripts create them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCredentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl SeedCredentials {
    /// The local application principal both scripts create.
    #[must_use]
    pub fn application() -> Self {
        Self {
            username: APP_USERNAME.to_string(),
            password: APP_PASSWORD.to_string(),
        }
    }
}

/// Distinguished name presented by the client certificate in TLS tests.
#[must_use]
pub fn certificate_subject() -> String {
    CERT_SUBJECT.to_string()
}

/// Expected contents of the sample collection after the extended script.
#[must_use]
pub fn expected_product() -> Document {
    doc! { "category": "A", "name": "camera case", "stock": 5 }
}
