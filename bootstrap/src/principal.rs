//! Principals, role grants, and write acknowledgment for user creation.

use std::fmt;
use std::time::Duration;

use mongodb::bson::{Bson, Document, doc};
use secrecy::{ExposeSecret, SecretString};

/// Authentication partition holding certificate-based principals.
pub const EXTERNAL_AUTH_DB: &str = "$external";

/// Roles grantable to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Read and write any collection on the target partition
    ReadWrite,
    /// Manage users on any partition
    UserAdminAnyDatabase,
}

impl Role {
    /// Server-side role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadWrite => "readWrite",
            Self::UserAdminAnyDatabase => "userAdminAnyDatabase",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role scoped to a target partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    /// Granted role
    pub role: Role,
    /// Partition the role applies to
    pub database: String,
}

impl RoleGrant {
    /// Create a new role grant.
    pub fn new(role: Role, database: impl Into<String>) -> Self {
        Self {
            role,
            database: database.into(),
        }
    }

    /// Render the grant as a `roles` array entry.
    #[must_use]
    pub fn to_bson(&self) -> Bson {
        Bson::Document(doc! { "role": self.role.as_str(), "db": &self.database })
    }
}

/// An authentication identity recognized by the database.
///
/// Local principals carry a password; certificate principals are identified
/// by their distinguished name alone and authenticate via the client
/// certificate presented on the connection.
#[derive(Clone)]
pub struct Principal {
    /// Principal name: a username or a certificate distinguished name
    pub name: String,
    /// Password, absent for certificate-based principals
    pub password: Option<SecretString>,
    /// Role grants, in insertion order
    pub roles: Vec<RoleGrant>,
}

impl Principal {
    /// Create a username/password principal.
    pub fn local(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: Some(SecretString::from(password.into())),
            roles: Vec::new(),
        }
    }

    /// Create a certificate principal from its distinguished name.
    pub fn x509(subject: impl Into<String>) -> Self {
        Self {
            name: subject.into(),
            password: None,
            roles: Vec::new(),
        }
    }

    /// Grant a role on a partition.
    #[must_use]
    pub fn with_role(mut self, role: Role, database: impl Into<String>) -> Self {
        self.roles.push(RoleGrant::new(role, database));
        self
    }

    /// Render the `createUser` command payload for this principal.
    ///
    /// Field order matches the administrative interface: `createUser`, `pwd`
    /// (only for local principals), `roles`, then `writeConcern` when
    /// requested.
    #[must_use]
    pub fn create_user_command(&self, write_concern: Option<&WriteAck>) -> Document {
        let mut command = doc! { "createUser": &self.name };
        if let Some(password) = &self.password {
            command.insert("pwd", password.expose_secret());
        }
        let roles: Vec<Bson> = self.roles.iter().map(RoleGrant::to_bson).collect();
        command.insert("roles", roles);
        if let Some(ack) = write_concern {
            command.insert("writeConcern", ack.to_document());
        }
        command
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("roles", &self.roles)
            .finish()
    }
}

/// Write acknowledgment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    /// Acknowledged by a majority of the replica set
    Majority,
}

/// Write acknowledgment required for a user-creation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    /// Acknowledgment mode
    pub mode: AckMode,
    /// Time the server may wait for the acknowledgment
    pub timeout: Duration,
}

impl WriteAck {
    /// Majority acknowledgment with the given timeout.
    #[must_use]
    pub const fn majority(timeout: Duration) -> Self {
        Self {
            mode: AckMode::Majority,
            timeout,
        }
    }

    /// Render the `writeConcern` command field.
    #[must_use]
    pub fn to_document(&self) -> Document {
        let w = match self.mode {
            AckMode::Majority => "majority",
        };
        let wtimeout = i64::try_from(self.timeout.as_millis()).unwrap_or(i64::MAX);
        doc! { "w": w, "wtimeout": wtimeout }
    }
}
