//! Entity store for users, contacts, experiences, connections and revoked
//! session tokens
//!
//! Every repository shares one [`Database`] handle and commits each mutation
//! in its own transaction. Deleting a user or a contact removes the rows that
//! depend on it inside the same transaction.

pub(crate) mod codec;
pub mod models;
pub mod repositories;
pub mod schema;

use common::{Database, error::DatabaseResult};

pub use repositories::{
    ConnectionRepository, ContactRepository, ExperienceRepository, RevokedTokenRepository,
    UserRepository,
};

/// All repositories over one database handle
#[derive(Debug, Clone)]
pub struct Store {
    pub users: UserRepository,
    pub contacts: ContactRepository,
    pub experiences: ExperienceRepository,
    pub connections: ConnectionRepository,
    pub revoked_tokens: RevokedTokenRepository,
    db: Database,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            contacts: ContactRepository::new(db.clone()),
            experiences: ExperienceRepository::new(db.clone()),
            connections: ConnectionRepository::new(db.clone()),
            revoked_tokens: RevokedTokenRepository::new(db.clone()),
            db,
        }
    }

    /// Create the schema on `db` and wrap it
    pub async fn open(db: Database) -> DatabaseResult<Self> {
        schema::create_all(&db).await?;
        Ok(Self::new(db))
    }

    /// Fresh private store with the schema in place
    pub async fn in_memory() -> DatabaseResult<Self> {
        Self::open(Database::in_memory().await?).await
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
