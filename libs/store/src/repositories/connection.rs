//! Connection repository for database operations
//!
//! A user holds at most one connection per contact; a second create for the
//! same pair is rejected by the storage `UNIQUE` constraint.

use chrono::NaiveDate;
use common::{
    Database,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::{AnyConnection, any::AnyRow};
use tracing::info;

use crate::{
    codec,
    models::{Connection, ConnectionUpdate, NewConnection},
};

const COLUMNS: &str = "id, user_id, contact_url, frequency, last_interacted, notes";

/// Connection repository
#[derive(Debug, Clone)]
pub struct ConnectionRepository {
    db: Database,
}

impl ConnectionRepository {
    /// Create a new connection repository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a connection between an existing user and an existing contact
    pub async fn create(&self, new: &NewConnection) -> DatabaseResult<Connection> {
        if new.contact_url.trim().is_empty() {
            return Err(DatabaseError::constraint("contact_url is required"));
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO connections (user_id, contact_url, frequency, last_interacted, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(&new.contact_url)
        .bind(new.frequency.as_str())
        .bind(codec::encode_date(new.last_interacted_or_today()))
        .bind(&new.notes)
        .fetch_one(self.db.pool())
        .await?;

        let connection = from_row(&row)?;
        info!(
            id = connection.id,
            user_id = connection.user_id,
            frequency = %connection.frequency,
            "Connection created"
        );
        Ok(connection)
    }

    /// Find a connection by ID, failing with `NotFound` on a miss
    pub async fn get_by_id(&self, id: i64) -> DatabaseResult<Connection> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM connections WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(row) => from_row(&row),
            None => Err(DatabaseError::not_found("Connection", id)),
        }
    }

    /// Find the connection between a user and a contact
    pub async fn find_by_pair(
        &self,
        user_id: i64,
        contact_url: &str,
    ) -> DatabaseResult<Option<Connection>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM connections WHERE user_id = $1 AND contact_url = $2"
        ))
        .bind(user_id)
        .bind(contact_url)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    pub async fn list_by_user(&self, user_id: i64) -> DatabaseResult<Vec<Connection>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM connections WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(from_row).collect()
    }

    pub async fn list_all(&self) -> DatabaseResult<Vec<Connection>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM connections ORDER BY id"))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(from_row).collect()
    }

    /// Connections whose next interaction falls on or before `today`
    pub async fn list_due(&self, today: NaiveDate) -> DatabaseResult<Vec<Connection>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|c| c.is_due(today))
            .collect())
    }

    /// Change one column and persist it
    pub async fn update(&self, id: i64, update: ConnectionUpdate) -> DatabaseResult<Connection> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM connections WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Connection", id))?;

        let mut connection = from_row(&row)?;
        connection.apply(update);

        let saved = write(&mut *tx, &connection).await?;
        tx.commit().await?;
        Ok(saved)
    }

    /// Persist the mutable columns of an existing connection
    pub async fn save(&self, connection: &Connection) -> DatabaseResult<Connection> {
        let mut tx = self.db.pool().begin().await?;
        let saved = write(&mut *tx, connection).await?;
        tx.commit().await?;
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let deleted = sqlx::query("DELETE FROM connections WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DatabaseError::not_found("Connection", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM connections")
            .fetch_one(self.db.pool())
            .await?;
        codec::integer(&row, "total")
    }

    /// Number of connections that reference one contact
    pub async fn count_by_contact_url(&self, contact_url: &str) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM connections WHERE contact_url = $1")
            .bind(contact_url)
            .fetch_one(self.db.pool())
            .await?;
        codec::integer(&row, "total")
    }
}

async fn write(conn: &mut AnyConnection, connection: &Connection) -> DatabaseResult<Connection> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE connections SET frequency = $2, last_interacted = $3, notes = $4
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(connection.id)
    .bind(connection.frequency.as_str())
    .bind(codec::encode_date(connection.last_interacted))
    .bind(&connection.notes)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Connection", connection.id))?;

    from_row(&row)
}

fn from_row(row: &AnyRow) -> DatabaseResult<Connection> {
    Ok(Connection {
        id: codec::integer(row, "id")?,
        user_id: codec::integer(row, "user_id")?,
        contact_url: codec::text(row, "contact_url")?,
        frequency: codec::closed(row, "frequency")?,
        last_interacted: codec::date(row, "last_interacted")?,
        notes: codec::optional_text(row, "notes")?,
    })
}
