//! Contact repository for database operations

use common::{
    Database,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::{AnyConnection, any::AnyRow};
use tracing::info;

use crate::{
    codec,
    models::{Contact, ContactUpdate},
};

const COLUMNS: &str = "contact_url, name, current_location, headline, about, profile_pic_url";

/// Contact repository
#[derive(Debug, Clone)]
pub struct ContactRepository {
    db: Database,
}

impl ContactRepository {
    /// Create a new contact repository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a contact or overwrite the one stored under the same URL
    pub async fn save(&self, contact: &Contact) -> DatabaseResult<Contact> {
        contact.validate()?;

        let mut tx = self.db.pool().begin().await?;
        let saved = upsert(&mut *tx, contact).await?;
        tx.commit().await?;

        info!(contact_url = %saved.contact_url, "Contact saved");
        Ok(saved)
    }

    /// Find a contact by its profile URL
    pub async fn get_by_url(&self, contact_url: &str) -> DatabaseResult<Option<Contact>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE contact_url = $1"
        ))
        .bind(contact_url)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    pub async fn list_all(&self) -> DatabaseResult<Vec<Contact>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM contacts ORDER BY contact_url"))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(from_row).collect()
    }

    /// Change one column and persist it
    pub async fn update(
        &self,
        contact_url: &str,
        update: ContactUpdate,
    ) -> DatabaseResult<Contact> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE contact_url = $1"
        ))
        .bind(contact_url)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Contact", contact_url))?;

        let mut contact = from_row(&row)?;
        contact.apply(update);
        contact.validate()?;

        let saved = upsert(&mut *tx, &contact).await?;
        tx.commit().await?;
        Ok(saved)
    }

    /// Delete a contact together with its experiences and connections
    pub async fn delete(&self, contact_url: &str) -> DatabaseResult<()> {
        let mut tx = self.db.pool().begin().await?;

        let experiences = sqlx::query("DELETE FROM experiences WHERE contact_url = $1")
            .bind(contact_url)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let connections = sqlx::query("DELETE FROM connections WHERE contact_url = $1")
            .bind(contact_url)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM contacts WHERE contact_url = $1")
            .bind(contact_url)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DatabaseError::not_found("Contact", contact_url));
        }

        tx.commit().await?;
        info!(contact_url, experiences, connections, "Contact deleted");
        Ok(())
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM contacts")
            .fetch_one(self.db.pool())
            .await?;
        codec::integer(&row, "total")
    }
}

async fn upsert(conn: &mut AnyConnection, contact: &Contact) -> DatabaseResult<Contact> {
    let row = sqlx::query(&format!(
        r#"
        INSERT INTO contacts ({COLUMNS})
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (contact_url) DO UPDATE SET
            name = excluded.name,
            current_location = excluded.current_location,
            headline = excluded.headline,
            about = excluded.about,
            profile_pic_url = excluded.profile_pic_url
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&contact.contact_url)
    .bind(&contact.name)
    .bind(&contact.current_location)
    .bind(&contact.headline)
    .bind(&contact.about)
    .bind(&contact.profile_pic_url)
    .fetch_one(conn)
    .await?;

    from_row(&row)
}

fn from_row(row: &AnyRow) -> DatabaseResult<Contact> {
    Ok(Contact {
        contact_url: codec::text(row, "contact_url")?,
        name: codec::text(row, "name")?,
        current_location: codec::text(row, "current_location")?,
        headline: codec::text(row, "headline")?,
        about: codec::text(row, "about")?,
        profile_pic_url: codec::text(row, "profile_pic_url")?,
    })
}
