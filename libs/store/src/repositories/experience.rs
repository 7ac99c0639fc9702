//! Experience repository for database operations

use common::{
    Database,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::{AnyConnection, any::AnyRow};
use tracing::info;

use crate::{
    codec,
    models::{Experience, ExperienceUpdate, NewExperience},
};

const COLUMNS: &str = "id, contact_url, company_name, company_logo, company_role, \
    company_location, bulletpoints, company_duration, company_total_duration";

/// Experience repository
#[derive(Debug, Clone)]
pub struct ExperienceRepository {
    db: Database,
}

impl ExperienceRepository {
    /// Create a new experience repository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new experience under an existing contact
    pub async fn create(&self, new: &NewExperience) -> DatabaseResult<Experience> {
        new.validate()?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO experiences (
                contact_url, company_name, company_logo, company_role, company_location,
                bulletpoints, company_duration, company_total_duration
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new.contact_url)
        .bind(&new.company_name)
        .bind(&new.company_logo)
        .bind(&new.company_role)
        .bind(&new.company_location)
        .bind(&new.bulletpoints)
        .bind(&new.company_duration)
        .bind(&new.company_total_duration)
        .fetch_one(self.db.pool())
        .await?;

        let experience = from_row(&row)?;
        info!(id = experience.id, contact_url = %experience.contact_url, "Experience created");
        Ok(experience)
    }

    /// Find an experience by ID, failing with `NotFound` on a miss
    pub async fn get_by_id(&self, id: i64) -> DatabaseResult<Experience> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM experiences WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(row) => from_row(&row),
            None => Err(DatabaseError::not_found("Experience", id)),
        }
    }

    pub async fn list_all(&self) -> DatabaseResult<Vec<Experience>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM experiences ORDER BY id"))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(from_row).collect()
    }

    /// Experiences recorded for one contact, in insertion order
    pub async fn list_by_contact_url(&self, contact_url: &str) -> DatabaseResult<Vec<Experience>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM experiences WHERE contact_url = $1 ORDER BY id"
        ))
        .bind(contact_url)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(from_row).collect()
    }

    /// Change one column and persist it
    pub async fn update(&self, id: i64, update: ExperienceUpdate) -> DatabaseResult<Experience> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM experiences WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Experience", id))?;

        let mut experience = from_row(&row)?;
        experience.apply(update);
        experience.validate()?;

        let saved = write(&mut *tx, &experience).await?;
        tx.commit().await?;
        Ok(saved)
    }

    /// Persist every column of an existing experience
    pub async fn save(&self, experience: &Experience) -> DatabaseResult<Experience> {
        experience.validate()?;

        let mut tx = self.db.pool().begin().await?;
        let saved = write(&mut *tx, experience).await?;
        tx.commit().await?;
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let deleted = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DatabaseError::not_found("Experience", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM experiences")
            .fetch_one(self.db.pool())
            .await?;
        codec::integer(&row, "total")
    }

    /// Number of experiences recorded for one contact
    pub async fn count_by_contact_url(&self, contact_url: &str) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM experiences WHERE contact_url = $1")
            .bind(contact_url)
            .fetch_one(self.db.pool())
            .await?;
        codec::integer(&row, "total")
    }
}

async fn write(conn: &mut AnyConnection, experience: &Experience) -> DatabaseResult<Experience> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE experiences SET
            contact_url = $2, company_name = $3, company_logo = $4, company_role = $5,
            company_location = $6, bulletpoints = $7, company_duration = $8,
            company_total_duration = $9
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(experience.id)
    .bind(&experience.contact_url)
    .bind(&experience.company_name)
    .bind(&experience.company_logo)
    .bind(&experience.company_role)
    .bind(&experience.company_location)
    .bind(&experience.bulletpoints)
    .bind(&experience.company_duration)
    .bind(&experience.company_total_duration)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Experience", experience.id))?;

    from_row(&row)
}

fn from_row(row: &AnyRow) -> DatabaseResult<Experience> {
    Ok(Experience {
        id: codec::integer(row, "id")?,
        contact_url: codec::text(row, "contact_url")?,
        company_name: codec::text(row, "company_name")?,
        company_logo: codec::text(row, "company_logo")?,
        company_role: codec::text(row, "company_role")?,
        company_location: codec::text(row, "company_location")?,
        bulletpoints: codec::text(row, "bulletpoints")?,
        company_duration: codec::text(row, "company_duration")?,
        company_total_duration: codec::text(row, "company_total_duration")?,
    })
}
