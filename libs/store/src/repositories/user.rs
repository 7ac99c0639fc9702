//! User repository for database operations

use chrono::Utc;
use common::{
    Database,
    error::{DatabaseError, DatabaseResult},
};
use sqlx::{AnyConnection, any::AnyRow};
use tracing::info;

use crate::{
    codec,
    models::{NewUser, User, UserUpdate},
};

const COLUMNS: &str = "user_id, username, password_hash, email, first_name, last_name, \
    phone_number, company, number_of_employees, province, profile_picture_url, \
    security_question, security_answer, status, my_resume_content, subscription, \
    created_at, updated_at";

/// User repository
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a new user
    ///
    /// Both timestamps are set to the same instant.
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        new_user.validate()?;
        info!(username = %new_user.username, "Creating new user");

        let now = codec::encode_timestamp(Utc::now());
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (
                username, password_hash, email, first_name, last_name, phone_number,
                company, number_of_employees, province, profile_picture_url,
                security_question, security_answer, status, my_resume_content,
                subscription, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone_number)
        .bind(&new_user.company)
        .bind(new_user.number_of_employees.map(|n| n.as_str()))
        .bind(new_user.province.as_str())
        .bind(&new_user.profile_picture_url)
        .bind(new_user.security_question.as_str())
        .bind(&new_user.security_answer)
        .bind(new_user.status)
        .bind(&new_user.my_resume_content)
        .bind(new_user.subscription.as_str())
        .bind(&now)
        .fetch_one(self.db.pool())
        .await?;

        let user = from_row(&row)?;
        info!(user_id = user.user_id, "User created");
        Ok(user)
    }

    /// Find a user by ID, failing with `NotFound` on a miss
    pub async fn get_by_id(&self, user_id: i64) -> DatabaseResult<User> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(row) => from_row(&row),
            None => Err(DatabaseError::not_found("User", user_id)),
        }
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        self.find_by("email", email).await
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        self.find_by("username", username).await
    }

    async fn find_by(&self, column: &'static str, value: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE {column} = $1"))
            .bind(value)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(from_row).transpose()
    }

    /// All users, oldest first
    pub async fn list_all(&self) -> DatabaseResult<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM users ORDER BY user_id"))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(from_row).collect()
    }

    /// Change one column and persist it, refreshing `updated_at`
    pub async fn update(&self, user_id: i64, update: UserUpdate) -> DatabaseResult<User> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::not_found("User", user_id))?;

        let mut user = from_row(&row)?;
        user.apply(update);
        user.validate()?;

        let saved = write(&mut *tx, &user).await?;
        tx.commit().await?;

        info!(user_id, "User updated");
        Ok(saved)
    }

    /// Persist every mutable column of an existing user
    pub async fn save(&self, user: &User) -> DatabaseResult<User> {
        user.validate()?;

        let mut tx = self.db.pool().begin().await?;
        let saved = write(&mut *tx, user).await?;
        tx.commit().await?;

        Ok(saved)
    }

    /// Delete a user together with its connections
    pub async fn delete(&self, user_id: i64) -> DatabaseResult<()> {
        let mut tx = self.db.pool().begin().await?;

        let connections = sqlx::query("DELETE FROM connections WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DatabaseError::not_found("User", user_id));
        }

        tx.commit().await?;
        info!(user_id, connections, "User deleted");
        Ok(())
    }

    /// Number of stored users
    pub async fn count(&self) -> DatabaseResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM users")
            .fetch_one(self.db.pool())
            .await?;
        codec::integer(&row, "total")
    }
}

async fn write(conn: &mut AnyConnection, user: &User) -> DatabaseResult<User> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE users SET
            password_hash = $2, email = $3, first_name = $4, last_name = $5,
            phone_number = $6, company = $7, number_of_employees = $8, province = $9,
            profile_picture_url = $10, status = $11, my_resume_content = $12,
            subscription = $13, updated_at = $14
        WHERE user_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user.user_id)
    .bind(&user.password_hash)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone_number)
    .bind(&user.company)
    .bind(user.number_of_employees.map(|n| n.as_str()))
    .bind(user.province.as_str())
    .bind(&user.profile_picture_url)
    .bind(user.status)
    .bind(&user.my_resume_content)
    .bind(user.subscription.as_str())
    .bind(codec::encode_timestamp(Utc::now()))
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", user.user_id))?;

    from_row(&row)
}

fn from_row(row: &AnyRow) -> DatabaseResult<User> {
    Ok(User {
        user_id: codec::integer(row, "user_id")?,
        username: codec::text(row, "username")?,
        password_hash: codec::text(row, "password_hash")?,
        email: codec::text(row, "email")?,
        first_name: codec::text(row, "first_name")?,
        last_name: codec::text(row, "last_name")?,
        phone_number: codec::optional_text(row, "phone_number")?,
        company: codec::optional_text(row, "company")?,
        number_of_employees: codec::optional_closed(row, "number_of_employees")?,
        province: codec::closed(row, "province")?,
        profile_picture_url: codec::optional_text(row, "profile_picture_url")?,
        security_question: codec::closed(row, "security_question")?,
        security_answer: codec::text(row, "security_answer")?,
        status: codec::integer(row, "status")?,
        my_resume_content: codec::text(row, "my_resume_content")?,
        subscription: codec::closed(row, "subscription")?,
        created_at: codec::timestamp(row, "created_at")?,
        updated_at: codec::timestamp(row, "updated_at")?,
    })
}
