//! Table definitions for every entity
//!
//! The DDL is rendered per backend: only the surrogate key column differs.
//! Enumerated columns carry `CHECK` constraints built from the same closed
//! sets the models parse, so storage and code never disagree.

use common::{
    Backend, Database,
    error::{DatabaseError, DatabaseResult},
};
use tracing::info;

use crate::models::enums::{
    EmployeeCount, Frequency, Province, SecurityQuestion, Subscription, sql_in_list,
};

fn id_column(backend: Backend) -> &'static str {
    match backend {
        Backend::Postgres => "BIGSERIAL PRIMARY KEY",
        Backend::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
    }
}

fn check_in<T: Copy + 'static>(
    column: &str,
    all: &'static [T],
    as_str: fn(T) -> &'static str,
) -> String {
    format!(
        "CHECK ({column} IN ({}))",
        sql_in_list(all.iter().map(|v| as_str(*v)))
    )
}

/// `CREATE TABLE` statements in dependency order
pub fn statements(backend: Backend) -> Vec<String> {
    let id = id_column(backend);

    let users = format!(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id {id},
            username VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            phone_number VARCHAR(20),
            company VARCHAR(255),
            number_of_employees VARCHAR(16) {employees},
            province VARCHAR(64) NOT NULL {province},
            profile_picture_url VARCHAR(255),
            security_question VARCHAR(255) NOT NULL {question},
            security_answer VARCHAR(255) NOT NULL,
            status BIGINT NOT NULL DEFAULT 0,
            my_resume_content TEXT NOT NULL DEFAULT '',
            subscription VARCHAR(32) NOT NULL {subscription},
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        employees = check_in("number_of_employees", EmployeeCount::ALL, EmployeeCount::as_str),
        province = check_in("province", Province::ALL, Province::as_str),
        question = check_in("security_question", SecurityQuestion::ALL, SecurityQuestion::as_str),
        subscription = check_in("subscription", Subscription::ALL, Subscription::as_str),
    );

    let revoked_tokens = format!(
        r#"
        CREATE TABLE IF NOT EXISTS revoked_tokens (
            id {id},
            jwt_token TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#
    );

    let contacts = r#"
        CREATE TABLE IF NOT EXISTS contacts (
            contact_url VARCHAR(255) PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            current_location VARCHAR(255) NOT NULL,
            headline VARCHAR(255) NOT NULL,
            about TEXT NOT NULL,
            profile_pic_url VARCHAR(255) NOT NULL
        )
        "#
    .to_string();

    let experiences = format!(
        r#"
        CREATE TABLE IF NOT EXISTS experiences (
            id {id},
            contact_url VARCHAR(255) NOT NULL
                REFERENCES contacts (contact_url) ON DELETE CASCADE,
            company_name VARCHAR(255) NOT NULL,
            company_logo VARCHAR(255) NOT NULL,
            company_role VARCHAR(255) NOT NULL,
            company_location VARCHAR(255) NOT NULL,
            bulletpoints TEXT NOT NULL,
            company_duration VARCHAR(255) NOT NULL,
            company_total_duration VARCHAR(255) NOT NULL
        )
        "#
    );

    let connections = format!(
        r#"
        CREATE TABLE IF NOT EXISTS connections (
            id {id},
            user_id BIGINT NOT NULL
                REFERENCES users (user_id) ON DELETE CASCADE,
            contact_url VARCHAR(255) NOT NULL
                REFERENCES contacts (contact_url) ON DELETE CASCADE,
            frequency VARCHAR(32) NOT NULL DEFAULT 'Weekly' {frequency},
            last_interacted TEXT NOT NULL,
            notes TEXT,
            UNIQUE (user_id, contact_url)
        )
        "#,
        frequency = check_in("frequency", Frequency::ALL, Frequency::as_str),
    );

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_revoked_tokens_jwt ON revoked_tokens (jwt_token)",
        "CREATE INDEX IF NOT EXISTS idx_experiences_contact ON experiences (contact_url)",
        "CREATE INDEX IF NOT EXISTS idx_connections_contact ON connections (contact_url)",
    ];

    let mut all = vec![users, revoked_tokens, contacts, experiences, connections];
    all.extend(indexes.iter().map(|s| s.to_string()));
    all
}

/// Create every table that does not exist yet, in one transaction
pub async fn create_all(db: &Database) -> DatabaseResult<()> {
    let backend = db.backend();
    info!(?backend, "Creating schema");

    let mut tx = db.pool().begin().await?;
    for statement in statements(backend) {
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }
    tx.commit().await?;

    info!(?backend, "Schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_column_depends_on_backend() {
        let pg = statements(Backend::Postgres);
        let lite = statements(Backend::Sqlite);
        assert!(pg[0].contains("user_id BIGSERIAL PRIMARY KEY"));
        assert!(lite[0].contains("user_id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert_eq!(pg.len(), lite.len());
    }

    #[test]
    fn enum_columns_are_checked() {
        let ddl = statements(Backend::Sqlite).join("\n");
        assert!(ddl.contains("CHECK (province IN ('Alberta', 'British Columbia'"));
        assert!(ddl.contains("'Once_in_6_months'"));
        assert!(ddl.contains("UNIQUE (user_id, contact_url)"));
    }

    #[tokio::test]
    async fn create_all_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        create_all(&db).await.unwrap();
        create_all(&db).await.unwrap();
    }
}
