//! Postgres storage - persistent variant.
//!
//! # Schema
//!
//! Four independent tables keyed by a backend-assigned `BIGSERIAL` id, with
//! insert-time `created_at` defaults. No foreign keys; deletes never
//! cascade.
//!
//! Every operation is a single statement scoped by primary-key equality.
//! Partial updates are one `UPDATE ... SET col = COALESCE($n, col)`, and the
//! testimonial display-order default (current count plus one) is computed
//! inside the insert so this variant and the in-memory one agree.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use super::error::{StorageError, StorageResult};
use super::Storage;
use crate::models::{
    Contact, NewContact, NewProject, NewTestimonial, NewUser, Project, ProjectPatch, Testimonial,
    TestimonialPatch, User,
};

/// Upper bound on pooled connections.
const POOL_CONNECTIONS_MAX: u32 = 10;

/// SQLSTATE code raised by unique-constraint violations.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

const SCHEMA_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL
)
"#;

const SCHEMA_PROJECTS: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    image_url TEXT,
    tags TEXT[] NOT NULL DEFAULT '{}',
    project_url TEXT,
    github_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const SCHEMA_CONTACTS: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    message TEXT NOT NULL,
    subject TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const SCHEMA_TESTIMONIALS: &str = r#"
CREATE TABLE IF NOT EXISTS testimonials (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    company TEXT NOT NULL,
    quote TEXT NOT NULL,
    image_url TEXT,
    display_order INT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// PostgreSQL storage backend.
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connect and initialize the schema.
    ///
    /// # Errors
    /// Fails when the connection cannot be established or the schema cannot
    /// be created.
    ///
    /// # Panics
    /// Panics if the connection string is empty or not a postgres URL;
    /// configuration filters those out before this is reached.
    pub async fn new(connection_string: &str) -> StorageResult<Self> {
        // Preconditions
        assert!(
            !connection_string.is_empty(),
            "connection string cannot be empty"
        );
        assert!(
            connection_string.starts_with("postgres://")
                || connection_string.starts_with("postgresql://"),
            "connection string must be a postgres URL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(POOL_CONNECTIONS_MAX)
            .connect(connection_string)
            .await
            .map_err(|e| StorageError::connection(format!("failed to connect: {e}")))?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Create any missing tables.
    async fn init_schema(&self) -> StorageResult<()> {
        for schema in [
            SCHEMA_USERS,
            SCHEMA_PROJECTS,
            SCHEMA_CONTACTS,
            SCHEMA_TESTIMONIALS,
        ] {
            sqlx::query(schema)
                .execute(&self.pool)
                .await
                .map_err(|e| StorageError::internal(format!("failed to create schema: {e}")))?;
        }

        Ok(())
    }

    /// Get the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

fn row_to_user(row: &PgRow) -> StorageResult<User> {
    Ok(User {
        id: row
            .try_get("id")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        username: row
            .try_get("username")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        password: row
            .try_get("password")
            .map_err(|e| StorageError::internal(e.to_string()))?,
    })
}

fn row_to_project(row: &PgRow) -> StorageResult<Project> {
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| StorageError::internal(e.to_string()))?;

    Ok(Project {
        id: row
            .try_get("id")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        title: row
            .try_get("title")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        tags: row
            .try_get("tags")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        project_url: row
            .try_get("project_url")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        github_url: row
            .try_get("github_url")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        created_at,
    })
}

fn row_to_contact(row: &PgRow) -> StorageResult<Contact> {
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| StorageError::internal(e.to_string()))?;

    Ok(Contact {
        id: row
            .try_get("id")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        email: row
            .try_get("email")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        message: row
            .try_get("message")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        subject: row
            .try_get("subject")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        created_at,
    })
}

fn row_to_testimonial(row: &PgRow) -> StorageResult<Testimonial> {
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| StorageError::internal(e.to_string()))?;

    Ok(Testimonial {
        id: row
            .try_get("id")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        role: row
            .try_get("role")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        company: row
            .try_get("company")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        quote: row
            .try_get("quote")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        display_order: row
            .try_get("display_order")
            .map_err(|e| StorageError::internal(e.to_string()))?,
        created_at,
    })
}

// =============================================================================
// Storage Implementation
// =============================================================================

#[async_trait]
impl Storage for PostgresStorage {
    async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::read(format!("failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::read(format!("failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let row = sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2) RETURNING *")
            .bind(&user.username)
            .bind(&user.password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db)
                    if db.code().as_deref() == Some(SQLSTATE_UNIQUE_VIOLATION) =>
                {
                    StorageError::conflict(format!("username already taken: {}", user.username))
                }
                _ => StorageError::write(format!("failed to create user: {e}")),
            })?;

        row_to_user(&row)
    }

    async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::read(format!("failed to list projects: {e}")))?;

        rows.iter().map(row_to_project).collect()
    }

    async fn get_project(&self, id: i64) -> StorageResult<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::read(format!("failed to get project: {e}")))?;

        row.as_ref().map(row_to_project).transpose()
    }

    async fn create_project(&self, project: NewProject) -> StorageResult<Project> {
        let row = sqlx::query(
            r#"
            INSERT INTO projects (title, description, image_url, tags, project_url, github_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image_url)
        .bind(&project.tags)
        .bind(&project.project_url)
        .bind(&project.github_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::write(format!("failed to create project: {e}")))?;

        row_to_project(&row)
    }

    async fn update_project(
        &self,
        id: i64,
        patch: ProjectPatch,
    ) -> StorageResult<Option<Project>> {
        let row = sqlx::query(
            r#"
            UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                tags = COALESCE($5, tags),
                project_url = COALESCE($6, project_url),
                github_url = COALESCE($7, github_url)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(&patch.image_url)
        .bind(&patch.tags)
        .bind(&patch.project_url)
        .bind(&patch.github_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::write(format!("failed to update project: {e}")))?;

        row.as_ref().map(row_to_project).transpose()
    }

    async fn delete_project(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::write(format!("failed to delete project: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_contacts(&self) -> StorageResult<Vec<Contact>> {
        let rows = sqlx::query("SELECT * FROM contacts ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::read(format!("failed to list contacts: {e}")))?;

        rows.iter().map(row_to_contact).collect()
    }

    async fn create_contact(&self, contact: NewContact) -> StorageResult<Contact> {
        let row = sqlx::query(
            r#"
            INSERT INTO contacts (name, email, message, subject)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.message)
        .bind(&contact.subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::write(format!("failed to create contact: {e}")))?;

        row_to_contact(&row)
    }

    async fn list_testimonials(&self) -> StorageResult<Vec<Testimonial>> {
        let rows = sqlx::query("SELECT * FROM testimonials ORDER BY display_order ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::read(format!("failed to list testimonials: {e}")))?;

        rows.iter().map(row_to_testimonial).collect()
    }

    async fn get_testimonial(&self, id: i64) -> StorageResult<Option<Testimonial>> {
        let row = sqlx::query("SELECT * FROM testimonials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::read(format!("failed to get testimonial: {e}")))?;

        row.as_ref().map(row_to_testimonial).transpose()
    }

    async fn create_testimonial(
        &self,
        testimonial: NewTestimonial,
    ) -> StorageResult<Testimonial> {
        let row = sqlx::query(
            r#"
            INSERT INTO testimonials (name, role, company, quote, image_url, display_order)
            VALUES ($1, $2, $3, $4, $5,
                    COALESCE($6, (SELECT COUNT(*)::INT + 1 FROM testimonials)))
            RETURNING *
            "#,
        )
        .bind(&testimonial.name)
        .bind(&testimonial.role)
        .bind(&testimonial.company)
        .bind(&testimonial.quote)
        .bind(&testimonial.image_url)
        .bind(testimonial.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::write(format!("failed to create testimonial: {e}")))?;

        row_to_testimonial(&row)
    }

    async fn update_testimonial(
        &self,
        id: i64,
        patch: TestimonialPatch,
    ) -> StorageResult<Option<Testimonial>> {
        let row = sqlx::query(
            r#"
            UPDATE testimonials SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                company = COALESCE($4, company),
                quote = COALESCE($5, quote),
                image_url = COALESCE($6, image_url),
                display_order = COALESCE($7, display_order)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.role)
        .bind(&patch.company)
        .bind(&patch.quote)
        .bind(&patch.image_url)
        .bind(patch.display_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::write(format!("failed to update testimonial: {e}")))?;

        row.as_ref().map(row_to_testimonial).transpose()
    }

    async fn delete_testimonial(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::write(format!("failed to delete testimonial: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Tests (require running Postgres)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Get test database URL from environment.
    fn test_db_url() -> Option<String> {
        env::var("TEST_POSTGRES_URL").ok()
    }

    /// Skip test if no database available.
    macro_rules! require_db {
        () => {
            match test_db_url() {
                Some(url) => url,
                None => {
                    eprintln!("Skipping test: TEST_POSTGRES_URL not set");
                    return;
                }
            }
        };
    }

    async fn clean_storage(url: &str) -> PostgresStorage {
        let storage = PostgresStorage::new(url).await.unwrap();
        sqlx::query("TRUNCATE users, projects, contacts, testimonials RESTART IDENTITY")
            .execute(storage.pool())
            .await
            .unwrap();
        storage
    }

    fn sample_project() -> NewProject {
        NewProject {
            title: "Folio".to_string(),
            description: "Portfolio backend".to_string(),
            image_url: None,
            tags: vec!["rust".to_string()],
            project_url: None,
            github_url: Some("https://github.com/example/folio".to_string()),
        }
    }

    #[tokio::test]
    async fn postgres_project_crud() {
        let url = require_db!();
        let storage = clean_storage(&url).await;

        let created = storage.create_project(sample_project()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.tags, vec!["rust"]);

        let fetched = storage.get_project(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let patch = ProjectPatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = storage
            .update_project(created.id, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.tags, created.tags);

        assert!(storage.delete_project(created.id).await.unwrap());
        assert!(!storage.delete_project(created.id).await.unwrap());
        assert!(storage.get_project(created.id).await.unwrap().is_none());

        storage.close().await;
    }

    #[tokio::test]
    async fn postgres_contact_roundtrip() {
        let url = require_db!();
        let storage = clean_storage(&url).await;

        let created = storage
            .create_contact(NewContact {
                name: "Ana".to_string(),
                email: "ana@x.com".to_string(),
                message: "hi".to_string(),
                subject: Some("hello".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let contacts = storage.list_contacts().await.unwrap();
        assert_eq!(contacts, vec![created]);

        storage.close().await;
    }

    #[tokio::test]
    async fn postgres_testimonial_order_default_and_listing() {
        let url = require_db!();
        let storage = clean_storage(&url).await;

        let sample = |order: Option<i32>| NewTestimonial {
            name: "Ana".to_string(),
            role: "CTO".to_string(),
            company: "Acme".to_string(),
            quote: "Great work".to_string(),
            image_url: None,
            display_order: order,
        };

        let first = storage.create_testimonial(sample(None)).await.unwrap();
        let second = storage.create_testimonial(sample(Some(1))).await.unwrap();
        let third = storage.create_testimonial(sample(None)).await.unwrap();

        assert_eq!(first.display_order, 1);
        assert_eq!(second.display_order, 1);
        assert_eq!(third.display_order, 3);

        let orders: Vec<i32> = storage
            .list_testimonials()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.display_order)
            .collect();
        assert!(orders.windows(2).all(|pair| pair[0] <= pair[1]));

        storage.close().await;
    }

    #[tokio::test]
    async fn postgres_duplicate_username_conflicts() {
        let url = require_db!();
        let storage = clean_storage(&url).await;

        storage
            .create_user(NewUser {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();

        let err = storage
            .create_user(NewUser {
                username: "admin".to_string(),
                password: "other".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        storage.close().await;
    }
}
