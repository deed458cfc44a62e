//! Storage - capability trait and interchangeable backends.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Storage Trait                         │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴────────┐
//! │  MemoryStorage  │           │ PostgresStorage │
//! │   (transient)   │           │  (persistent)   │
//! └─────────────────┘           └─────────────────┘
//! ```
//!
//! The backend is selected exactly once at startup by [`connect`]; handlers
//! only ever see `Arc<dyn Storage>`. Both variants honor the same contract:
//! ids are assigned monotonically from 1, projects and contacts list in
//! creation order, testimonials list by display order, and an unset
//! testimonial display order defaults to the current count plus one.

mod error;
mod memory;
mod postgres;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{
    Contact, NewContact, NewProject, NewTestimonial, NewUser, Project, ProjectPatch, Testimonial,
    TestimonialPatch, User,
};

/// Capability interface over the four entity kinds.
///
/// Lookups return `Ok(None)` and deletes `Ok(false)` when the id does not
/// exist; errors mean the backend itself failed.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get a user by id.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn get_user(&self, id: i64) -> StorageResult<Option<User>>;

    /// Get a user by exact username.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Create a user, assigning an id.
    ///
    /// # Errors
    /// Returns [`StorageError::Conflict`] when the username is taken.
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;

    /// List all projects in creation order.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn list_projects(&self) -> StorageResult<Vec<Project>>;

    /// Get a project by id.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn get_project(&self, id: i64) -> StorageResult<Option<Project>>;

    /// Create a project, assigning an id and creation timestamp.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn create_project(&self, project: NewProject) -> StorageResult<Project>;

    /// Apply a sparse patch to a project; absent fields are unchanged.
    /// Returns the merged record, or `None` if the id does not exist.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn update_project(&self, id: i64, patch: ProjectPatch)
        -> StorageResult<Option<Project>>;

    /// Delete a project. Returns whether a record existed and was removed.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn delete_project(&self, id: i64) -> StorageResult<bool>;

    /// List all contact submissions in creation order.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn list_contacts(&self) -> StorageResult<Vec<Contact>>;

    /// Record a contact submission, assigning an id and creation timestamp.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn create_contact(&self, contact: NewContact) -> StorageResult<Contact>;

    /// List all testimonials ordered by display order ascending.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn list_testimonials(&self) -> StorageResult<Vec<Testimonial>>;

    /// Get a testimonial by id.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn get_testimonial(&self, id: i64) -> StorageResult<Option<Testimonial>>;

    /// Create a testimonial. An unset display order defaults to the current
    /// testimonial count plus one.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn create_testimonial(&self, testimonial: NewTestimonial)
        -> StorageResult<Testimonial>;

    /// Apply a sparse patch to a testimonial; absent fields are unchanged.
    /// Returns the merged record, or `None` if the id does not exist.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn update_testimonial(
        &self,
        id: i64,
        patch: TestimonialPatch,
    ) -> StorageResult<Option<Testimonial>>;

    /// Delete a testimonial. Returns whether a record existed and was
    /// removed.
    ///
    /// # Errors
    /// Fails only on backend failure.
    async fn delete_testimonial(&self, id: i64) -> StorageResult<bool>;
}

/// Construct the storage backend for this process.
///
/// A connection string selects the persistent variant; its absence selects
/// the transient one. The choice is made once and never revisited.
///
/// # Errors
/// Fails when the Postgres connection or schema initialization fails.
pub async fn connect(database_url: Option<&str>) -> StorageResult<Arc<dyn Storage>> {
    match database_url {
        Some(url) => {
            let storage = PostgresStorage::new(url).await?;
            tracing::info!("connected to Postgres storage");
            Ok(Arc::new(storage))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage; state is lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
