//! In-memory storage - transient variant.
//!
//! Used when no `DATABASE_URL` is configured. State lives behind a lock
//! owned by the [`MemoryStorage`] value for the process lifetime and is lost
//! on restart. Observable behavior (id assignment, listing order,
//! display-order defaults) matches the Postgres variant so callers cannot
//! tell which backend is active.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::error::{StorageError, StorageResult};
use super::Storage;
use crate::models::{
    Contact, NewContact, NewProject, NewTestimonial, NewUser, Project, ProjectPatch, Testimonial,
    TestimonialPatch, User,
};

/// First id handed out by each per-entity counter.
const ID_FIRST: i64 = 1;

/// Keyed tables and id counters.
///
/// `BTreeMap` iteration is id-ascending, and ids are assigned monotonically,
/// so plain iteration yields creation order. Counters never move backwards,
/// even after deletes.
#[derive(Debug)]
struct Tables {
    users: BTreeMap<i64, User>,
    projects: BTreeMap<i64, Project>,
    contacts: BTreeMap<i64, Contact>,
    testimonials: BTreeMap<i64, Testimonial>,
    next_user_id: i64,
    next_project_id: i64,
    next_contact_id: i64,
    next_testimonial_id: i64,
}

impl Tables {
    fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            projects: BTreeMap::new(),
            contacts: BTreeMap::new(),
            testimonials: BTreeMap::new(),
            next_user_id: ID_FIRST,
            next_project_id: ID_FIRST,
            next_contact_id: ID_FIRST,
            next_testimonial_id: ID_FIRST,
        }
    }
}

fn next_id(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

/// Process-local storage backend.
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return Err(StorageError::conflict(format!(
                "username already taken: {}",
                user.username
            )));
        }

        let id = next_id(&mut tables.next_user_id);
        let user = User {
            id,
            username: user.username,
            password: user.password,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.values().cloned().collect())
    }

    async fn get_project(&self, id: i64) -> StorageResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.get(&id).cloned())
    }

    async fn create_project(&self, project: NewProject) -> StorageResult<Project> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_project_id);
        let project = Project {
            id,
            title: project.title,
            description: project.description,
            image_url: project.image_url,
            tags: project.tags,
            project_url: project.project_url,
            github_url: project.github_url,
            created_at: Utc::now(),
        };
        tables.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: i64,
        patch: ProjectPatch,
    ) -> StorageResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        let Some(project) = tables.projects.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(image_url) = patch.image_url {
            project.image_url = Some(image_url);
        }
        if let Some(tags) = patch.tags {
            project.tags = tags;
        }
        if let Some(project_url) = patch.project_url {
            project.project_url = Some(project_url);
        }
        if let Some(github_url) = patch.github_url {
            project.github_url = Some(github_url);
        }

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.projects.remove(&id).is_some())
    }

    async fn list_contacts(&self) -> StorageResult<Vec<Contact>> {
        let tables = self.tables.read().await;
        Ok(tables.contacts.values().cloned().collect())
    }

    async fn create_contact(&self, contact: NewContact) -> StorageResult<Contact> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_contact_id);
        let contact = Contact {
            id,
            name: contact.name,
            email: contact.email,
            message: contact.message,
            subject: contact.subject,
            created_at: Utc::now(),
        };
        tables.contacts.insert(id, contact.clone());
        Ok(contact)
    }

    async fn list_testimonials(&self) -> StorageResult<Vec<Testimonial>> {
        let tables = self.tables.read().await;
        let mut testimonials: Vec<Testimonial> =
            tables.testimonials.values().cloned().collect();
        // Stable sort keeps id order within equal display orders.
        testimonials.sort_by_key(|t| t.display_order);
        Ok(testimonials)
    }

    async fn get_testimonial(&self, id: i64) -> StorageResult<Option<Testimonial>> {
        let tables = self.tables.read().await;
        Ok(tables.testimonials.get(&id).cloned())
    }

    async fn create_testimonial(
        &self,
        testimonial: NewTestimonial,
    ) -> StorageResult<Testimonial> {
        let mut tables = self.tables.write().await;
        let display_order = testimonial
            .display_order
            .unwrap_or(tables.testimonials.len() as i32 + 1);

        let id = next_id(&mut tables.next_testimonial_id);
        let testimonial = Testimonial {
            id,
            name: testimonial.name,
            role: testimonial.role,
            company: testimonial.company,
            quote: testimonial.quote,
            image_url: testimonial.image_url,
            display_order,
            created_at: Utc::now(),
        };
        tables.testimonials.insert(id, testimonial.clone());
        Ok(testimonial)
    }

    async fn update_testimonial(
        &self,
        id: i64,
        patch: TestimonialPatch,
    ) -> StorageResult<Option<Testimonial>> {
        let mut tables = self.tables.write().await;
        let Some(testimonial) = tables.testimonials.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            testimonial.name = name;
        }
        if let Some(role) = patch.role {
            testimonial.role = role;
        }
        if let Some(company) = patch.company {
            testimonial.company = company;
        }
        if let Some(quote) = patch.quote {
            testimonial.quote = quote;
        }
        if let Some(image_url) = patch.image_url {
            testimonial.image_url = Some(image_url);
        }
        if let Some(display_order) = patch.display_order {
            testimonial.display_order = display_order;
        }

        Ok(Some(testimonial.clone()))
    }

    async fn delete_testimonial(&self, id: i64) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.testimonials.remove(&id).is_some())
    }
}

// =============================================================================
// Tests
// =============================================================================
