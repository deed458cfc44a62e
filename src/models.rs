//! Entity records and request payloads.
//!
//! Four independent record kinds with no relationships between them: users,
//! projects, contacts, and testimonials. The server assigns ids and creation
//! timestamps; everything else comes from the client.
//!
//! Each kind with an HTTP write surface has a draft type that deserializes
//! any JSON object shape and then validates itself into either a complete
//! insert payload or a sparse patch. Validation reports every violation at
//! once as `{field, message}` pairs rather than failing on the first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Field Limits
// =============================================================================

/// Maximum byte length of short display fields (names, roles, companies).
pub const DISPLAY_NAME_BYTES_MAX: usize = 120;

/// Maximum byte length of a project title.
pub const TITLE_BYTES_MAX: usize = 200;

/// Maximum byte length of free-text fields (descriptions, messages, quotes).
pub const BODY_TEXT_BYTES_MAX: usize = 10_000;

/// Maximum byte length of an email address.
pub const EMAIL_BYTES_MAX: usize = 320;

/// Maximum byte length of a URL field.
pub const URL_BYTES_MAX: usize = 2_048;

/// Maximum number of tags on a project.
pub const TAGS_COUNT_MAX: usize = 32;

/// Maximum byte length of a single tag.
pub const TAG_BYTES_MAX: usize = 64;

// =============================================================================
// Validation
// =============================================================================

/// A single field-level complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// What was wrong with it.
    pub message: String,
}

/// Itemized validation failure for a request payload.
#[derive(Debug, Clone, Error)]
#[error("validation failed on {} field(s)", .errors.len())]
pub struct ValidationError {
    /// All violations found, one per offending field.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Names of the offending fields, in report order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }
}

/// Collects field errors while a draft is checked.
///
/// The check methods record violations and return placeholder values on the
/// error path; `finish` fails whenever anything was recorded, so a
/// placeholder never escapes into a validated payload.
#[derive(Debug, Default)]
struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Required non-blank string of at most `max` bytes.
    fn required(&mut self, field: &'static str, value: Option<String>, max: usize) -> String {
        match value {
            None => {
                self.push(field, "is required");
                String::new()
            }
            Some(s) if s.trim().is_empty() => {
                self.push(field, "is required");
                String::new()
            }
            Some(s) if s.len() > max => {
                self.push(field, format!("must be at most {max} bytes"));
                String::new()
            }
            Some(s) => s,
        }
    }

    /// Field that may be absent, but when present must be non-blank and
    /// within `max` bytes. Used for patches of required columns.
    fn present(&mut self, field: &'static str, value: Option<String>, max: usize) -> Option<String> {
        match value {
            None => None,
            Some(s) if s.trim().is_empty() => {
                self.push(field, "must not be blank");
                None
            }
            Some(s) if s.len() > max => {
                self.push(field, format!("must be at most {max} bytes"));
                None
            }
            Some(s) => Some(s),
        }
    }

    /// Optional string of at most `max` bytes.
    fn bounded(&mut self, field: &'static str, value: Option<String>, max: usize) -> Option<String> {
        match value {
            Some(s) if s.len() > max => {
                self.push(field, format!("must be at most {max} bytes"));
                None
            }
            other => other,
        }
    }

    /// Required email address with a plausible `local@domain` shape.
    fn email(&mut self, field: &'static str, value: Option<String>) -> String {
        let value = self.required(field, value, EMAIL_BYTES_MAX);
        if !value.is_empty() && !is_plausible_email(&value) {
            self.push(field, "must be a valid email address");
        }
        value
    }

    /// Tag list with count and per-tag length caps.
    fn tags(&mut self, value: Option<Vec<String>>) -> Option<Vec<String>> {
        let tags = value?;
        if tags.len() > TAGS_COUNT_MAX {
            self.push("tags", format!("must have at most {TAGS_COUNT_MAX} entries"));
            return None;
        }
        if tags
            .iter()
            .any(|t| t.trim().is_empty() || t.len() > TAG_BYTES_MAX)
        {
            self.push(
                "tags",
                format!("entries must be non-empty and at most {TAG_BYTES_MAX} bytes"),
            );
            return None;
        }
        Some(tags)
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

/// Loose shape check: one `@` with a non-empty local part and a dotted
/// domain, no whitespace anywhere.
fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

// =============================================================================
// User
// =============================================================================

/// A stored user account.
///
/// Users have no HTTP surface in this service; they exist at the storage
/// level for administrative tooling. The password is an opaque string to
/// this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate id assigned by the backend.
    pub id: i64,
    /// Login name, unique across all users.
    pub username: String,
    /// Opaque password string.
    pub password: String,
}

/// Payload for creating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    /// Login name, unique across all users.
    pub username: String,
    /// Opaque password string.
    pub password: String,
}

// =============================================================================
// Project
// =============================================================================

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Surrogate id assigned by the backend; immutable once assigned.
    pub id: i64,
    /// Project title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Optional cover image URL.
    pub image_url: Option<String>,
    /// Ordered list of tag strings.
    pub tags: Vec<String>,
    /// Optional link to the live project.
    pub project_url: Option<String>,
    /// Optional link to the source repository.
    pub github_url: Option<String>,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated payload for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    /// Project title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Optional cover image URL.
    pub image_url: Option<String>,
    /// Ordered list of tag strings; empty when omitted.
    pub tags: Vec<String>,
    /// Optional link to the live project.
    pub project_url: Option<String>,
    /// Optional link to the source repository.
    pub github_url: Option<String>,
}

/// Sparse project update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement cover image URL.
    pub image_url: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement live-project link.
    pub project_url: Option<String>,
    /// Replacement repository link.
    pub github_url: Option<String>,
}

/// Raw JSON body of a project create or patch request.
///
/// Every field is optional at the deserialization layer so validation can
/// report all missing fields at once instead of failing on the first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDraft {
    /// Project title.
    pub title: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Cover image URL.
    pub image_url: Option<String>,
    /// Tag strings.
    pub tags: Option<Vec<String>>,
    /// Link to the live project.
    pub project_url: Option<String>,
    /// Link to the source repository.
    pub github_url: Option<String>,
}

impl ProjectDraft {
    /// Validate into a complete insert payload.
    ///
    /// # Errors
    /// Returns every field violation at once.
    pub fn into_new(self) -> Result<NewProject, ValidationError> {
        let mut v = Violations::default();
        let title = v.required("title", self.title, TITLE_BYTES_MAX);
        let description = v.required("description", self.description, BODY_TEXT_BYTES_MAX);
        let image_url = v.bounded("image_url", self.image_url, URL_BYTES_MAX);
        let tags = v.tags(self.tags).unwrap_or_default();
        let project_url = v.bounded("project_url", self.project_url, URL_BYTES_MAX);
        let github_url = v.bounded("github_url", self.github_url, URL_BYTES_MAX);
        v.finish()?;

        Ok(NewProject {
            title,
            description,
            image_url,
            tags,
            project_url,
            github_url,
        })
    }

    /// Validate into a sparse patch; only present fields are checked.
    ///
    /// # Errors
    /// Returns every field violation at once. An empty body is a valid,
    /// no-op patch.
    pub fn into_patch(self) -> Result<ProjectPatch, ValidationError> {
        let mut v = Violations::default();
        let title = v.present("title", self.title, TITLE_BYTES_MAX);
        let description = v.present("description", self.description, BODY_TEXT_BYTES_MAX);
        let image_url = v.bounded("image_url", self.image_url, URL_BYTES_MAX);
        let tags = v.tags(self.tags);
        let project_url = v.bounded("project_url", self.project_url, URL_BYTES_MAX);
        let github_url = v.bounded("github_url", self.github_url, URL_BYTES_MAX);
        v.finish()?;

        Ok(ProjectPatch {
            title,
            description,
            image_url,
            tags,
            project_url,
            github_url,
        })
    }
}

// =============================================================================
// Contact
// =============================================================================

/// A contact form submission.
///
/// Write-only from the public surface; the list is an administrative read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Surrogate id assigned by the backend.
    pub id: i64,
    /// Sender name.
    pub name: String,
    /// Sender email address.
    pub email: String,
    /// Message body.
    pub message: String,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated payload for a contact submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    /// Sender name.
    pub name: String,
    /// Sender email address.
    pub email: String,
    /// Message body.
    pub message: String,
    /// Optional subject line.
    pub subject: Option<String>,
}

/// Raw JSON body of a contact submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactDraft {
    /// Sender name.
    pub name: Option<String>,
    /// Sender email address.
    pub email: Option<String>,
    /// Message body.
    pub message: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
}

impl ContactDraft {
    /// Validate into a complete insert payload.
    ///
    /// # Errors
    /// Returns every field violation at once.
    pub fn into_new(self) -> Result<NewContact, ValidationError> {
        let mut v = Violations::default();
        let name = v.required("name", self.name, DISPLAY_NAME_BYTES_MAX);
        let email = v.email("email", self.email);
        let message = v.required("message", self.message, BODY_TEXT_BYTES_MAX);
        let subject = v.bounded("subject", self.subject, TITLE_BYTES_MAX);
        v.finish()?;

        Ok(NewContact {
            name,
            email,
            message,
            subject,
        })
    }
}

// =============================================================================
// Testimonial
// =============================================================================

/// A client testimonial shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    /// Surrogate id assigned by the backend.
    pub id: i64,
    /// Person quoted.
    pub name: String,
    /// Their role.
    pub role: String,
    /// Their company.
    pub company: String,
    /// The quote itself.
    pub quote: String,
    /// Optional portrait URL.
    pub image_url: Option<String>,
    /// Presentation order; listings sort by this ascending.
    pub display_order: i32,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated payload for creating a testimonial.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTestimonial {
    /// Person quoted.
    pub name: String,
    /// Their role.
    pub role: String,
    /// Their company.
    pub company: String,
    /// The quote itself.
    pub quote: String,
    /// Optional portrait URL.
    pub image_url: Option<String>,
    /// Presentation order; when unset the storage layer assigns the current
    /// testimonial count plus one.
    pub display_order: Option<i32>,
}

/// Sparse testimonial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestimonialPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement role.
    pub role: Option<String>,
    /// Replacement company.
    pub company: Option<String>,
    /// Replacement quote.
    pub quote: Option<String>,
    /// Replacement portrait URL.
    pub image_url: Option<String>,
    /// Replacement presentation order.
    pub display_order: Option<i32>,
}

/// Raw JSON body of a testimonial create or patch request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialDraft {
    /// Person quoted.
    pub name: Option<String>,
    /// Their role.
    pub role: Option<String>,
    /// Their company.
    pub company: Option<String>,
    /// The quote itself.
    pub quote: Option<String>,
    /// Portrait URL.
    pub image_url: Option<String>,
    /// Presentation order.
    pub display_order: Option<i32>,
}

impl TestimonialDraft {
    /// Validate into a complete insert payload.
    ///
    /// # Errors
    /// Returns every field violation at once.
    pub fn into_new(self) -> Result<NewTestimonial, ValidationError> {
        let mut v = Violations::default();
        let name = v.required("name", self.name, DISPLAY_NAME_BYTES_MAX);
        let role = v.required("role", self.role, DISPLAY_NAME_BYTES_MAX);
        let company = v.required("company", self.company, DISPLAY_NAME_BYTES_MAX);
        let quote = v.required("quote", self.quote, BODY_TEXT_BYTES_MAX);
        let image_url = v.bounded("image_url", self.image_url, URL_BYTES_MAX);
        v.finish()?;

        Ok(NewTestimonial {
            name,
            role,
            company,
            quote,
            image_url,
            display_order: self.display_order,
        })
    }

    /// Validate into a sparse patch; only present fields are checked.
    ///
    /// # Errors
    /// Returns every field violation at once.
    pub fn into_patch(self) -> Result<TestimonialPatch, ValidationError> {
        let mut v = Violations::default();
        let name = v.present("name", self.name, DISPLAY_NAME_BYTES_MAX);
        let role = v.present("role", self.role, DISPLAY_NAME_BYTES_MAX);
        let company = v.present("company", self.company, DISPLAY_NAME_BYTES_MAX);
        let quote = v.present("quote", self.quote, BODY_TEXT_BYTES_MAX);
        let image_url = v.bounded("image_url", self.image_url, URL_BYTES_MAX);
        v.finish()?;

        Ok(TestimonialPatch {
            name,
            role,
            company,
            quote,
            image_url,
            display_order: self.display_order,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
