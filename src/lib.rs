//! Folio - Portfolio Site Backend
//!
//! A small JSON API backing a single-page portfolio site: CRUD for projects
//! and testimonials, write-only public contact submissions with an
//! administrative read, and a health check for uptime monitors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HTTP Layer (axum)                        │
//! │  /api/projects  /api/testimonials  /api/contact  /api/health│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Storage Trait                          │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑                              ↑
//!          │                              │
//! ┌────────┴────────┐           ┌────────┴────────┐
//! │  MemoryStorage  │           │ PostgresStorage │
//! │  (no database)  │           │  (DATABASE_URL) │
//! └─────────────────┘           └─────────────────┘
//! ```
//!
//! The backend is chosen exactly once at startup: when `DATABASE_URL` is
//! set the Postgres variant is constructed and used for the lifetime of the
//! process, otherwise the in-memory variant. Both variants honor the same
//! contract (ordering, id assignment, display-order defaults), so handlers
//! cannot tell which one is active.
//!
//! # Known gap
//!
//! The administrative surfaces (`GET /api/contact` and testimonial writes)
//! are unauthenticated. They are meant to sit behind an external
//! access-control layer before any production exposure.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod http;
pub mod models;
pub mod storage;

/// Default HTTP bind address.
pub const HTTP_BIND_ADDRESS_DEFAULT: &str = "127.0.0.1:5000";

/// Application name.
pub const APP_NAME: &str = "folio";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
