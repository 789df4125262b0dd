//! Projects Domain
//!
//! Projects are the top-level containers that own tasks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, pagination
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Entity    │  ← Sea-ORM model
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_projects::{PgProjectRepository, ProjectService, handlers};
//!
//! let service = ProjectService::new(PgProjectRepository::new(db));
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProjectError, ProjectResult};
pub use handlers::ApiDoc;
pub use models::{CreateProject, ListParams, Project, ProjectIdQuery, UpdateProject};
pub use postgres::PgProjectRepository;
pub use repository::ProjectRepository;
pub use service::ProjectService;
