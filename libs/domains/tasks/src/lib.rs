//! Tasks Domain
//!
//! Tasks belong to exactly one project and carry a status that is derived
//! lazily: whenever a task is created, read, listed or updated, an elapsed
//! due date moves it to [`TaskStatus::Overdue`] and the change is persisted
//! in the same unit of work.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP routes, OpenAPI
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, pagination, filters, clock
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ Repository  │  ← Transactions, status refresh
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{PgTaskRepository, TaskService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let repository = PgTaskRepository::new(db);
//! let service = TaskService::new(repository);
//! let app = domain_tasks::handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use filter::TaskFilter;
pub use handlers::ApiDoc;
pub use lifecycle::derive_status;
pub use models::{CreateTask, Task, TaskIdQuery, TaskListParams, TaskStatus, UpdateTask};
pub use postgres::PgTaskRepository;
pub use repository::TaskRepository;
pub use service::TaskService;
