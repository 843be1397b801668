//! # Student Registry Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database holding the `mahasiswa` (student) table.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all database-specific logic. It provides
//!   a clean API to the web server and CLI, hiding the underlying SQL.
//! - **Parameterized SQL only:** Every value is bound. The one piece of SQL that cannot
//!   be parameterized, the `ORDER BY` column and direction, is produced from the
//!   `SortColumn` / `SortOrder` allow-list enums.
//! - **Asynchronous & Pooled:** All operations are asynchronous over a bounded
//!   connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `connect`: Establishes and pings the connection pool.
//! - `run_migrations`: Applies the embedded schema migrations.
//! - `DbRepository`: Holds the pool and provides the student CRUD, listing and search methods.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
