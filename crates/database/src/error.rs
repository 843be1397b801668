use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    Unreachable(#[source] sqlx::Error),

    /// Any other query failure. The message is the driver's own, unaltered.
    #[error("{0}")]
    QueryError(#[from] sqlx::Error),

    #[error(
        "Cannot add the unique NIM index: these NIMs belong to more than one student: {}",
        .0.join(", ")
    )]
    DuplicateNimsInTable(Vec<String>),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("The requested data was not found in the database.")]
    NotFound,

    #[error("NIM {0} is already registered")]
    DuplicateNim(String),
}
