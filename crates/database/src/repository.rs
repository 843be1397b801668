use crate::DbError;
use core_types::{SortColumn, SortOrder, Student, StudentInput};
use sqlx::postgres::{PgPool, Postgres};
use sqlx::QueryBuilder;

const SELECT_STUDENTS: &str = "SELECT id, nim, nama, nilai FROM mahasiswa";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches every student, ordered by the given column and direction.
    pub async fn list_students(
        &self,
        column: SortColumn,
        order: SortOrder,
    ) -> Result<Vec<Student>, DbError> {
        let sql = list_query(column, order);
        let students = sqlx::query_as::<_, Student>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    /// Fetches the students matching every supplied filter, ordered by id.
    ///
    /// With neither a search text nor a minimum score this returns an empty
    /// list without querying; listing everything is `list_students`' job.
    pub async fn search_students(
        &self,
        text: &str,
        min_score: Option<f64>,
    ) -> Result<Vec<Student>, DbError> {
        let Some(mut builder) = search_query(text, min_score) else {
            return Ok(Vec::new());
        };
        let students = builder
            .build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    /// Returns true if any student already holds this NIM.
    pub async fn exists_by_nim(&self, nim: &str) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM mahasiswa WHERE nim = $1)",
        )
        .bind(nim)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Returns true if a student other than `exclude_id` holds this NIM.
    pub async fn exists_by_nim_except(&self, nim: &str, exclude_id: i32) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM mahasiswa WHERE nim = $1 AND id <> $2)",
        )
        .bind(nim)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Inserts a new student and returns the id the database assigned.
    pub async fn create_student(&self, input: &StudentInput) -> Result<i32, DbError> {
        if self.exists_by_nim(&input.nim).await? {
            return Err(DbError::DuplicateNim(input.nim.clone()));
        }

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO mahasiswa (nim, nama, nilai) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.nim)
        .bind(&input.name)
        .bind(input.score)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| duplicate_or_query_error(e, &input.nim))?;

        tracing::info!(id, nim = %input.nim, "Student created.");
        Ok(id)
    }

    /// Fetches a single student by id.
    pub async fn get_student(&self, id: i32) -> Result<Student, DbError> {
        let query = format!("{SELECT_STUDENTS} WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    /// Overwrites all editable fields of an existing student.
    pub async fn update_student(&self, id: i32, input: &StudentInput) -> Result<(), DbError> {
        if self.exists_by_nim_except(&input.nim, id).await? {
            return Err(DbError::DuplicateNim(input.nim.clone()));
        }

        let result = sqlx::query("UPDATE mahasiswa SET nim = $1, nama = $2, nilai = $3 WHERE id = $4")
            .bind(&input.nim)
            .bind(&input.name)
            .bind(input.score)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| duplicate_or_query_error(e, &input.nim))?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(id, nim = %input.nim, "Student updated.");
        Ok(())
    }

    /// Deletes a student by id and returns the number of rows removed.
    ///
    /// Deleting an id that does not exist removes nothing and is not an error.
    pub async fn delete_student(&self, id: i32) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM mahasiswa WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(id, rows = result.rows_affected(), "Student deleted.");
        Ok(result.rows_affected())
    }
}

/// Builds the listing query. Column and direction come from the allow-list
/// enums; nothing user-supplied is formatted into the SQL.
fn list_query(column: SortColumn, order: SortOrder) -> String {
    match column {
        SortColumn::Id => format!("{SELECT_STUDENTS} ORDER BY id {}", order.as_sql()),
        // Ties fall back to id so the page order is stable between requests.
        _ => format!(
            "{SELECT_STUDENTS} ORDER BY {} {}, id ASC",
            column.as_sql(),
            order.as_sql()
        ),
    }
}

/// Builds the search query, or `None` when no filter is active.
fn search_query(text: &str, min_score: Option<f64>) -> Option<QueryBuilder<'static, Postgres>> {
    let text = text.trim();
    if text.is_empty() && min_score.is_none() {
        return None;
    }

    let mut builder = QueryBuilder::new(SELECT_STUDENTS);
    builder.push(" WHERE ");

    if !text.is_empty() {
        builder
            .push("(nim = ")
            .push_bind(text.to_string())
            .push(" OR nama ILIKE ")
            .push_bind(format!("%{}%", escape_like(text)))
            .push(")");
    }
    if let Some(min_score) = min_score {
        if !text.is_empty() {
            builder.push(" AND ");
        }
        builder.push("nilai > ").push_bind(min_score);
    }

    builder.push(" ORDER BY id ASC");
    Some(builder)
}

/// Escapes `LIKE` wildcards so the search text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A write that trips the unique index on `nim` lost a race with another
/// writer after passing the existence check. Report it like the check would have.
fn duplicate_or_query_error(err: sqlx::Error, nim: &str) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DbError::DuplicateNim(nim.to_string());
        }
    }
    DbError::QueryError(err)
}
