//! Books repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, LendStatus},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a book by ID, scoped to its owner. Books belonging to other
    /// users behave as nonexistent.
    pub async fn get_by_id(&self, id: Uuid, owner_id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List a user's books, newest first
    pub async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Create a new lending record
    pub async fn create(&self, owner_id: Uuid, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (owner_id, title, borrower_name, borrowed_date, return_deadline, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&book.title)
        .bind(&book.borrower_name)
        .bind(book.borrowed_date)
        .bind(book.return_deadline)
        .bind(LendStatus::Borrowed)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// One-way transition to `returned`, stamping the given date. The
    /// returned_date is set exactly once; a second call is rejected.
    pub async fn mark_returned(
        &self,
        id: Uuid,
        owner_id: Uuid,
        returned_date: NaiveDate,
    ) -> AppResult<Book> {
        let book = self.get_by_id(id, owner_id).await?;

        if book.status == LendStatus::Returned {
            return Err(AppError::BusinessRule("Book already returned".to_string()));
        }

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET status = $1, returned_date = $2
            WHERE id = $3 AND owner_id = $4
            RETURNING *
            "#,
        )
        .bind(LendStatus::Returned)
        .bind(returned_date)
        .bind(id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a lending record (terminal)
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }
}
