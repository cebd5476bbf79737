//! Book lending service

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{BookDetails, BookFilter, CreateBook},
    penalty::StatusLabel,
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List a user's books, newest first, with display fields derived as
    /// of the given date. The filter mirrors the dashboard tabs.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: BookFilter,
        as_of: NaiveDate,
    ) -> AppResult<Vec<BookDetails>> {
        let books = self.repository.books.list_by_owner(owner_id).await?;

        let details = books
            .into_iter()
            .map(|b| BookDetails::derive(b, as_of))
            .filter(|d| Self::matches(filter, d))
            .collect();

        Ok(details)
    }

    /// Record a newly lent book
    pub async fn create(
        &self,
        owner_id: Uuid,
        book: CreateBook,
        as_of: NaiveDate,
    ) -> AppResult<BookDetails> {
        if book.return_deadline < book.borrowed_date {
            return Err(AppError::Validation(
                "return_deadline must not be before borrowed_date".to_string(),
            ));
        }

        let created = self.repository.books.create(owner_id, &book).await?;

        tracing::info!(book_id = %created.id, title = %created.title, "book lent out");

        Ok(BookDetails::derive(created, as_of))
    }

    /// Mark a book returned, stamping the given date. One-way: already
    /// returned books are rejected.
    pub async fn mark_returned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<BookDetails> {
        let book = self
            .repository
            .books
            .mark_returned(id, owner_id, as_of)
            .await?;

        tracing::info!(book_id = %book.id, "book returned");

        Ok(BookDetails::derive(book, as_of))
    }

    /// Delete a lending record
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()> {
        self.repository.books.delete(id, owner_id).await?;
        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    fn matches(filter: BookFilter, details: &BookDetails) -> bool {
        match filter {
            BookFilter::All => true,
            // The borrowed tab shows everything still out, however urgent
            BookFilter::Borrowed => !details.has_label(StatusLabel::Returned),
            BookFilter::Returned => details.has_label(StatusLabel::Returned),
            BookFilter::DueSoon => details.has_label(StatusLabel::DueSoon),
            BookFilter::Overdue => details.has_label(StatusLabel::Overdue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::{Book, LendStatus};
    use chrono::{DateTime, Utc};

    fn details(status: LendStatus, deadline: NaiveDate, as_of: NaiveDate) -> BookDetails {
        let book = Book {
            id: Uuid::nil(),
            owner_id: Uuid::nil(),
            title: "Dune".to_string(),
            borrower_name: "Ravi".to_string(),
            borrowed_date: deadline - chrono::Duration::days(14),
            return_deadline: deadline,
            returned_date: (status == LendStatus::Returned).then_some(as_of),
            status,
            created_at: DateTime::<Utc>::MIN_UTC,
        };
        BookDetails::derive(book, as_of)
    }

    #[test]
    fn test_filter_tabs() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let overdue = details(LendStatus::Borrowed, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), as_of);
        let due_soon = details(LendStatus::Borrowed, NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(), as_of);
        let out = details(LendStatus::Borrowed, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), as_of);
        let returned = details(LendStatus::Returned, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), as_of);

        assert!(BooksService::matches(BookFilter::All, &returned));
        assert!(BooksService::matches(BookFilter::Overdue, &overdue));
        assert!(!BooksService::matches(BookFilter::Overdue, &due_soon));
        assert!(BooksService::matches(BookFilter::DueSoon, &due_soon));
        assert!(BooksService::matches(BookFilter::Returned, &returned));
        assert!(!BooksService::matches(BookFilter::Borrowed, &returned));
        // Overdue and due-soon books are still borrowed
        assert!(BooksService::matches(BookFilter::Borrowed, &overdue));
        assert!(BooksService::matches(BookFilter::Borrowed, &due_soon));
        assert!(BooksService::matches(BookFilter::Borrowed, &out));
    }
}
