//! Book (lending record) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::penalty::{self, Severity, StatusLabel};

/// Persisted lending status. Only two states exist; `DueSoon`/`Overdue`
/// are derived labels, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LendStatus {
    Borrowed,
    Returned,
}

impl LendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LendStatus::Borrowed => "borrowed",
            LendStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LendStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "borrowed" => Ok(LendStatus::Borrowed),
            "returned" => Ok(LendStatus::Returned),
            _ => Err(format!("Invalid lending status: {}", s)),
        }
    }
}

// SQLx conversion for LendStatus (stored as TEXT)
impl sqlx::Type<Postgres> for LendStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for LendStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LendStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Book record from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub borrower_name: String,
    pub borrowed_date: NaiveDate,
    pub return_deadline: NaiveDate,
    /// Present iff status is `returned`; stamped once, never cleared
    pub returned_date: Option<NaiveDate>,
    pub status: LendStatus,
    pub created_at: DateTime<Utc>,
}

/// Book with derived display fields, as served to clients.
///
/// The derived fields (`label`, `severity`, `penalty`, `days_display`,
/// `progress`) are recomputed from the raw dates on every read so they can
/// never go stale.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: Uuid,
    pub title: String,
    pub borrower_name: String,
    pub borrowed_date: NaiveDate,
    pub return_deadline: NaiveDate,
    pub returned_date: Option<NaiveDate>,
    pub status: LendStatus,
    /// Derived status label ("Borrowed", "Due Soon", "Overdue", "Returned")
    pub label: String,
    /// Presentation urgency tier for the label
    pub severity: Severity,
    /// Accrued penalty in currency-agnostic units
    pub penalty: i64,
    /// Countdown text, e.g. "2 days left" or "Overdue by 1 day"
    pub days_display: String,
    /// Elapsed share of the loan period, 0..=100
    pub progress: u8,
    pub created_at: DateTime<Utc>,
}

impl BookDetails {
    /// Derive the display view of a book as of the given date.
    pub fn derive(book: Book, as_of: NaiveDate) -> Self {
        let badge = penalty::book_status(book.return_deadline, book.status, as_of);
        Self {
            label: badge.label.to_string(),
            severity: badge.severity,
            penalty: penalty::calculate_penalty(book.return_deadline, book.status, as_of),
            days_display: penalty::days_display(book.return_deadline, book.status, as_of),
            progress: penalty::progress(book.borrowed_date, book.return_deadline, book.status, as_of),
            id: book.id,
            title: book.title,
            borrower_name: book.borrower_name,
            borrowed_date: book.borrowed_date,
            return_deadline: book.return_deadline,
            returned_date: book.returned_date,
            status: book.status,
            created_at: book.created_at,
        }
    }

    /// True when the derived label is the given one.
    pub fn has_label(&self, label: StatusLabel) -> bool {
        self.label == label.to_string()
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "borrower_name must not be empty"))]
    pub borrower_name: String,
    pub borrowed_date: NaiveDate,
    pub return_deadline: NaiveDate,
}

/// List filter, mirroring the dashboard tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookFilter {
    #[default]
    All,
    Borrowed,
    Returned,
    DueSoon,
    Overdue,
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Restrict the listing to one dashboard tab (default: all)
    pub filter: Option<BookFilter>,
    /// Derive status fields as of this date (YYYY-MM-DD, default: today).
    /// Mainly for deterministic testing.
    pub as_of: Option<String>,
}
