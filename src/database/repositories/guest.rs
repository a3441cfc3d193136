//! Guest repository implementation

use std::collections::BTreeMap;
use sqlx::{types::Json, FromRow, PgPool};
use chrono::{DateTime, Utc};
use tracing::debug;
use crate::database::store::InsertOutcome;
use crate::models::event::AttendanceSummary;
use crate::models::guest::{CheckInRecord, Guest, GuestCategory, GuestFields, NewGuest};
use crate::utils::errors::{GuestPassError, Result};

const GUEST_COLUMNS: &str = "id, event_id, guest_code, qr_payload, full_name, email, contact_number, \
     home_address, company_name, guest_category, custom_fields, registration_type, registration_source, \
     attended, checked_in_at, check_in_gate, checked_in_by, created_at";

/// Unique constraint on `(event_id, email)`
pub const EVENT_EMAIL_CONSTRAINT: &str = "guests_event_email_key";
/// Unique constraint on `guest_code`
pub const GUEST_CODE_CONSTRAINT: &str = "guests_guest_code_key";

#[derive(Debug, FromRow)]
struct GuestRow {
    id: i64,
    event_id: i64,
    guest_code: String,
    qr_payload: String,
    full_name: Option<String>,
    email: Option<String>,
    contact_number: Option<String>,
    home_address: Option<String>,
    company_name: Option<String>,
    guest_category: String,
    custom_fields: Json<BTreeMap<String, String>>,
    registration_type: String,
    registration_source: String,
    attended: bool,
    checked_in_at: Option<DateTime<Utc>>,
    check_in_gate: Option<String>,
    checked_in_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<GuestRow> for Guest {
    type Error = GuestPassError;

    fn try_from(row: GuestRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            event_id: row.event_id,
            guest_code: row.guest_code,
            qr_payload: row.qr_payload,
            fields: GuestFields {
                full_name: row.full_name,
                email: row.email,
                contact_number: row.contact_number,
                home_address: row.home_address,
                company_name: row.company_name,
                guest_category: row.guest_category.parse::<GuestCategory>()?,
                custom_fields: row.custom_fields.0,
            },
            registration_type: row.registration_type.parse()?,
            registration_source: row.registration_source.parse()?,
            attended: row.attended,
            checked_in_at: row.checked_in_at,
            check_in_gate: row.check_in_gate,
            checked_in_by: row.checked_in_by,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a guest while holding the event row lock.
    ///
    /// Concurrent registrations for the same event queue on `FOR UPDATE`, so the
    /// count read here cannot go stale before the insert commits.
    pub async fn insert_within_capacity(&self, guest: NewGuest) -> Result<InsertOutcome> {
        let mut tx = self.pool.begin().await?;

        let event: Option<(Option<i32>,)> = sqlx::query_as("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
            .bind(guest.event_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((capacity,)) = event else {
            return Err(GuestPassError::EventNotFound { event_id: guest.event_id });
        };

        if let Some(capacity) = capacity {
            let registered: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guests WHERE event_id = $1")
                .bind(guest.event_id)
                .fetch_one(&mut *tx)
                .await?;
            if registered.0 >= i64::from(capacity) {
                debug!(event_id = guest.event_id, capacity = capacity, "Insert refused, event full");
                return Ok(InsertOutcome::CapacityReached { capacity });
            }
        }

        let inserted = sqlx::query_as::<_, GuestRow>(&format!(
            r#"
            INSERT INTO guests (event_id, guest_code, qr_payload, full_name, email, contact_number, home_address,
                                company_name, guest_category, custom_fields, registration_type, registration_source,
                                attended, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, false, $13)
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(guest.event_id)
        .bind(&guest.guest_code)
        .bind(&guest.qr_payload)
        .bind(&guest.fields.full_name)
        .bind(&guest.fields.email)
        .bind(&guest.fields.contact_number)
        .bind(&guest.fields.home_address)
        .bind(&guest.fields.company_name)
        .bind(guest.fields.guest_category.as_str())
        .bind(Json(&guest.fields.custom_fields))
        .bind(guest.registration_type.as_str())
        .bind(guest.registration_source.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let outcome = match db.constraint() {
                    Some(EVENT_EMAIL_CONSTRAINT) => InsertOutcome::DuplicateEmail,
                    Some(GUEST_CODE_CONSTRAINT) => InsertOutcome::DuplicateCode,
                    _ => return Err(GuestPassError::StorageConflict(db.message().to_string())),
                };
                return Ok(outcome);
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;
        Ok(InsertOutcome::Inserted(row.try_into()?))
    }

    pub async fn find_by_code(&self, guest_code: &str) -> Result<Option<Guest>> {
        let row = sqlx::query_as::<_, GuestRow>(&format!("SELECT {GUEST_COLUMNS} FROM guests WHERE guest_code = $1"))
            .bind(guest_code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Guest::try_from).transpose()
    }

    pub async fn email_exists(&self, event_id: i64, email: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guests WHERE event_id = $1 AND email = $2")
            .bind(event_id)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    /// Conditional check-in; zero affected rows means the guest was already in.
    pub async fn mark_attended(&self, guest_id: i64, record: CheckInRecord) -> Result<Option<Guest>> {
        let row = sqlx::query_as::<_, GuestRow>(&format!(
            r#"
            UPDATE guests
            SET attended = true, checked_in_at = $2, checked_in_by = $3, check_in_gate = $4
            WHERE id = $1 AND attended = false
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(guest_id)
        .bind(record.checked_in_at)
        .bind(record.checked_in_by)
        .bind(record.gate)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Guest::try_from).transpose()
    }

    pub async fn list_for_event(&self, event_id: i64, limit: i64, offset: i64) -> Result<Vec<Guest>> {
        let rows = sqlx::query_as::<_, GuestRow>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE event_id = $1 ORDER BY created_at ASC LIMIT $2 OFFSET $3"
        ))
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Guest::try_from).collect()
    }

    pub async fn attendance_summary(&self, event_id: i64) -> Result<Option<AttendanceSummary>> {
        let row: Option<(Option<i32>, i64, i64)> = sqlx::query_as(
            r#"
            SELECT e.capacity,
                   COUNT(g.id),
                   COUNT(g.id) FILTER (WHERE g.attended)
            FROM events e
            LEFT JOIN guests g ON g.event_id = e.id
            WHERE e.id = $1
            GROUP BY e.id, e.capacity
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(capacity, registered, attended)| AttendanceSummary {
            event_id,
            registered,
            attended,
            capacity,
            remaining: capacity.map(|capacity| (i64::from(capacity) - registered).max(0)),
        }))
    }
}
