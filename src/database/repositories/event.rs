//! Event repository implementation

use sqlx::{types::Json, FromRow, PgPool};
use chrono::{DateTime, Utc};
use crate::database::event_rules;
use crate::models::event::{Event, CreateEventRequest, CapacityState};
use crate::models::form_schema::FormSchema;
use crate::utils::errors::{GuestPassError, Result};

const EVENT_COLUMNS: &str =
    "id, code, title, capacity, registration_open, form_schema, created_at, updated_at";

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    code: String,
    title: String,
    capacity: Option<i32>,
    registration_open: bool,
    form_schema: Json<FormSchema>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            title: row.title,
            capacity: row.capacity,
            registration_open: row.registration_open,
            form_schema: row.form_schema.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event, generating the default form schema when none is given
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event> {
        let schema = request.form_schema.unwrap_or_default();
        event_rules::check_new_event(&request.code, request.capacity, &schema)?;

        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (code, title, capacity, registration_open, form_schema, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&request.code)
        .bind(request.title)
        .bind(request.capacity)
        .bind(request.registration_open)
        .bind(Json(schema))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                GuestPassError::InvalidInput(format!("Event code already in use: {}", request.code))
            }
            other => other.into(),
        })?;

        Ok(row.into())
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Event::from))
    }

    /// Find event by its shareable code
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE code = $1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Event::from))
    }

    /// Replace the event's form schema
    pub async fn update_form_schema(&self, id: i64, schema: FormSchema) -> Result<Event> {
        event_rules::check_schema(&schema)?;

        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET form_schema = $2, updated_at = $3 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(schema))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::from).ok_or(GuestPassError::EventNotFound { event_id: id })
    }

    /// Open or close registration
    pub async fn set_registration_open(&self, id: i64, open: bool) -> Result<Event> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET registration_open = $2, updated_at = $3 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(open)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::from).ok_or(GuestPassError::EventNotFound { event_id: id })
    }

    /// Change the capacity; the event row is locked so no guest slips in meanwhile
    pub async fn set_capacity(&self, id: i64, capacity: Option<i32>) -> Result<Event> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(i64,)> = sqlx::query_as("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(GuestPassError::EventNotFound { event_id: id });
        }

        let registered: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guests WHERE event_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        event_rules::check_capacity_change(capacity, registered.0)?;

        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET capacity = $2, updated_at = $3 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(capacity)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Capacity ceiling and registrant count
    pub async fn capacity_state(&self, id: i64) -> Result<Option<CapacityState>> {
        let row: Option<(Option<i32>, i64)> = sqlx::query_as(
            r#"
            SELECT e.capacity, (SELECT COUNT(*) FROM guests g WHERE g.event_id = e.id)
            FROM events e
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(capacity, registered)| CapacityState { capacity, registered }))
    }
}
