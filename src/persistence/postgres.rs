//! PostgreSQL implementation of [`BookingStore`].
//!
//! Slot uniqueness is enforced by the partial unique index
//! `bookings_active_slot` (see `migrations/`); a unique violation on
//! insert or date change is mapped to [`ApiError::SlotConflict`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{BookingRow, LegacyAdRow};
use super::{BookingFilter, BookingStore};
use crate::config::DatabaseConfig;
use crate::domain::{
    AdType, Booking, BookingId, BookingStatus, LegacyAd, LegacyAdPatch, NewBooking, NewLegacyAd,
};
use crate::error::ApiError;

const BOOKING_COLUMNS: &str = "id, selected_date, ad_type, status, buyer_name, buyer_contact, \
     image_url, link_url, order_id, created_at, updated_at";

const LEGACY_COLUMNS: &str = "id, title, position, image_url, link_url, active, priority, created_at";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with the configured pool limits and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ApiError::PersistenceError(format!("migration failed: {e}")))?;

        tracing::info!(
            max_connections = config.max_connections,
            "connected to postgres"
        );
        Ok(Self::new(pool))
    }

    async fn fetch_booking(&self, id: BookingId) -> Result<Option<Booking>, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Booking::try_from).transpose()
    }
}

/// Maps a unique-index violation to a slot conflict for `(date, ad_type)`.
fn map_slot_violation(err: sqlx::Error, date: NaiveDate, ad_type: AdType) -> ApiError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::SlotConflict {
            ad_type,
            dates: vec![date],
        },
        _ => ApiError::from(err),
    }
}

fn into_bookings(rows: Vec<BookingRow>) -> Result<Vec<Booking>, ApiError> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingStore for PostgresStore {
    async fn insert(&self, new: NewBooking) -> Result<Booking, ApiError> {
        let booking = new.into_booking();
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking.id.as_uuid())
        .bind(booking.selected_date)
        .bind(booking.ad_type.as_str())
        .bind(booking.status.as_str())
        .bind(&booking.buyer_name)
        .bind(&booking.buyer_contact)
        .bind(&booking.image_url)
        .bind(&booking.link_url)
        .bind(&booking.order_id)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_slot_violation(e, booking.selected_date, booking.ad_type))?;

        Booking::try_from(row)
    }

    async fn get(&self, id: BookingId) -> Result<Booking, ApiError> {
        self.fetch_booking(id)
            .await?
            .ok_or(ApiError::BookingNotFound(id))
    }

    async fn find_by_slot(
        &self,
        date: NaiveDate,
        ad_type: AdType,
    ) -> Result<Vec<Booking>, ApiError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE selected_date = $1 AND ad_type = $2 ORDER BY created_at"
        ))
        .bind(date)
        .bind(ad_type.as_str())
        .fetch_all(&self.pool)
        .await?;
        into_bookings(rows)
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ApiError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE ($1::text IS NULL OR ad_type = $1) \
               AND ($2::text IS NULL OR status = $2) \
               AND ($3::date IS NULL OR selected_date >= $3) \
               AND ($4::date IS NULL OR selected_date <= $4) \
             ORDER BY selected_date, ad_type, created_at"
        ))
        .bind(filter.ad_type.map(|t| t.as_str()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;
        into_bookings(rows)
    }

    async fn update_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Booking, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET status = $3, updated_at = now() \
             WHERE id = $1 AND status = $2 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Booking::try_from(row),
            None => {
                let current = self.get(id).await?;
                Err(ApiError::InvalidTransition {
                    from: current.status,
                    to: next,
                })
            }
        }
    }

    async fn update_date(&self, id: BookingId, date: NaiveDate) -> Result<Booking, ApiError> {
        let current = self.get(id).await?;
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET selected_date = $2, updated_at = now() \
             WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_slot_violation(e, date, current.ad_type))?
        .ok_or(ApiError::BookingNotFound(id))?;

        Booking::try_from(row)
    }

    async fn update_creative(
        &self,
        id: BookingId,
        image_url: Option<String>,
        link_url: Option<String>,
    ) -> Result<Booking, ApiError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "UPDATE bookings SET image_url = COALESCE($2, image_url), \
             link_url = COALESCE($3, link_url), updated_at = now() \
             WHERE id = $1 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(image_url)
        .bind(link_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::BookingNotFound(id))?;

        Booking::try_from(row)
    }

    async fn delete(&self, id: BookingId) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::BookingNotFound(id));
        }
        Ok(())
    }

    async fn list_legacy_ads(
        &self,
        position: Option<AdType>,
        active_only: bool,
    ) -> Result<Vec<LegacyAd>, ApiError> {
        let rows = sqlx::query_as::<_, LegacyAdRow>(&format!(
            "SELECT {LEGACY_COLUMNS} FROM legacy_ads \
             WHERE ($1::text IS NULL OR position = $1) AND (NOT $2 OR active) \
             ORDER BY priority DESC, id"
        ))
        .bind(position.map(|p| p.as_str()))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LegacyAd::try_from).collect()
    }

    async fn insert_legacy_ad(&self, new: NewLegacyAd) -> Result<LegacyAd, ApiError> {
        let row = sqlx::query_as::<_, LegacyAdRow>(&format!(
            "INSERT INTO legacy_ads (title, position, image_url, link_url, active, priority) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {LEGACY_COLUMNS}"
        ))
        .bind(&new.title)
        .bind(new.position.as_str())
        .bind(&new.image_url)
        .bind(&new.link_url)
        .bind(new.active)
        .bind(new.priority)
        .fetch_one(&self.pool)
        .await?;

        LegacyAd::try_from(row)
    }

    async fn update_legacy_ad(&self, id: i64, patch: LegacyAdPatch) -> Result<LegacyAd, ApiError> {
        let row = sqlx::query_as::<_, LegacyAdRow>(&format!(
            "UPDATE legacy_ads SET title = COALESCE($2, title), \
             image_url = COALESCE($3, image_url), link_url = COALESCE($4, link_url), \
             active = COALESCE($5, active), priority = COALESCE($6, priority) \
             WHERE id = $1 RETURNING {LEGACY_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.image_url)
        .bind(patch.link_url)
        .bind(patch.active)
        .bind(patch.priority)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::LegacyAdNotFound(id))?;

        LegacyAd::try_from(row)
    }
}
