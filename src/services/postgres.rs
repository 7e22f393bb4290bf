use crate::config::DatabaseSettings;
use crate::core::filters::escape_like;
use crate::models::{
    NewPartnerRequest, NewProfile, PartnerRequest, Profile, ProfileFilter, RequestStatus, SortOrder,
};
use crate::services::store::{ProfileStore, RequestStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

const PROFILE_COLUMNS: &str = "id, email, name, profile_image, subject, study_mode, \
     availability_time, location, experience_level, rating, xp_level, partner_count, created_at";

const REQUEST_COLUMNS: &str = "id, sender_email, receiver_id, message, status, created_at";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict {
                constraint: db.constraint().unwrap_or_default().to_string(),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

/// Request status as stored in the `request_status` Postgres enum
#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum PgRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl From<RequestStatus> for PgRequestStatus {
    fn from(value: RequestStatus) -> Self {
        match value {
            RequestStatus::Pending => PgRequestStatus::Pending,
            RequestStatus::Accepted => PgRequestStatus::Accepted,
            RequestStatus::Rejected => PgRequestStatus::Rejected,
        }
    }
}

impl From<PgRequestStatus> for RequestStatus {
    fn from(value: PgRequestStatus) -> Self {
        match value {
            PgRequestStatus::Pending => RequestStatus::Pending,
            PgRequestStatus::Accepted => RequestStatus::Accepted,
            PgRequestStatus::Rejected => RequestStatus::Rejected,
        }
    }
}

/// PostgreSQL store for profiles and partner requests
///
/// Holds the connection pool for the lifetime of the process. The schema is
/// migrated on connect; email uniqueness and the one-open-request-per-pair
/// rule are backed by unique indexes.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect using the database settings and run pending migrations
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections.unwrap_or(10))
            .min_connections(settings.min_connections.unwrap_or(1))
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)))
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)))
            .test_before_acquire(true)
            .connect(&settings.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}

fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        profile_image: row.try_get("profile_image")?,
        subject: row.try_get("subject")?,
        study_mode: row.try_get("study_mode")?,
        availability_time: row.try_get("availability_time")?,
        location: row.try_get("location")?,
        experience_level: row.try_get("experience_level")?,
        rating: row.try_get("rating")?,
        xp_level: row.try_get("xp_level")?,
        partner_count: row.try_get("partner_count")?,
        created_at: row.try_get("created_at")?,
    })
}

fn request_from_row(row: &PgRow) -> Result<PartnerRequest, sqlx::Error> {
    let status: PgRequestStatus = row.try_get("status")?;

    Ok(PartnerRequest {
        id: row.try_get("id")?,
        sender_email: row.try_get("sender_email")?,
        receiver_id: row.try_get("receiver_id")?,
        message: row.try_get("message")?,
        status: status.into(),
        created_at: row.try_get("created_at")?,
    })
}

fn list_order(sort: Option<SortOrder>) -> &'static str {
    match sort {
        Some(SortOrder::Asc) => "ORDER BY xp_level ASC, created_at ASC, id ASC",
        Some(SortOrder::Desc) => "ORDER BY xp_level DESC, created_at ASC, id ASC",
        None => "ORDER BY created_at ASC, id ASC",
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn insert(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO study_partners
                (id, email, name, profile_image, subject, study_mode, availability_time,
                 location, experience_level, rating, xp_level, partner_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, $12)
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&profile.email)
            .bind(&profile.name)
            .bind(&profile.profile_image)
            .bind(&profile.subject)
            .bind(&profile.study_mode)
            .bind(&profile.availability_time)
            .bind(&profile.location)
            .bind(&profile.experience_level)
            .bind(profile.rating)
            .bind(profile.xp_level)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        let profile = profile_from_row(&row)?;
        tracing::debug!("Inserted profile {} ({})", profile.id, profile.email);

        Ok(profile)
    }

    async fn list(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        let order = list_order(filter.sort_by_xp_level);

        let rows = match filter.effective_subject() {
            Some(pattern) => {
                let query = format!(
                    "SELECT {PROFILE_COLUMNS} FROM study_partners \
                     WHERE subject ILIKE $1 ESCAPE '\\' {order}"
                );
                sqlx::query(&query)
                    .bind(format!("%{}%", escape_like(pattern)))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("SELECT {PROFILE_COLUMNS} FROM study_partners {order}");
                sqlx::query(&query).fetch_all(&self.pool).await?
            }
        };

        let profiles = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Listed {} profiles", profiles.len());

        Ok(profiles)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM study_partners WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM study_partners WHERE email = $1");

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    async fn top_rated(&self, limit: usize) -> Result<Vec<Profile>, StoreError> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM study_partners \
             ORDER BY rating DESC, created_at ASC, id ASC LIMIT $1"
        );

        let rows = sqlx::query(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RequestStore for PostgresStore {
    async fn find_active(
        &self,
        sender_email: &str,
        receiver_id: Uuid,
    ) -> Result<Option<PartnerRequest>, StoreError> {
        let query = format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM partner_requests
            WHERE sender_email = $1 AND receiver_id = $2
              AND status IN ('pending', 'accepted')
            LIMIT 1
            "#
        );

        let row = sqlx::query(&query)
            .bind(sender_email)
            .bind(receiver_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(request_from_row).transpose()?)
    }

    /// Runs the counter bump and the insert in one transaction; dropping the
    /// transaction on any error rolls both back.
    async fn insert_for_receiver(
        &self,
        request: NewPartnerRequest,
    ) -> Result<Option<PartnerRequest>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let bumped = sqlx::query(
            "UPDATE study_partners SET partner_count = partner_count + 1 WHERE id = $1",
        )
        .bind(request.receiver_id)
        .execute(&mut *tx)
        .await?;

        if bumped.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            r#"
            INSERT INTO partner_requests (id, sender_email, receiver_id, message, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REQUEST_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&request.sender_email)
            .bind(request.receiver_id)
            .bind(&request.message)
            .bind(PgRequestStatus::Pending)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        let created = request_from_row(&row)?;
        tx.commit().await?;

        tracing::debug!(
            "Recorded partner request {}: {} -> {}",
            created.id,
            created.sender_email,
            created.receiver_id
        );

        Ok(Some(created))
    }

    async fn update_active_message(
        &self,
        sender_email: &str,
        receiver_id: Uuid,
        message: &str,
    ) -> Result<Option<PartnerRequest>, StoreError> {
        let query = format!(
            r#"
            UPDATE partner_requests
            SET message = $3
            WHERE sender_email = $1 AND receiver_id = $2
              AND status IN ('pending', 'accepted')
            RETURNING {REQUEST_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(sender_email)
            .bind(receiver_id)
            .bind(message)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(request_from_row).transpose()?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM partner_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_sender(&self, sender_email: &str) -> Result<Vec<PartnerRequest>, StoreError> {
        let query = format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM partner_requests
            WHERE sender_email = $1
            ORDER BY created_at ASC, id ASC
            "#
        );

        let rows = sqlx::query(&query)
            .bind(sender_email)
            .fetch_all(&self.pool)
            .await?;

        let requests = rows
            .iter()
            .map(request_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("{} has sent {} partner requests", sender_email, requests.len());

        Ok(requests)
    }
}
