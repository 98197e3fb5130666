//! PostgreSQL implementation of MentorDirectory.

use crate::domain::foundation::{DomainError, ErrorCode, MentorId};
use crate::domain::mentor::{MentorProfile, RateCard};
use crate::ports::MentorDirectory;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the MentorDirectory port.
pub struct PostgresMentorDirectory {
    pool: PgPool,
}

impl PostgresMentorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a mentor.
#[derive(Debug, sqlx::FromRow)]
struct MentorRow {
    id: Uuid,
    display_name: String,
    visible: bool,
    rate_quick_cents: Option<i64>,
    rate_full_cents: Option<i64>,
    rate_deep_cents: Option<i64>,
}

impl From<MentorRow> for MentorProfile {
    fn from(row: MentorRow) -> Self {
        MentorProfile {
            id: MentorId::from_uuid(row.id),
            display_name: row.display_name,
            visible: row.visible,
            rates: RateCard {
                quick_chat_cents: row.rate_quick_cents,
                full_session_cents: row.rate_full_cents,
                deep_dive_cents: row.rate_deep_cents,
            },
        }
    }
}

#[async_trait]
impl MentorDirectory for PostgresMentorDirectory {
    async fn find_mentor(&self, id: &MentorId) -> Result<Option<MentorProfile>, DomainError> {
        let row: Option<MentorRow> = sqlx::query_as(
            r#"
            SELECT id, display_name, visible, rate_quick_cents, rate_full_cents, rate_deep_cents
            FROM mentors
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find mentor: {}", e),
            )
        })?;

        Ok(row.map(MentorProfile::from))
    }
}
