//! Sync status service for tracking scheduled job runs
//!
//! Lets a restarted process tell whether today's run already happened.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities::sync_status::{self, Entity as SyncStatus};

/// Job names for tracking sync status
pub mod jobs {
    pub const SHARE_APPLY: &str = "share_apply";
}

pub async fn last_success(
    db: &DatabaseConnection,
    job_name: &str,
) -> Result<Option<DateTime<Utc>>, DbErr> {
    let status = SyncStatus::find()
        .filter(sync_status::Column::JobName.eq(job_name))
        .one(db)
        .await?;

    Ok(status.and_then(|record| record.last_success_at))
}

/// Returns true if the job never succeeded or its last success is older
/// than `min_interval`.
pub async fn is_due(
    db: &DatabaseConnection,
    job_name: &str,
    min_interval: Duration,
) -> Result<bool, DbErr> {
    Ok(is_due_at(last_success(db, job_name).await?, min_interval, Utc::now()))
}

fn is_due_at(last_success: Option<DateTime<Utc>>, min_interval: Duration, now: DateTime<Utc>) -> bool {
    match last_success {
        None => {
            tracing::info!("No previous successful run");
            true
        }
        Some(last) => {
            let elapsed = now.signed_duration_since(last);
            tracing::debug!("Last successful run was {}s ago", elapsed.num_seconds());
            elapsed >= min_interval
        }
    }
}

/// Record a successful run along with its JSON summary
pub async fn record_success(
    db: &DatabaseConnection,
    job_name: &str,
    summary: &str,
) -> Result<(), DbErr> {
    let now = Utc::now();

    let existing = SyncStatus::find()
        .filter(sync_status::Column::JobName.eq(job_name))
        .one(db)
        .await?;

    match existing {
        Some(record) => {
            let success_count = record.success_count;
            let mut active_model: sync_status::ActiveModel = record.into();
            active_model.last_success_at = Set(Some(now));
            active_model.last_attempt_at = Set(Some(now));
            active_model.last_error = Set(None);
            active_model.last_summary = Set(Some(summary.to_string()));
            active_model.success_count = Set(success_count + 1);
            active_model.update(db).await?;
        }
        None => {
            let new_record = sync_status::ActiveModel {
                job_name: Set(job_name.to_string()),
                last_success_at: Set(Some(now)),
                last_attempt_at: Set(Some(now)),
                last_error: Set(None),
                last_summary: Set(Some(summary.to_string())),
                success_count: Set(1),
                error_count: Set(0),
                ..Default::default()
            };
            new_record.insert(db).await?;
        }
    }

    tracing::debug!("[{}] Recorded successful run", job_name);
    Ok(())
}

/// Record a failed run attempt
pub async fn record_failure(
    db: &DatabaseConnection,
    job_name: &str,
    error: &str,
) -> Result<(), DbErr> {
    let now = Utc::now();

    let existing = SyncStatus::find()
        .filter(sync_status::Column::JobName.eq(job_name))
        .one(db)
        .await?;

    match existing {
        Some(record) => {
            let error_count = record.error_count;
            let mut active_model: sync_status::ActiveModel = record.into();
            active_model.last_attempt_at = Set(Some(now));
            active_model.last_error = Set(Some(error.to_string()));
            active_model.error_count = Set(error_count + 1);
            active_model.update(db).await?;
        }
        None => {
            let new_record = sync_status::ActiveModel {
                job_name: Set(job_name.to_string()),
                last_success_at: Set(None),
                last_attempt_at: Set(Some(now)),
                last_error: Set(Some(error.to_string())),
                last_summary: Set(None),
                success_count: Set(0),
                error_count: Set(1),
                ..Default::default()
            };
            new_record.insert(db).await?;
        }
    }

    tracing::debug!("[{}] Recorded failed run: {}", job_name, error);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 5).unwrap()
    }

    #[test]
    fn test_is_due_without_history() {
        assert!(is_due_at(None, Duration::hours(24), now()));
    }

    #[test]
    fn test_is_due_after_interval() {
        let last = now() - Duration::hours(25);
        assert!(is_due_at(Some(last), Duration::hours(24), now()));
    }

    #[test]
    fn test_not_due_within_interval() {
        let last = now() - Duration::hours(3);
        assert!(!is_due_at(Some(last), Duration::hours(24), now()));
    }

    #[tokio::test]
    async fn test_last_success_reads_record() {
        let last = now() - Duration::hours(1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sync_status::Model {
                id: 1,
                job_name: jobs::SHARE_APPLY.to_string(),
                last_success_at: Some(last),
                last_attempt_at: Some(last),
                last_error: None,
                last_summary: Some("{}".to_string()),
                success_count: 4,
                error_count: 0,
            }]])
            .into_connection();

        assert_eq!(last_success(&db, jobs::SHARE_APPLY).await.unwrap(), Some(last));
    }
}
