use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime, TimeZone};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::time::Duration;

use crate::services::share_apply::ShareApplyService;
use crate::services::sync_status::{self, jobs};

/// Fires once a day at a fixed local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub at: NaiveTime,
}

impl DailySchedule {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    /// Next firing strictly after `now`.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.at);
        if today > now {
            today
        } else {
            today + ChronoDuration::days(1)
        }
    }

    /// Time to sleep from the current local time until the next firing.
    pub fn until_next(&self) -> Duration {
        let now = Local::now().naive_local();
        let next = self.next_after(now);
        // A DST gap can make the local instant ambiguous or missing; fall
        // back to the naive difference in that case
        let wait = match (Local.from_local_datetime(&now).earliest(), Local.from_local_datetime(&next).earliest()) {
            (Some(from), Some(to)) => to.signed_duration_since(from),
            _ => next.signed_duration_since(now),
        };
        wait.to_std().unwrap_or(Duration::from_secs(1))
    }
}

pub async fn start_share_apply_job(
    db: Arc<DatabaseConnection>,
    service: ShareApplyService,
    schedule: DailySchedule,
    run_on_startup: bool,
) {
    tokio::spawn(async move {
        if run_on_startup {
            // Catch up if the process was down at the last scheduled time
            match sync_status::is_due(&db, jobs::SHARE_APPLY, ChronoDuration::hours(24)).await {
                Ok(true) => {
                    tracing::info!("Starting share application run (startup catch-up)");
                    run_once(&db, &service).await;
                }
                Ok(false) => {
                    tracing::info!("Skipping share application run on startup (ran within the last day)");
                }
                Err(e) => {
                    tracing::warn!("Failed to check sync status, skipping startup run: {}", e);
                }
            }
        }

        loop {
            let wait = schedule.until_next();
            tracing::info!(
                "Next share application run at {} (in {}s)",
                schedule.at,
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;

            tracing::info!("Starting scheduled share application run");
            run_once(&db, &service).await;
        }
    });
}

async fn run_once(db: &DatabaseConnection, service: &ShareApplyService) {
    match service.run().await {
        Ok(summary) => {
            tracing::info!(?summary, "Share application run completed");
            let summary_json = serde_json::to_string(&summary).unwrap_or_default();
            if let Err(e) = sync_status::record_success(db, jobs::SHARE_APPLY, &summary_json).await {
                tracing::warn!("Failed to record run success: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("Share application run failed: {}", e);
            if let Err(e2) = sync_status::record_failure(db, jobs::SHARE_APPLY, &e.to_string()).await {
                tracing::warn!("Failed to record run failure: {}", e2);
            }
        }
    }
}
