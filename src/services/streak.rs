use std::collections::HashSet;

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::services::study_logs;

/// The streak search never looks further back than one year, so a true streak
/// of 365 or more days is reported as 365.
pub const LOOKBACK_DAYS: i64 = 365;

/// Counts consecutive calendar days with activity, walking backward from
/// `today`. A quiet `today` means a streak of zero.
pub fn study_streak(active_days: &HashSet<NaiveDate>, today: NaiveDate) -> i64 {
    let mut streak = 0;
    for offset in 0..LOOKBACK_DAYS {
        let day = today - Duration::days(offset);
        if active_days.contains(&day) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

pub async fn current_streak(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let today = Utc::now().date_naive();
    let since = (today - Duration::days(LOOKBACK_DAYS))
        .and_hms_opt(0, 0, 0)
        .unwrap_or_else(|| Utc::now().naive_utc());
    let active_days = study_logs::active_days_since(pool, since).await?;
    Ok(study_streak(&active_days, today))
}
