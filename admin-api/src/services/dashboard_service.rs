// Dashboard service - aggregate counts and daily chart rollups
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::db::Database;
use crate::error::Result;

pub struct DashboardService {
    db: Database,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub new_users_today: i64,
    pub blocked_users: i64,
    pub active_subscriptions: i64,
    pub payments_today: i64,
    pub revenue_today: Decimal,
    pub revenue_this_month: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CountPoint {
    pub date: String,
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct RevenuePoint {
    pub date: String,
    pub value: Decimal,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_stats(&self) -> Result<DashboardStats> {
        let today = Utc::now().date_naive();
        let today_start = start_of_day(today);
        let month_start = start_of_day(today.with_day0(0).unwrap_or(today));

        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db.pg)
            .await?;

        let new_users_today: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE created_at >= $1")
                .bind(today_start)
                .fetch_one(&self.db.pg)
                .await?;

        let blocked_users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = 'blocked'")
                .fetch_one(&self.db.pg)
                .await?;

        let active_subscriptions: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions
            WHERE status = 'active'
            AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .fetch_one(&self.db.pg)
        .await?;

        let payments_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE status = 'success' AND paid_at >= $1",
        )
        .bind(today_start)
        .fetch_one(&self.db.pg)
        .await?;

        let revenue_today: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'success' AND paid_at >= $1",
        )
        .bind(today_start)
        .fetch_one(&self.db.pg)
        .await?;

        let revenue_this_month: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'success' AND paid_at >= $1",
        )
        .bind(month_start)
        .fetch_one(&self.db.pg)
        .await?;

        Ok(DashboardStats {
            total_users,
            new_users_today,
            blocked_users,
            active_subscriptions,
            payments_today,
            revenue_today,
            revenue_this_month,
        })
    }

    /// Daily successful-payment revenue for the trailing `days` days.
    /// Days with no payments appear as zero.
    pub async fn get_revenue_chart(&self, days: i64) -> Result<Vec<RevenuePoint>> {
        let today = Utc::now().date_naive();
        let first = today - Duration::days(days - 1);

        let rows: Vec<(NaiveDate, Decimal)> = sqlx::query_as(
            r#"
            SELECT paid_at::date AS day, SUM(amount) AS total
            FROM payments
            WHERE status = 'success' AND paid_at >= $1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(start_of_day(first))
        .fetch_all(&self.db.pg)
        .await?;

        let by_day: HashMap<NaiveDate, Decimal> = rows.into_iter().collect();

        Ok(fill_days(first, today, |date| RevenuePoint {
            date: date.format("%Y-%m-%d").to_string(),
            value: by_day.get(&date).copied().unwrap_or_default(),
        }))
    }

    /// Daily signup counts for the trailing `days` days.
    pub async fn get_user_chart(&self, days: i64) -> Result<Vec<CountPoint>> {
        let today = Utc::now().date_naive();
        let first = today - Duration::days(days - 1);

        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT created_at::date AS day, COUNT(*) AS total
            FROM users
            WHERE created_at >= $1
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(start_of_day(first))
        .fetch_all(&self.db.pg)
        .await?;

        let by_day: HashMap<NaiveDate, i64> = rows.into_iter().collect();

        Ok(fill_days(first, today, |date| CountPoint {
            date: date.format("%Y-%m-%d").to_string(),
            value: by_day.get(&date).copied().unwrap_or(0),
        }))
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn fill_days<T>(first: NaiveDate, last: NaiveDate, mut make: impl FnMut(NaiveDate) -> T) -> Vec<T> {
    let mut points = Vec::new();
    let mut date = first;
    while date <= last {
        points.push(make(date));
        date += Duration::days(1);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_days_is_inclusive_and_ordered() {
        let first = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let days: Vec<String> = fill_days(first, last, |d| d.format("%Y-%m-%d").to_string());

        assert_eq!(days.len(), 7);
        assert_eq!(days.first().unwrap(), "2026-08-01");
        assert_eq!(days.last().unwrap(), "2026-08-07");
    }

    #[test]
    fn start_of_day_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2026-08-27T00:00:00+00:00");
    }
}
