use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Promotion {
    pub id: Uuid,
    pub business_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub discount_percentage: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Promotion {
    /// Active flag set and `day` inside the (open-ended) validity window.
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.is_active
            && self.start_date.map_or(true, |start| start <= day)
            && self.end_date.map_or(true, |end| day <= end)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePromotionRequest {
    pub title: String,
    pub description: Option<String>,
    pub discount_percentage: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePromotionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub discount_percentage: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

impl CreatePromotionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Promotion title is required".into());
        }
        validate_discount(self.discount_percentage)?;
        validate_window(self.start_date, self.end_date)
    }
}

impl UpdatePromotionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err("Promotion title cannot be empty".into());
        }
        if let Some(d) = self.discount_percentage {
            validate_discount(d)?;
        }
        validate_window(self.start_date, self.end_date)
    }
}

fn validate_discount(pct: i32) -> Result<(), String> {
    if (1..=100).contains(&pct) {
        Ok(())
    } else {
        Err("Discount percentage must be between 1 and 100".into())
    }
}

fn validate_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), String> {
    match (start, end) {
        (Some(s), Some(e)) if e < s => Err("End date must not precede start date".into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn promo(start: Option<&str>, end: Option<&str>, active: bool) -> Promotion {
        Promotion {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            title: "2x1 lunes".into(),
            description: None,
            discount_percentage: 50,
            start_date: start.map(day),
            end_date: end.map(day),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn validity_window_is_inclusive() {
        let p = promo(Some("2025-06-01"), Some("2025-06-07"), true);
        assert!(p.is_active_on(day("2025-06-01")));
        assert!(p.is_active_on(day("2025-06-07")));
        assert!(!p.is_active_on(day("2025-05-31")));
        assert!(!p.is_active_on(day("2025-06-08")));
    }

    #[test]
    fn open_ended_and_disabled_promotions() {
        assert!(promo(None, None, true).is_active_on(day("2030-01-01")));
        assert!(!promo(None, None, false).is_active_on(day("2025-06-02")));
    }

    #[test]
    fn create_request_validation() {
        let ok = CreatePromotionRequest {
            title: "Happy hour".into(),
            description: None,
            discount_percentage: 20,
            start_date: Some(day("2025-06-01")),
            end_date: Some(day("2025-06-30")),
        };
        assert!(ok.validate().is_ok());

        let bad_pct = CreatePromotionRequest { discount_percentage: 0, ..ok };
        assert!(bad_pct.validate().is_err());

        let backwards = CreatePromotionRequest {
            title: "x".into(),
            description: None,
            discount_percentage: 10,
            start_date: Some(day("2025-06-30")),
            end_date: Some(day("2025-06-01")),
        };
        assert!(backwards.validate().is_err());
    }
}
