use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored as TEXT.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RedemptionMethod {
    Code,
    Qr,
}

impl RedemptionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RedemptionMethod::Code => "code",
            RedemptionMethod::Qr => "qr",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromotionRedemption {
    pub id: Uuid,
    pub promotion_id: Uuid,
    pub client_id: Uuid,
    pub business_id: Uuid,
    pub method: RedemptionMethod,
    pub redemption_amount: Option<f64>,
    pub redemption_date: DateTime<Utc>,
    pub redemption_day: NaiveDate,
}

/// Body for POST /redemptions. `code` is required for the `code` method,
/// `qr_payload` for the `qr` method.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub promotion_id: Uuid,
    pub method: RedemptionMethod,
    pub code: Option<String>,
    pub qr_payload: Option<String>,
    pub redemption_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TodayRedemptionQuery {
    pub promotion_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DailyCountsQuery {
    pub days: Option<i64>,
}

/// One point of the business dashboard series.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyRedemptionCount {
    pub day: NaiveDate,
    pub redemptions: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_wire_names() {
        let req: RedeemRequest = serde_json::from_str(&format!(
            r#"{{"promotion_id":"{}","method":"qr","qr_payload":"x"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert_eq!(req.method, RedemptionMethod::Qr);
        assert_eq!(RedemptionMethod::Code.as_str(), "code");
        assert!(serde_json::from_str::<RedemptionMethod>(r#""nfc""#).is_err());
    }
}
