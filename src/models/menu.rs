use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::services::expiry::Dated;

/// A business's meal offering for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyMenu {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub allows_reservations: bool,
    pub menu_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Dated for DailyMenu {
    fn date(&self) -> NaiveDate {
        self.menu_date
    }
}

/// A client's reservation of a daily menu. Name and price are copied from the
/// menu at reservation time and survive the menu's deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuReservation {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub client_id: Uuid,
    pub business_id: Uuid,
    pub menu_name: String,
    pub menu_price: Option<f64>,
    pub reservation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Dated for MenuReservation {
    fn date(&self) -> NaiveDate {
        self.reservation_date
    }
}

/// Body for POST /menus. The menu is always created for today.
#[derive(Debug, Deserialize)]
pub struct CreateMenuRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default = "default_allows_reservations")]
    pub allows_reservations: bool,
}

fn default_allows_reservations() -> bool {
    true
}

/// Body for PUT /menus/{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateMenuRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub allows_reservations: Option<bool>,
}

/// Query params for GET /menus.
#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    pub business_id: Option<Uuid>,
}

impl CreateMenuRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Menu name is required".into());
        }
        validate_price(self.price)
    }
}

impl UpdateMenuRequest {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err("Menu name cannot be empty".into());
        }
        validate_price(self.price)
    }
}

fn validate_price(price: Option<f64>) -> Result<(), String> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err("Price must be a non-negative number".into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_rejects_blank_name_and_negative_price() {
        let req: CreateMenuRequest =
            serde_json::from_str(r#"{"name":"  ","price":9.5}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateMenuRequest =
            serde_json::from_str(r#"{"name":"Menu del día","price":-1}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn reservations_allowed_by_default() {
        let req: CreateMenuRequest = serde_json::from_str(r#"{"name":"Paella"}"#).unwrap();
        assert!(req.allows_reservations);
        assert!(req.validate().is_ok());
    }
}
