use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessQrCode {
    pub id: Uuid,
    pub business_id: Uuid,
    pub four_digit_code: String,
    pub qr_payload: String,
    pub status: QrStatus,
    pub created_at: DateTime<Utc>,
}

/// Stored as TEXT; at most one `active` row per business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QrStatus {
    Active,
    Inactive,
}

/// Exactly four ASCII digits, leading zeros kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FourDigitCode(String);

impl FourDigitCode {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(format!("'{s}' is not a 4-digit code"))
        }
    }

    pub fn random() -> Self {
        let n: u16 = rand::thread_rng().gen_range(0..10_000);
        Self(format!("{n:04}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FourDigitCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FourDigitCode> for String {
    fn from(code: FourDigitCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for FourDigitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a scanned QR code decodes to: `{base}/redeem?business={uuid}&code={dddd}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub business_id: Uuid,
    pub code: FourDigitCode,
}

impl QrPayload {
    pub fn to_url(&self, base_url: &str) -> String {
        format!(
            "{}/redeem?business={}&code={}",
            base_url.trim_end_matches('/'),
            self.business_id,
            self.code
        )
    }

    /// Only the query string matters; the host may differ between environments.
    pub fn parse(payload: &str) -> Result<Self, String> {
        let query = payload
            .trim()
            .split_once('?')
            .map(|(_, q)| q)
            .ok_or_else(|| "QR payload has no query string".to_string())?;
        let query = query.split('#').next().unwrap_or(query);

        let mut business_id = None;
        let mut code = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("business", v)) => {
                    business_id = Some(
                        v.parse::<Uuid>()
                            .map_err(|_| "QR payload has an invalid business id".to_string())?,
                    )
                }
                Some(("code", v)) => code = Some(FourDigitCode::parse(v)?),
                _ => {}
            }
        }

        match (business_id, code) {
            (Some(business_id), Some(code)) => Ok(Self { business_id, code }),
            _ => Err("QR payload is missing business or code".into()),
        }
    }
}

/// Body for POST /qr-codes/validate.
#[derive(Debug, Deserialize)]
pub struct ValidateCodeRequest {
    pub business_id: Uuid,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_digit_code_keeps_leading_zeros() {
        assert_eq!(FourDigitCode::parse("0042").unwrap().as_str(), "0042");
        assert_eq!(FourDigitCode::parse(" 4821 ").unwrap().as_str(), "4821");
    }

    #[test]
    fn four_digit_code_rejects_other_shapes() {
        for bad in ["", "123", "12345", "12a4", "-123", "١٢٣٤"] {
            assert!(FourDigitCode::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn random_codes_are_well_formed() {
        for _ in 0..200 {
            let code = FourDigitCode::random();
            assert!(FourDigitCode::parse(code.as_str()).is_ok());
        }
    }

    #[test]
    fn payload_url_parses_back() {
        let business_id = Uuid::new_v4();
        let payload = QrPayload {
            business_id,
            code: FourDigitCode::parse("0907").unwrap(),
        };
        let url = payload.to_url("https://fuddi.app/");
        assert_eq!(url, format!("https://fuddi.app/redeem?business={business_id}&code=0907"));
        assert_eq!(QrPayload::parse(&url).unwrap(), payload);
    }

    #[test]
    fn payload_parse_ignores_order_and_extra_params() {
        let id = Uuid::new_v4();
        let parsed =
            QrPayload::parse(&format!("http://localhost/redeem?utm=x&code=1234&business={id}#top"))
                .unwrap();
        assert_eq!(parsed.business_id, id);
        assert_eq!(parsed.code.as_str(), "1234");
    }

    #[test]
    fn payload_parse_errors() {
        assert!(QrPayload::parse("https://fuddi.app/redeem").is_err());
        assert!(QrPayload::parse("https://fuddi.app/redeem?code=1234").is_err());
        assert!(QrPayload::parse("https://fuddi.app/redeem?business=nope&code=1234").is_err());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(serde_json::to_string(&QrStatus::Active).unwrap(), r#""active""#);
        assert!(serde_json::from_str::<QrStatus>(r#""expired""#).is_err());
    }

    #[test]
    fn code_deserializes_with_validation() {
        assert!(serde_json::from_str::<FourDigitCode>(r#""4821""#).is_ok());
        assert!(serde_json::from_str::<FourDigitCode>(r#""48""#).is_err());
    }
}
