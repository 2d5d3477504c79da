use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::FailurePolicy,
    error::{profile_required, ServiceError},
    models::{
        qr_code::{FourDigitCode, QrPayload},
        redemption::{DailyRedemptionCount, PromotionRedemption, RedeemRequest, RedemptionMethod},
    },
    services::{
        metrics::REDEMPTIONS_COUNTER, promotion::PromotionService, qr_code::QrCodeService,
    },
};

const REDEMPTION_COLUMNS: &str = "id, promotion_id, client_id, business_id, method, \
                                  redemption_amount, redemption_date, redemption_day";

/// Longest series served to the business dashboard.
const MAX_DAILY_SERIES: i64 = 90;

/// Longest run of skipped local wall-clock time a zone transition can produce.
const MAX_GAP_MINUTES: i64 = 48 * 60;

/// First instant of `day` in `tz`. When midnight falls in a DST gap the day
/// starts at the first local minute that exists.
fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    (0..=MAX_GAP_MINUTES)
        .map(|m| midnight + Duration::minutes(m))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// `[start, end)` of the calendar day containing `now`, in `now`'s own
/// timezone, expressed in UTC.
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();
    (start_of_day(&tz, today), start_of_day(&tz, today + Duration::days(1)))
}

/// The code a redemption request carries, checked against the promotion's business.
fn resolve_code(req: &RedeemRequest, business_id: Uuid) -> Result<FourDigitCode, ServiceError> {
    match req.method {
        RedemptionMethod::Code => {
            let raw = req
                .code
                .as_deref()
                .ok_or_else(|| ServiceError::InvalidInput("code is required".into()))?;
            FourDigitCode::parse(raw).map_err(|_| ServiceError::InvalidCode)
        }
        RedemptionMethod::Qr => {
            let raw = req
                .qr_payload
                .as_deref()
                .ok_or_else(|| ServiceError::InvalidInput("qr_payload is required".into()))?;
            let payload = QrPayload::parse(raw).map_err(|_| ServiceError::InvalidCode)?;
            if payload.business_id != business_id {
                return Err(ServiceError::InvalidCode);
            }
            Ok(payload.code)
        }
    }
}

/// Zero-fill a sparse per-day count series ending on `last_day`.
fn fill_days(
    counts: &[DailyRedemptionCount],
    last_day: NaiveDate,
    days: i64,
) -> Vec<DailyRedemptionCount> {
    (0..days)
        .rev()
        .map(|back| {
            let day = last_day - Duration::days(back);
            let redemptions = counts
                .iter()
                .find(|c| c.day == day)
                .map_or(0, |c| c.redemptions);
            DailyRedemptionCount { day, redemptions }
        })
        .collect()
}

pub struct RedemptionService;

impl RedemptionService {
    /// Whether the client already redeemed this promotion during the local day of `now`.
    pub async fn check_today_redemption(
        pool: &PgPool,
        promotion_id: Uuid,
        client_id: Uuid,
        now: DateTime<Local>,
    ) -> Result<bool, ServiceError> {
        let (start, end) = day_bounds(&now);
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM promotion_redemptions
                 WHERE promotion_id = $1 AND client_id = $2
                   AND redemption_date >= $3 AND redemption_date < $4
             )",
        )
        .bind(promotion_id)
        .bind(client_id)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Record a client's redemption of a promotion after validating its code.
    ///
    /// The duplicate pre-check gives a fast answer; the unique index on
    /// (promotion, client, day) decides races between concurrent submissions.
    pub async fn redeem(
        pool: &PgPool,
        client_id: Uuid,
        req: &RedeemRequest,
        policy: FailurePolicy,
        now: DateTime<Local>,
    ) -> Result<PromotionRedemption, ServiceError> {
        let method = req.method.as_str();
        let result = Self::redeem_inner(pool, client_id, req, policy, now).await;
        let status = match &result {
            Ok(_) => "success",
            Err(ServiceError::InvalidCode) => "invalid_code",
            Err(ServiceError::AlreadyRedeemedToday) => "duplicate",
            Err(_) => "rejected",
        };
        REDEMPTIONS_COUNTER.with_label_values(&[method, status]).inc();
        result
    }

    async fn redeem_inner(
        pool: &PgPool,
        client_id: Uuid,
        req: &RedeemRequest,
        policy: FailurePolicy,
        now: DateTime<Local>,
    ) -> Result<PromotionRedemption, ServiceError> {
        if matches!(req.redemption_amount, Some(a) if !a.is_finite() || a < 0.0) {
            return Err(ServiceError::InvalidInput(
                "redemption_amount must be a non-negative number".into(),
            ));
        }

        let today = now.date_naive();
        let promotion = PromotionService::get(pool, req.promotion_id).await?;
        if !promotion.is_active_on(today) {
            return Err(ServiceError::Conflict("Promotion is not active today".into()));
        }

        let code = resolve_code(req, promotion.business_id)?;
        let valid = QrCodeService::validate_four_digit_code(
            pool,
            promotion.business_id,
            code.as_str(),
            policy,
        )
        .await?;
        if !valid {
            return Err(ServiceError::InvalidCode);
        }

        if Self::check_today_redemption(pool, promotion.id, client_id, now).await? {
            return Err(ServiceError::AlreadyRedeemedToday);
        }

        let inserted = sqlx::query_as::<_, PromotionRedemption>(&format!(
            "INSERT INTO promotion_redemptions
                 (promotion_id, client_id, business_id, method, redemption_amount, redemption_date, redemption_day)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (promotion_id, client_id, redemption_day) DO NOTHING
             RETURNING {REDEMPTION_COLUMNS}"
        ))
        .bind(promotion.id)
        .bind(client_id)
        .bind(promotion.business_id)
        .bind(req.method)
        .bind(req.redemption_amount)
        .bind(now.with_timezone(&Utc))
        .bind(today)
        .fetch_optional(pool)
        .await
        .map_err(profile_required("Client profile"))?;

        let redemption = inserted.ok_or(ServiceError::AlreadyRedeemedToday)?;
        tracing::info!(
            "Promotion {} redeemed by client {client_id} via {}",
            promotion.id,
            req.method.as_str()
        );
        Ok(redemption)
    }

    pub async fn list_for_client(
        pool: &PgPool,
        client_id: Uuid,
    ) -> Result<Vec<PromotionRedemption>, ServiceError> {
        let rows = sqlx::query_as::<_, PromotionRedemption>(&format!(
            "SELECT {REDEMPTION_COLUMNS} FROM promotion_redemptions
             WHERE client_id = $1
             ORDER BY redemption_date DESC
             LIMIT 200"
        ))
        .bind(client_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_business(
        pool: &PgPool,
        business_id: Uuid,
    ) -> Result<Vec<PromotionRedemption>, ServiceError> {
        let rows = sqlx::query_as::<_, PromotionRedemption>(&format!(
            "SELECT {REDEMPTION_COLUMNS} FROM promotion_redemptions
             WHERE business_id = $1
             ORDER BY redemption_date DESC
             LIMIT 200"
        ))
        .bind(business_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Redemptions per day over the last `days` days (today included), zero-filled.
    pub async fn daily_counts(
        pool: &PgPool,
        business_id: Uuid,
        days: i64,
        today: NaiveDate,
    ) -> Result<Vec<DailyRedemptionCount>, ServiceError> {
        let days = days.clamp(1, MAX_DAILY_SERIES);
        let first_day = today - Duration::days(days - 1);
        let counts = sqlx::query_as::<_, DailyRedemptionCount>(
            "SELECT redemption_day AS day, COUNT(*)::BIGINT AS redemptions
             FROM promotion_redemptions
             WHERE business_id = $1 AND redemption_day BETWEEN $2 AND $3
             GROUP BY redemption_day
             ORDER BY redemption_day",
        )
        .bind(business_id)
        .bind(first_day)
        .bind(today)
        .fetch_all(pool)
        .await?;
        Ok(fill_days(&counts, today, days))
    }
}
