use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::FailurePolicy,
    error::{is_unique_violation, profile_required, ServiceError},
    models::qr_code::{BusinessQrCode, FourDigitCode, QrPayload, QrStatus},
    services::metrics::CODE_VALIDATIONS_COUNTER,
};

const QR_COLUMNS: &str = "id, business_id, four_digit_code, qr_payload, status, created_at";

pub struct QrCodeService;

impl QrCodeService {
    pub async fn get_active(
        pool: &PgPool,
        business_id: Uuid,
    ) -> Result<Option<BusinessQrCode>, ServiceError> {
        let row = sqlx::query_as::<_, BusinessQrCode>(&format!(
            "SELECT {QR_COLUMNS} FROM business_qr_codes
             WHERE business_id = $1 AND status = $2"
        ))
        .bind(business_id)
        .bind(QrStatus::Active)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Replace the business's active code with a fresh random one.
    ///
    /// Deactivation and insertion share a transaction, and the partial unique
    /// index on active rows makes a concurrent rotation fail instead of
    /// leaving two active codes.
    pub async fn rotate(
        pool: &PgPool,
        business_id: Uuid,
        base_url: &str,
    ) -> Result<BusinessQrCode, ServiceError> {
        let code = FourDigitCode::random();
        let payload = QrPayload {
            business_id,
            code: code.clone(),
        }
        .to_url(base_url);

        let mut tx = pool.begin().await?;

        let deactivated = sqlx::query(
            "UPDATE business_qr_codes SET status = $2 WHERE business_id = $1 AND status = $3",
        )
        .bind(business_id)
        .bind(QrStatus::Inactive)
        .bind(QrStatus::Active)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let inserted = sqlx::query_as::<_, BusinessQrCode>(&format!(
            "INSERT INTO business_qr_codes (business_id, four_digit_code, qr_payload, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {QR_COLUMNS}"
        ))
        .bind(business_id)
        .bind(code.as_str())
        .bind(&payload)
        .bind(QrStatus::Active)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(e) if is_unique_violation(&e) => {
                return Err(ServiceError::Conflict(
                    "Another code rotation is in progress, retry".into(),
                ))
            }
            Err(e) => return Err(profile_required("Business profile")(e)),
        };

        tx.commit().await?;
        tracing::info!(
            "QR code rotated for business {business_id} ({deactivated} previous code(s) deactivated)"
        );
        Ok(row)
    }

    async fn lookup_active_code(
        pool: &PgPool,
        business_id: Uuid,
        code: &FourDigitCode,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM business_qr_codes
                 WHERE business_id = $1 AND four_digit_code = $2 AND status = $3
             )",
        )
        .bind(business_id)
        .bind(code.as_str())
        .bind(QrStatus::Active)
        .fetch_one(pool)
        .await
    }

    /// True iff `code` is the business's active 4-digit code. Input that is
    /// not four digits can never match and is simply invalid.
    pub async fn validate_four_digit_code(
        pool: &PgPool,
        business_id: Uuid,
        code: &str,
        policy: FailurePolicy,
    ) -> Result<bool, ServiceError> {
        let Ok(code) = FourDigitCode::parse(code) else {
            CODE_VALIDATIONS_COUNTER.with_label_values(&["invalid"]).inc();
            return Ok(false);
        };
        let lookup = Self::lookup_active_code(pool, business_id, &code).await;
        resolve_lookup(lookup, policy, business_id)
    }
}

/// Turn the raw lookup into a validation outcome under `policy`.
fn resolve_lookup(
    lookup: Result<bool, sqlx::Error>,
    policy: FailurePolicy,
    business_id: Uuid,
) -> Result<bool, ServiceError> {
    match (lookup, policy) {
        (Ok(valid), _) => {
            let outcome = if valid { "valid" } else { "invalid" };
            CODE_VALIDATIONS_COUNTER.with_label_values(&[outcome]).inc();
            Ok(valid)
        }
        (Err(e), FailurePolicy::Open) => {
            tracing::warn!(
                "Code lookup failed for business {business_id}, accepting code (fail-open): {e}"
            );
            CODE_VALIDATIONS_COUNTER.with_label_values(&["fail_open"]).inc();
            Ok(true)
        }
        (Err(e), FailurePolicy::Closed) => {
            tracing::error!("Code lookup failed for business {business_id}: {e}");
            CODE_VALIDATIONS_COUNTER.with_label_values(&["error"]).inc();
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    fn permission_denied() -> sqlx::Error {
        sqlx::Error::Protocol("permission denied for table business_qr_codes".into())
    }

    #[test]
    fn successful_lookup_is_authoritative_under_both_policies() {
        let id = Uuid::new_v4();
        for policy in [FailurePolicy::Open, FailurePolicy::Closed] {
            assert!(resolve_lookup(Ok(true), policy, id).unwrap());
            assert!(!resolve_lookup(Ok(false), policy, id).unwrap());
        }
    }

    #[test]
    fn fail_open_accepts_when_lookup_errors() {
        let id = Uuid::new_v4();
        assert!(resolve_lookup(Err(permission_denied()), FailurePolicy::Open, id).unwrap());
        assert!(resolve_lookup(Err(sqlx::Error::PoolTimedOut), FailurePolicy::Open, id).unwrap());
    }

    #[test]
    fn fail_closed_surfaces_the_error() {
        let id = Uuid::new_v4();
        let err = resolve_lookup(Err(permission_denied()), FailurePolicy::Closed, id).unwrap_err();
        assert!(matches!(err, ServiceError::Database(_)));
    }

    async fn validate(pool: &PgPool, business_id: Uuid, code: &str) -> bool {
        QrCodeService::validate_four_digit_code(pool, business_id, code, FailurePolicy::Closed)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn active_code_matches_only_itself(pool: PgPool) {
        let business = fixtures::business(&pool).await;
        fixtures::qr_code(&pool, business, "4821", "active").await;

        assert!(validate(&pool, business, "4821").await);
        assert!(!validate(&pool, business, "4820").await);
        assert!(!validate(&pool, business, "48").await);

        let other = fixtures::business(&pool).await;
        assert!(!validate(&pool, other, "4821").await);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn no_active_code_rejects_everything(pool: PgPool) {
        let business = fixtures::business(&pool).await;
        for code in ["0000", "4821", "9999"] {
            assert!(!validate(&pool, business, code).await);
        }

        fixtures::qr_code(&pool, business, "4821", "inactive").await;
        assert!(!validate(&pool, business, "4821").await);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn rotation_replaces_the_active_code(pool: PgPool) {
        let business = fixtures::business(&pool).await;
        let first = QrCodeService::rotate(&pool, business, "https://fuddi.app").await.unwrap();
        let second = QrCodeService::rotate(&pool, business, "https://fuddi.app").await.unwrap();

        assert_eq!(second.status, QrStatus::Active);
        assert!(second.qr_payload.ends_with(&format!("code={}", second.four_digit_code)));
        let active = QrCodeService::get_active(&pool, business).await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        assert!(validate(&pool, business, &second.four_digit_code).await);
        if first.four_digit_code != second.four_digit_code {
            assert!(!validate(&pool, business, &first.four_digit_code).await);
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn concurrent_rotations_leave_one_active_code(pool: PgPool) {
        let business = fixtures::business(&pool).await;
        QrCodeService::rotate(&pool, business, "https://fuddi.app").await.unwrap();

        let (a, b) = tokio::join!(
            QrCodeService::rotate(&pool, business, "https://fuddi.app"),
            QrCodeService::rotate(&pool, business, "https://fuddi.app"),
        );
        for outcome in [&a, &b] {
            assert!(
                matches!(outcome, Ok(_) | Err(ServiceError::Conflict(_))),
                "{outcome:?}"
            );
        }
        assert!(a.is_ok() || b.is_ok());

        let active = fixtures::count(
            &pool,
            &format!(
                "SELECT COUNT(*) FROM business_qr_codes \
                 WHERE business_id = '{business}' AND status = 'active'"
            ),
        )
        .await;
        assert_eq!(active, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn rotating_without_a_profile_is_not_found(pool: PgPool) {
        let err = QrCodeService::rotate(&pool, Uuid::new_v4(), "https://fuddi.app")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("Business profile")), "{err:?}");
    }
}
