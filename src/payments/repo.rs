use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::Date;
use tracing::{info, warn};

use crate::errors::ApiError;

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Named payment method. Reference data; lifecycle managed outside this
/// service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentOption {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl PaymentOption {
    pub async fn list_active(db: &PgPool) -> Result<Vec<PaymentOption>, ApiError> {
        let options = sqlx::query_as::<_, PaymentOption>(
            r#"
            SELECT id, name, description, is_active
            FROM payment_options
            WHERE is_active = TRUE
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub payment_option_id: i32,
    pub transaction_id: Option<String>,
    pub status: String,
    pub payment_date: Option<Date>,
    pub notes: Option<String>,
}

/// Validated input for [`record_payment`].
#[derive(Debug)]
pub struct NewPayment {
    pub booking_id: i32,
    pub amount: Decimal,
    pub payment_option_id: i32,
    pub transaction_id: Option<String>,
    pub status: String,
    pub payment_date: Option<Date>,
    pub notes: Option<String>,
}

/// Insert the payment and mirror its status/date onto the referenced booking,
/// inside one transaction so no payment row survives a failed booking update.
/// The row lock taken by the UPDATE serializes concurrent payments against the
/// same booking; the last committed payment decides the booking's state.
pub async fn record_payment(db: &PgPool, new: NewPayment) -> Result<Payment, ApiError> {
    let mut tx = db.begin().await?;

    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments
            (booking_id, amount, payment_option_id, transaction_id, status, payment_date, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, booking_id, amount, payment_option_id, transaction_id,
                  status, payment_date, notes
        "#,
    )
    .bind(new.booking_id)
    .bind(new.amount)
    .bind(new.payment_option_id)
    .bind(&new.transaction_id)
    .bind(&new.status)
    .bind(new.payment_date)
    .bind(&new.notes)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_fk_violation)?;

    let updated = sqlx::query(
        r#"
        UPDATE bookings
        SET payment_status = $1, payment_date = $2
        WHERE id = $3
        "#,
    )
    .bind(&payment.status)
    .bind(payment.payment_date)
    .bind(payment.booking_id)
    .execute(&mut *tx)
    .await?;

    // The FK on payments.booking_id makes this unreachable against the
    // canonical schema; kept for stores that relax the constraint.
    if updated.rows_affected() == 0 {
        warn!(booking_id = payment.booking_id, "booking missing, payment recorded without status update");
    }

    tx.commit().await?;

    info!(
        payment_id = payment.id,
        booking_id = payment.booking_id,
        status = %payment.status,
        "payment recorded"
    );
    Ok(payment)
}

/// A foreign-key violation means the request named a nonexistent booking or
/// payment option; anything else is an infrastructure failure.
fn map_fk_violation(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            let reference = match db_err.constraint() {
                Some(c) if c.contains("booking") => "booking",
                _ => "payment option",
            };
            return ApiError::ReferentialIntegrity(reference);
        }
    }
    ApiError::from(e)
}
