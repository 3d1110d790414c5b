use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

use crate::errors::ApiError;

/// Request body for recording a payment against a booking.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub booking_id: i32,
    pub amount: Decimal,
    pub payment_option_id: i32,
    pub transaction_id: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub payment_date: Option<Date>,
    pub notes: Option<String>,
}

fn default_status() -> String {
    "Pending".to_string()
}

impl CreatePaymentRequest {
    /// Amount must be a non-negative fixed-point value with at most two
    /// fractional digits.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.amount.is_sign_negative() {
            return Err(ApiError::Validation("amount must be non-negative".into()));
        }
        if self.amount.scale() > 2 {
            return Err(ApiError::Validation(
                "amount must have at most 2 decimal places".into(),
            ));
        }
        if self.status.trim().is_empty() {
            return Err(ApiError::Validation("status must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> CreatePaymentRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn status_defaults_to_pending() {
        let req = request(serde_json::json!({
            "booking_id": 5,
            "amount": "100.00",
            "payment_option_id": 1,
        }));
        assert_eq!(req.status, "Pending");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn explicit_status_is_kept() {
        let req = request(serde_json::json!({
            "booking_id": 5,
            "amount": "100.00",
            "payment_option_id": 1,
            "status": "Paid",
            "payment_date": "2026-08-25",
        }));
        assert_eq!(req.status, "Paid");
        assert_eq!(
            req.payment_date,
            Some(time::macros::date!(2026 - 08 - 25))
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let req = request(serde_json::json!({
            "booking_id": 5,
            "amount": "-1.00",
            "payment_option_id": 1,
        }));
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn amount_with_three_decimals_is_rejected() {
        let req = request(serde_json::json!({
            "booking_id": 5,
            "amount": "10.001",
            "payment_option_id": 1,
        }));
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn zero_amount_is_allowed() {
        let req = request(serde_json::json!({
            "booking_id": 5,
            "amount": "0.00",
            "payment_option_id": 1,
        }));
        assert!(req.validate().is_ok());
    }
}
