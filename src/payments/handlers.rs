use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::CurrentUser;
use crate::errors::ApiError;
use crate::payments::{
    dto::CreatePaymentRequest,
    repo::{self, NewPayment, Payment, PaymentOption},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payment-options", get(list_payment_options))
        .route("/payments", post(create_payment))
}

#[instrument(skip(state))]
pub async fn list_payment_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentOption>>, ApiError> {
    let options = PaymentOption::list_active(&state.db).await?;
    Ok(Json(options))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    payload.validate()?;

    let payment = repo::record_payment(
        &state.db,
        NewPayment {
            booking_id: payload.booking_id,
            amount: payload.amount,
            payment_option_id: payload.payment_option_id,
            transaction_id: payload.transaction_id,
            status: payload.status,
            payment_date: payload.payment_date,
            notes: payload.notes,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}
