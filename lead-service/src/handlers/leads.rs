use axum::{extract::State, Json};

use super::AppJson;
use crate::models::Lead;
use crate::services::IntakeReceipt;
use crate::startup::AppState;
use service_core::error::AppError;

#[tracing::instrument(name = "create_lead", skip_all)]
pub async fn create_lead(
    State(state): State<AppState>,
    AppJson(lead): AppJson<Lead>,
) -> Result<Json<IntakeReceipt>, AppError> {
    let receipt = state.intake.submit(lead).await?;
    Ok(Json(receipt))
}
