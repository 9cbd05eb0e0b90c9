pub mod health;
pub mod leads;

use axum::extract::FromRequest;
use service_core::error::AppError;

pub use health::{diagnostics, health_check, hello, metrics_endpoint, readiness_check, root};
pub use leads::create_lead;

/// JSON body extractor whose rejections render as `AppError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
