//! services/api/src/web/extract.rs

use crate::error::ApiError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejections render as `{"detail": ...}` like every other
/// error this service returns.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
