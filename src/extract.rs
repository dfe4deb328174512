//! Extractors whose rejections render as the JSON error envelope.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use crate::error::HttpError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(HttpError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(HttpError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(HttpError))]
pub struct AppQuery<T>(pub T);
