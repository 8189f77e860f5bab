//! Extractors whose rejections are rendered as error envelopes
//! instead of axum's plain-text bodies.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query};

use crate::errors::ErrorEnvelope;

/// JSON body extractor
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ErrorEnvelope))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ErrorEnvelope))]
pub struct ApiPath<T>(pub T);

/// Query string extractor
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ErrorEnvelope))]
pub struct ApiQuery<T>(pub T);
