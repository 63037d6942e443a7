//! Presentation seam: handlers name a view and hand over a data bag

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// Turns a named view and its data bag into a response
///
/// View names follow `{kind}_list`, `{kind}_detail`, `{kind}_form`,
/// `{kind}_delete`, plus `index` and `error`.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, data: Value) -> Response;
}

/// Responds with the data bag as JSON: `{"view": ..., "data": ...}`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, view: &str, data: Value) -> Response {
        (StatusCode::OK, Json(json!({ "view": view, "data": data }))).into_response()
    }
}

/// 302 to `location`
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Map a slice of records to their view representations
pub fn views<T>(items: &[T], view: impl Fn(&T) -> Value) -> Vec<Value> {
    items.iter().map(view).collect()
}
