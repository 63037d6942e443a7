//! Services Layer
//!
//! Pure logic shared by the HTTP handlers. Nothing here touches the store.

pub mod validation;

pub use validation::{FieldError, FieldRule, Validation};
