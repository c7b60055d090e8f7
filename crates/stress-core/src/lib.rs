//! Error contract shared by every stress-lab crate
//!
//! Validators produce [`AppError`] values, the server renders them as
//! [`ErrorBody`] documents. Nothing here depends on axum.

mod body;
mod error;
pub mod headers;

pub use body::ErrorBody;
pub use error::{AppError, Details, HttpError};
