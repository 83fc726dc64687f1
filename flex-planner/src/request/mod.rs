//! Search request validation.
//!
//! Raw [`QueryParams`] come in from the HTTP layer; [`RequestValidator`]
//! applies defaults and limits and checks the cross-field rules, producing
//! an immutable [`Request`] or a [`ParameterError`].

mod canonical;
mod config;
mod error;
mod optimize;
mod params;
mod validate;

pub use canonical::{Request, TriangleFactors};
pub use config::ValidatorConfig;
pub use error::ParameterError;
pub use optimize::{InvalidOptimizeType, OptimizeType};
pub use params::QueryParams;
pub use validate::RequestValidator;
