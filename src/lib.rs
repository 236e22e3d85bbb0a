//! Insurance Premium Quote API Library
//!
//! This library provides the core functionality for the premium quote
//! service: configuration, the feature-encoding contract between the quote
//! form and the regression model, the model artifact loader, and the HTTP
//! handlers that tie them together.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `dataset`: Reference dataset summary (inert artifact).
//! - `encoder`: Quote request to model feature-row encoding.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: API data models and field domains.
//! - `regressor`: Gradient-boosting model artifact loading and prediction.

pub mod config;
pub mod dataset;
pub mod encoder;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod regressor;
