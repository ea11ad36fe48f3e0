//! HTTP clients for the external embedding, completion and model-listing
//! services. Every response body goes through [`decode`] before its fields
//! are read.

pub mod complete;
pub mod decode;
pub mod embed;
pub mod http;
pub mod models;
