pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod runtime;
pub mod service;
pub mod settings;
pub mod vault;

#[cfg(test)]
pub mod test_util;
