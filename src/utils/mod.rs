//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_validator`] - Target URL validation
//! - [`storage_retry`] - Timeout and bounded retry around store calls

pub mod code_generator;
pub mod storage_retry;
pub mod url_validator;
