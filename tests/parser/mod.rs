//! Signature-text front-end tests

pub mod tests_signature;
