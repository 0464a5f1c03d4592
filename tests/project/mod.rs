//! Signature directory loading tests
