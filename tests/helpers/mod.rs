//! Shared test helpers.

#![allow(dead_code)]

pub mod fixtures;
pub mod model_assertions;
