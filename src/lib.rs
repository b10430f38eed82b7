// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod graph;
pub mod grapher;
pub mod input;
pub mod json_schema;
pub mod label;
pub mod model;
pub mod relation;
pub mod schema;
pub mod style;
