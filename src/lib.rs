pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod leetcode;
pub mod logger;
pub mod model;
pub mod stats;
