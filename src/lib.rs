//! Garden tracker: plant library, gardens shared between users, plantings
//! and their derived growth phases.

pub mod cli;
pub mod dashboard;
pub mod dates;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod models;
pub mod report;
pub mod seed;
pub mod service;
pub mod timeline;

pub use error::{Error, Result};
