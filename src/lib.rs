//! Device check-in/check-out tracking: badge validation, scan storage and
//! scan exports, served over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod export;
pub mod host;
pub mod model;
pub mod routes;
pub mod storage;
pub mod utils;
