pub mod employee;
pub mod error;
pub mod export;
pub mod scan;
