#![forbid(unsafe_code)]

pub mod executor;
pub mod file;
pub mod record;
pub mod repository;
pub mod sqlite;
