//! Infrastructure layer - database driver and logging subscriber

pub mod db;
pub mod logging;
