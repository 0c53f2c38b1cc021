//! Domain layer - URL composition, connection targets and the connector seam

pub mod connector;
pub mod target;
pub mod urls;

pub use connector::DatabaseConnector;
