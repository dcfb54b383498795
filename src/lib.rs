//! salesdw - a star-schema sales warehouse
//!
//! Loads raw sales records into one fact table and three dimensions,
//! reports rejected records and integrity violations, and answers a fixed
//! set of analytical queries.

pub mod cli;
pub mod etl;
pub mod observability;
pub mod query;
pub mod schema;
pub mod storage;
pub mod warehouse;
