pub mod config;
pub mod engine;
pub mod fixture;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
pub mod time;
