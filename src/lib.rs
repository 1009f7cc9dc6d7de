// Library for tests to access modules

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod poller;
pub mod routes;
pub mod transform;
pub mod version;
