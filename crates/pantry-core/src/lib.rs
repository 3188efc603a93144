pub mod config;
pub mod logging;

pub mod connect;
pub mod models;
pub mod password;
pub mod repo;
