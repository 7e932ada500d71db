pub mod config;
pub mod dashboard;
pub mod forecast;
pub mod presentation;
pub mod routes;
pub mod utils;
