pub mod api;
pub mod collector;
pub mod config;
pub mod remote;
pub mod store;
