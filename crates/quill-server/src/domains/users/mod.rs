pub mod catalog;
pub mod http;
pub mod manager;
pub mod role_sync;
pub mod service;
