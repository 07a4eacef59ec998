//! Shared counter and message board over HTTP, backed by SQLite.
//!
//! The HTTP layer delegates to [`service::ValueService`], which applies
//! validation and caching on top of the durable [`store::StateStore`].

pub mod api;
pub mod config;
pub mod db;
pub mod service;
pub mod store;
