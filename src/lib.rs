//! Settlekit Library
//!
//! Client for a community resource site aimed at newcomers. The crate's core
//! is a cache-plus-retry data-access layer: an expiring in-memory cache, a
//! retrying HTTP fetcher, and a cache-first accessor composing the two.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod service;
pub mod store;
