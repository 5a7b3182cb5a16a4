//! Cache module for normalized listing pages
//!
//! This module provides an in-memory cache manager with a fixed TTL per
//! entry. Expired entries read as absent, so callers simply fetch again.

mod manager;

pub use manager::CacheManager;
