//! RAISE dataset marketplace proxy
//!
//! Normalizes the marketplace's loosely-structured listing responses into a
//! stable, paginated contract and caches each distinct query for a few
//! minutes. The binary in `main.rs` wires everything together; a host web
//! layer does the same through [`api::get_datasets`].

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod render;
