//! Linkvault - link persistence and lifecycle engine
//!
//! This library provides the storage core of a URL shortener service:
//! mapping long URLs to opaque short codes and resolving them back, with
//! the mapping persisted across interchangeable backends.
//!
//! # Architecture
//! - `storage`: the `LinkStore` trait and its three backends (in-memory
//!   map, append-only log file, SeaORM relational database)
//! - `services`: the `LinkService` facade and the buffered soft-delete
//!   pipeline worker
//! - `config`: explicit application configuration (TOML file + env)
//! - `errors`: crate-wide error type and taxonomy
//! - `logging`: tracing subscriber setup
//!
//! The HTTP/gRPC transport, identity resolution, and TLS are external
//! collaborators; they consume `services::LinkService` and are not part
//! of this crate.

pub mod config;
pub mod errors;
pub mod logging;
pub mod services;
pub mod storage;
pub mod utils;
