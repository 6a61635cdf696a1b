//! # thermohub-adapter-http-axum
//!
//! HTTP adapter using [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a read-only JSON API over the accessory cache, the published
//!   characteristics and the history log
//! - Map domain errors to HTTP status codes
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness check |
//! | `GET` | `/api/accessories` | Every accessory with its channel status |
//! | `GET` | `/api/accessories/{id}` | One accessory with its information and channels |
//! | `GET` | `/api/accessories/{id}/history?limit=` | Most recent history entries |
//!
//! ## Dependency rule
//! Depends on `thermohub-app` (port traits) and `thermohub-domain` (types).

pub mod api;
pub mod error;
pub mod router;
pub mod state;
