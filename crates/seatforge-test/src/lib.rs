//! Shared test fixtures for SeatForge crates.
//!
//! This crate provides plain data builders for testing. It depends on
//! `seatforge-core` only, so every other crate can use it as a
//! dev-dependency without cycles.
//!
//! - [`plan`] - guest/table generators and [`PlanInputBuilder`]
//! - [`scenario`] - reference plans used across the engine tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! seatforge-test = { workspace = true }
//! ```
//!
//! ```
//! use seatforge_test::{guests, tables, PlanInputBuilder};
//!
//! let input = PlanInputBuilder::new()
//!     .guests(guests(4))
//!     .tables(tables(&[2, 2]))
//!     .build();
//! assert_eq!(input.guests[3].id.as_str(), "g4");
//! assert_eq!(input.tables[1].id.as_str(), "t2");
//! ```

pub mod plan;
pub mod scenario;

pub use plan::{guest_id, guests, problem, table_id, tables, PlanInputBuilder};
