//! Test utilities for Kiln development.
//!
//! - [`LeakCheck`] asserts at scope end that every tracked block was
//!   disposed explicitly.
//! - [`ScheduleScript`] drives worker threads through an exact
//!   interleaving so partition properties can be checked across
//!   schedules rather than whatever the OS happens to pick.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod leak;
pub mod schedule;

pub use leak::LeakCheck;
pub use schedule::ScheduleScript;
