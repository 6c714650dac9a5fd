//! Core types for the Kiln allocation primitives.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: allocation
//! domains, worker and content identifiers, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod id;

pub use domain::AllocDomain;
pub use error::{ArenaError, ConfigError};
pub use id::{ContentKey, WorkerId};
