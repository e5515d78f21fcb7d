//! Modules layer - infrastructure behind the feature services
//!
//! Contains the storage backends that own the canonical category and review
//! collections.

pub mod storage;
