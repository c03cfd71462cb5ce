//! Core types and components for FlexCrew workforce scheduling.
//!
//! This crate has no HTTP or database dependencies. The
//! four components ([`ledger`], [`optimizer`], [`staffing`], [`analytics`])
//! read and write through the [`store::DirectoryStore`] trait, which storage
//! backends (e.g. `flexcrew-store-sqlite`) implement.

// `DirectoryStore` spells out `Send` on its returned futures.
#![allow(async_fn_in_trait)]

pub mod analytics;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod optimizer;
pub mod project;
pub mod punctuality;
pub mod schedule;
pub mod staffing;
pub mod store;
pub mod workforce;

pub use error::{EntityKind, Error, Result};

#[cfg(test)]
mod tests;
