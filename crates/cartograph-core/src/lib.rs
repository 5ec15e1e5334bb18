//! Cartograph Core Types and Definitions
//!
//! This crate holds the architecture model behind Cartograph. It includes:
//!
//! - **Identifiers**: Per-workspace id allocation and typed handles
//!   ([`identifier`] module)
//! - **Model**: The [`model::Workspace`] graph of people, software systems,
//!   containers and components, its relationship builder and the derivation
//!   of implied relationships ([`model`] module)
//! - **Views**: Computed views and automatic layout settings ([`view`] module)
//! - **Errors**: [`error::ModelError`]
//!
//! A [`model::Workspace`] serializes with `serde` into the Structurizr
//! workspace JSON layout.

pub mod error;
pub mod identifier;
pub mod model;
pub mod view;

mod schema;
