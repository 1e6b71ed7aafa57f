//! In-memory CRUD store.
//!
//! This module handles:
//! - The [`Resource`] trait describing one record type
//! - The [`Store`] owning the ordered collection and identifier counter

pub mod memory;
pub mod resource;

pub use memory::Store;
pub use resource::Resource;
