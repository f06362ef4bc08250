//! Row models for the source tables.

pub mod edit_event;
pub mod member;
pub mod project;
pub mod record;
