//! Foundational and often-reused types.

pub(crate) mod error;
pub(crate) mod id;
pub(crate) mod member;
