//! Crate-level test support and end-to-end dispatch behaviour.

pub(crate) mod support;
