//! Discord interaction handlers.

/// Autocomplete for command parameters
pub mod autocomplete;
