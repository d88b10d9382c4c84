//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Exam schedule commands
pub mod exam;

/// General utility commands
pub mod general;

/// Student workflow commands
pub mod student;

// Export commands
pub use exam::*;
pub use general::*;
pub use student::*;
