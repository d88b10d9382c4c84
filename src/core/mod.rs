//! Core business logic - framework-agnostic operations over the CMS records.

/// Department records and their students
pub mod department;
/// Employee records and employee/student links
pub mod employee;
/// Blocks and the rooms inside them
pub mod facility;
/// Course catalogue
pub mod course;
/// Exam schedules and their timeslots
pub mod schedule;
/// Exam sittings and their invigilators
pub mod scheduler_line;
/// Exam-slip report rendering
pub mod report;
/// Named sequences used to issue admission numbers
pub mod sequence;
/// Student records and derived fields
pub mod student;
/// Student approval state machine
pub mod workflow;
