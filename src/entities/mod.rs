//! Entity module - SeaORM definitions for every CMS table.
//! Each entity has a Model struct for data and an Entity struct for operations;
//! the `*_rel` entities are junction tables backing many-to-many links.

pub mod block;
pub mod course;
pub mod department;
pub mod employee;
pub mod room;
pub mod schedule;
pub mod scheduler_line;
pub mod scheduler_line_invigilator;
pub mod sequence;
pub mod student;
pub mod student_employee;
pub mod timeslot;

// Re-export specific types to avoid conflicts
pub use block::{Column as BlockColumn, Entity as Block, Model as BlockModel};
pub use course::{Column as CourseColumn, Entity as Course, Model as CourseModel};
pub use department::{Column as DepartmentColumn, Entity as Department, Model as DepartmentModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use room::{Column as RoomColumn, Entity as Room, Model as RoomModel};
pub use schedule::{Column as ScheduleColumn, Entity as Schedule, Model as ScheduleModel};
pub use scheduler_line::{
    Column as SchedulerLineColumn, Entity as SchedulerLine, Model as SchedulerLineModel,
};
pub use scheduler_line_invigilator::Entity as SchedulerLineInvigilator;
pub use sequence::{Column as SequenceColumn, Entity as Sequence, Model as SequenceModel};
pub use student::{
    Column as StudentColumn, Entity as Student, Gender, Model as StudentModel, StudentState,
};
pub use student_employee::Entity as StudentEmployee;
pub use timeslot::{Column as TimeSlotColumn, Entity as TimeSlot, Model as TimeSlotModel};
