//! Student business logic - creation, lookups, updates and derived fields.
//!
//! Derived fields are plain functions: [`compute_grad_date`] is re-run by every
//! operation that writes `admission_date` and its result stored, while
//! [`compute_age`] depends on the current day and is evaluated on read.

use crate::{
    entities::{
        Department, Employee, Gender, Student, StudentEmployee, StudentState, employee, student,
        student_employee,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Years between admission and expected graduation.
pub const PROGRAM_LENGTH_YEARS: i32 = 4;

/// Computes a student's age in whole years as of `today`.
///
/// Years are approximated as 365 days. A missing birth date, or one that is
/// not at least a full year in the past, yields 0.
#[must_use]
pub fn compute_age(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> i32 {
    let Some(date_of_birth) = date_of_birth else {
        return 0;
    };

    let days = (today - date_of_birth).num_days();
    if days <= 0 {
        return 0;
    }

    i32::try_from(days / 365).unwrap_or(i32::MAX)
}

/// Computes the expected graduation year from the admission date.
///
/// This is a year number, not a calendar date.
#[must_use]
pub fn compute_grad_date(admission_date: Option<NaiveDate>) -> Option<i32> {
    admission_date.map(|date| date.year() + PROGRAM_LENGTH_YEARS)
}

impl student::Model {
    /// Age in whole years as of `today`.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        compute_age(self.date_of_birth, today)
    }

    /// Age in whole years as of the current UTC date.
    #[must_use]
    pub fn age(&self) -> i32 {
        self.age_on(Utc::now().date_naive())
    }
}

/// Input for [`create_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    /// Full name
    pub name: String,
    /// Father's name
    pub father_name: String,
    /// Registration number, unique among active students
    pub registration_no: String,
    /// Gender
    pub gender: Gender,
    /// Owning department, if any
    pub department_id: Option<i64>,
    /// National identity card number
    pub cnic: Option<String>,
    /// Landline number
    pub contact_phone: Option<String>,
    /// Mobile number
    pub contact_mobile: Option<String>,
    /// Photo bytes
    pub image: Option<Vec<u8>>,
    /// Admission date; the graduation year is derived from it
    pub admission_date: Option<NaiveDate>,
    /// Date of birth; age is derived from it
    pub date_of_birth: Option<NaiveDate>,
    /// Free-form note
    pub remark: Option<String>,
    /// Discord user ID of the responsible staff member
    pub user_id: Option<String>,
}

impl NewStudent {
    /// Builds a student with the required fields set and the admission date
    /// defaulting to today.
    pub fn new(
        name: impl Into<String>,
        father_name: impl Into<String>,
        registration_no: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            name: name.into(),
            father_name: father_name.into(),
            registration_no: registration_no.into(),
            gender,
            department_id: None,
            cnic: None,
            contact_phone: None,
            contact_mobile: None,
            image: None,
            admission_date: Some(Utc::now().date_naive()),
            date_of_birth: None,
            remark: None,
            user_id: None,
        }
    }
}

/// Partial update for [`update_student`]. `None` leaves a field untouched;
/// nullable fields take `Some(None)` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentChanges {
    /// New name
    pub name: Option<String>,
    /// New father's name
    pub father_name: Option<String>,
    /// New registration number
    pub registration_no: Option<String>,
    /// New gender
    pub gender: Option<Gender>,
    /// New department, or `Some(None)` to detach
    pub department_id: Option<Option<i64>>,
    /// Identity card number
    pub cnic: Option<Option<String>>,
    /// Landline number
    pub contact_phone: Option<Option<String>>,
    /// Mobile number
    pub contact_mobile: Option<Option<String>>,
    /// Photo bytes
    pub image: Option<Option<Vec<u8>>>,
    /// Admission date; re-derives the graduation year
    pub admission_date: Option<Option<NaiveDate>>,
    /// Date of birth
    pub date_of_birth: Option<Option<NaiveDate>>,
    /// Note
    pub remark: Option<Option<String>>,
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("Student {field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

async fn ensure_department_exists<C>(db: &C, department_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(id) = department_id {
        Department::find_by_id(id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "Department",
                id,
            })?;
    }
    Ok(())
}

/// Rejects a registration number already held by another active student.
async fn ensure_registration_no_available<C>(
    db: &C,
    registration_no: &str,
    student_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Student::find()
        .filter(student::Column::RegistrationNo.eq(registration_no))
        .filter(student::Column::Active.eq(true));
    if let Some(id) = student_id {
        query = query.filter(student::Column::Id.ne(id));
    }

    if let Some(holder) = query.one(db).await? {
        return Err(Error::validation(format!(
            "Registration number {registration_no} is already used by student {}",
            holder.name
        )));
    }
    Ok(())
}

/// Creates a student in the `draft` state.
///
/// Name, father name and registration number must not be blank, the
/// registration number must not belong to another active student, and the
/// department, when given, must exist. The graduation year is derived from
/// the admission date.
pub async fn create_student(db: &DatabaseConnection, new: NewStudent) -> Result<student::Model> {
    let name = required(&new.name, "name")?;
    let father_name = required(&new.father_name, "father name")?;
    let registration_no = required(&new.registration_no, "registration number")?;
    ensure_registration_no_available(db, &registration_no, None).await?;
    ensure_department_exists(db, new.department_id).await?;

    let student = student::ActiveModel {
        name: Set(name),
        father_name: Set(father_name),
        registration_no: Set(registration_no),
        department_id: Set(new.department_id),
        cnic: Set(new.cnic),
        contact_phone: Set(new.contact_phone),
        contact_mobile: Set(new.contact_mobile),
        image: Set(new.image),
        admission_date: Set(new.admission_date),
        gender: Set(new.gender),
        user_id: Set(new.user_id),
        date_of_birth: Set(new.date_of_birth),
        admission_no: Set(None),
        grad_date: Set(compute_grad_date(new.admission_date)),
        remark: Set(new.remark),
        state: Set(StudentState::Draft),
        active: Set(true),
        ..Default::default()
    };

    let created = student.insert(db).await?;
    info!(
        "Created student '{}' ({}) with id {}",
        created.name, created.registration_no, created.id
    );
    Ok(created)
}

/// Finds a student by id, archived or not.
pub async fn get_student_by_id<C>(db: &C, student_id: i64) -> Result<Option<student::Model>>
where
    C: ConnectionTrait,
{
    Student::find_by_id(student_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_student_by_id`], but a missing student is an error.
pub async fn require_student<C>(db: &C, student_id: i64) -> Result<student::Model>
where
    C: ConnectionTrait,
{
    get_student_by_id(db, student_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Student",
            id: student_id,
        })
}

/// Finds an active student by registration number.
pub async fn get_student_by_registration_no(
    db: &DatabaseConnection,
    registration_no: &str,
) -> Result<Option<student::Model>> {
    Student::find()
        .filter(student::Column::RegistrationNo.eq(registration_no))
        .filter(student::Column::Active.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active students ordered by name.
pub async fn get_all_active_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::Active.eq(true))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves active students in the given state, ordered by name.
pub async fn get_students_by_state(
    db: &DatabaseConnection,
    state: StudentState,
) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::State.eq(state))
        .filter(student::Column::Active.eq(true))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update and re-derives the graduation year when the
/// admission date changes.
pub async fn update_student(
    db: &DatabaseConnection,
    student_id: i64,
    changes: StudentChanges,
) -> Result<student::Model> {
    let mut student: student::ActiveModel = require_student(db, student_id).await?.into();

    if let Some(name) = changes.name {
        student.name = Set(required(&name, "name")?);
    }
    if let Some(father_name) = changes.father_name {
        student.father_name = Set(required(&father_name, "father name")?);
    }
    if let Some(registration_no) = changes.registration_no {
        let registration_no = required(&registration_no, "registration number")?;
        ensure_registration_no_available(db, &registration_no, Some(student_id)).await?;
        student.registration_no = Set(registration_no);
    }
    if let Some(gender) = changes.gender {
        student.gender = Set(gender);
    }
    if let Some(department_id) = changes.department_id {
        ensure_department_exists(db, department_id).await?;
        student.department_id = Set(department_id);
    }
    if let Some(cnic) = changes.cnic {
        student.cnic = Set(cnic);
    }
    if let Some(contact_phone) = changes.contact_phone {
        student.contact_phone = Set(contact_phone);
    }
    if let Some(contact_mobile) = changes.contact_mobile {
        student.contact_mobile = Set(contact_mobile);
    }
    if let Some(image) = changes.image {
        student.image = Set(image);
    }
    if let Some(admission_date) = changes.admission_date {
        student.admission_date = Set(admission_date);
        student.grad_date = Set(compute_grad_date(admission_date));
    }
    if let Some(date_of_birth) = changes.date_of_birth {
        student.date_of_birth = Set(date_of_birth);
    }
    if let Some(remark) = changes.remark {
        student.remark = Set(remark);
    }

    if !student.is_changed() {
        return require_student(db, student_id).await;
    }

    debug!("Updating student {}", student_id);
    student.update(db).await.map_err(Into::into)
}

/// Archives or restores a student. Archived students drop out of listings.
///
/// Restoring fails when an active student has taken the registration number
/// in the meantime.
pub async fn set_student_active(
    db: &DatabaseConnection,
    student_id: i64,
    active: bool,
) -> Result<student::Model> {
    let current = require_student(db, student_id).await?;
    if active && !current.active {
        ensure_registration_no_available(db, &current.registration_no, Some(student_id)).await?;
    }
    let mut student: student::ActiveModel = current.into();
    student.active = Set(active);
    student.update(db).await.map_err(Into::into)
}

/// Permanently deletes a student together with its employee links.
pub async fn delete_student(db: &DatabaseConnection, student_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    require_student(&txn, student_id).await?;

    StudentEmployee::delete_many()
        .filter(student_employee::Column::StudentId.eq(student_id))
        .exec(&txn)
        .await?;
    Student::delete_by_id(student_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted student {}", student_id);
    Ok(())
}

/// Links an employee to a student. Linking twice is a no-op.
pub async fn assign_employee(
    db: &DatabaseConnection,
    student_id: i64,
    employee_id: i64,
) -> Result<()> {
    require_student(db, student_id).await?;
    Employee::find_by_id(employee_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Employee",
            id: employee_id,
        })?;

    let existing = StudentEmployee::find_by_id((student_id, employee_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    student_employee::ActiveModel {
        student_id: Set(student_id),
        employee_id: Set(employee_id),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Removes the link between a student and an employee, if any.
pub async fn unassign_employee(
    db: &DatabaseConnection,
    student_id: i64,
    employee_id: i64,
) -> Result<()> {
    StudentEmployee::delete_by_id((student_id, employee_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Lists the employees linked to a student, ordered by name.
pub async fn get_student_employees(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<employee::Model>> {
    let student = require_student(db, student_id).await?;
    student
        .find_related(Employee)
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
