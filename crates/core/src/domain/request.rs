// Student Request Domain Model

use super::error::{DomainError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_STUDENT_ID_LEN: usize = 15;
pub const MAX_STUDENT_NAME_LEN: usize = 255;
pub const MAX_PROBLEM_LEN: usize = 1000;

/// A request submitted by a student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    /// Student id (primary key of the queue table)
    pub id: String,
    pub name: String,
    /// Description of the problem
    pub problem: String,
}

impl NewRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            problem: problem.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_field("id", &self.id, MAX_STUDENT_ID_LEN)?;
        check_field("name", &self.name, MAX_STUDENT_NAME_LEN)?;
        check_field("problem", &self.problem, MAX_PROBLEM_LEN)
    }
}

fn check_field(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    if value.chars().count() > max {
        return Err(DomainError::FieldTooLong { field, max });
    }
    Ok(())
}

/// A stored row of a queue table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRequest {
    pub student_id: String,
    pub name: String,
    pub description: String,
    pub timestamp: i64, // epoch ms
}

impl StudentRequest {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(NewRequest::new("111111", "Michael", "Just testing")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let err = NewRequest::new("", "X", "Y").validate().unwrap_err();
        assert_eq!(err, DomainError::MissingField("id"));

        let err = NewRequest::new("1", "  ", "Y").validate().unwrap_err();
        assert_eq!(err, DomainError::MissingField("name"));

        let err = NewRequest::new("1", "X", "").validate().unwrap_err();
        assert_eq!(err, DomainError::MissingField("problem"));
    }

    #[test]
    fn test_student_id_too_long() {
        let err = NewRequest::new("1234567890123456", "X", "Y")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::FieldTooLong {
                field: "id",
                max: MAX_STUDENT_ID_LEN
            }
        );
    }

    #[test]
    fn test_created_at() {
        let req = StudentRequest {
            student_id: "1".into(),
            name: "X".into(),
            description: "Y".into(),
            timestamp: 1_457_395_200_000,
        };
        assert_eq!(req.created_at().unwrap().timestamp(), 1_457_395_200);
    }
}
