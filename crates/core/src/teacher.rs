//! Teacher records used for payslip generation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Teacher {
    pub id: EntityId,
    /// Unique registration number issued by the payroll administration.
    pub registration_number: String,
    pub last_name: String,
    pub first_name: String,
    pub grade_id: EntityId,
    pub establishment_id: EntityId,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TeacherInput {
    #[validate(length(min = 1, max = 40))]
    pub registration_number: String,
    #[validate(length(min = 1, max = 80))]
    pub last_name: String,
    #[validate(length(min = 1, max = 80))]
    pub first_name: String,
    pub grade_id: EntityId,
    pub establishment_id: EntityId,
    #[serde(default)]
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

/// Partial update; only supplied fields are forwarded.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TeacherUpdate {
    #[validate(length(min = 1, max = 80))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub first_name: Option<String>,
    pub grade_id: Option<EntityId>,
    pub establishment_id: Option<EntityId>,
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

impl TeacherUpdate {
    pub fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.grade_id.is_none()
            && self.establishment_id.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }
}
