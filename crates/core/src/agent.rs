//! Agent (salaried staff member) model and input DTO.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{Amount, EntityId};

/// An agent record as returned by the payroll backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agent {
    pub id: EntityId,
    pub name: String,
    pub role: String,
    /// Monthly base salary.
    pub salary: Amount,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// DTO for creating or replacing an agent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AgentInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 80))]
    pub role: String,
    #[serde(with = "crate::money::lenient")]
    pub salary: Amount,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::validation::validate_input;

    #[test]
    fn input_accepts_string_salary() {
        let input: AgentInput = serde_json::from_value(json!({
            "name": "Amani",
            "role": "Teacher",
            "salary": "1500.00",
        }))
        .unwrap();
        assert_eq!(input.salary, Decimal::from(1500));
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn input_rejects_bad_email() {
        let input: AgentInput = serde_json::from_value(json!({
            "name": "Amani",
            "role": "Teacher",
            "salary": 1500,
            "email": "not-an-email",
        }))
        .unwrap();
        assert!(validate_input(&input).is_err());
    }

    #[test]
    fn input_rejects_negative_salary() {
        let result = serde_json::from_value::<AgentInput>(json!({
            "name": "Amani",
            "role": "Teacher",
            "salary": -1,
        }));
        assert!(result.is_err());
    }
}
