//! Weighted evaluations of a course group.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Upper bound for the summed weight of a group's evaluations.
pub const MAX_TOTAL_WEIGHT: f64 = 100.0;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Evaluation {
    pub id: i32,
    pub group_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Percentage of the final grade, in (0, 100]
    pub weight: f64,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvaluationDto {
    pub group_id: i32,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 100.0, message = "weight must be in (0, 100]"))]
    pub weight: f64,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEvaluationDto {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, max = 100.0, message = "weight must be in (0, 100]"))]
    pub weight: Option<f64>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EvaluationFilterParams {
    pub group_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(weight: f64) -> CreateEvaluationDto {
        CreateEvaluationDto {
            group_id: 1,
            name: "Midterm".to_string(),
            description: None,
            weight,
            due_date: None,
        }
    }

    #[test]
    fn test_weight_bounds() {
        assert!(dto(0.0).validate().is_err());
        assert!(dto(-5.0).validate().is_err());
        assert!(dto(100.5).validate().is_err());
        assert!(dto(0.5).validate().is_ok());
        assert!(dto(100.0).validate().is_ok());
    }
}
