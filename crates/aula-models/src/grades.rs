//! Scores of students on evaluations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: i32,
    pub evaluation_id: i32,
    pub student_id: i32,
    pub score: f64,
    pub feedback: Option<String>,
    /// User who recorded the grade
    pub graded_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGradeDto {
    pub evaluation_id: i32,
    pub student_id: i32,
    #[validate(range(min = 0.0, max = 100.0, message = "score must be between 0 and 100"))]
    pub score: f64,
    #[validate(length(max = 1000))]
    pub feedback: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGradeDto {
    #[validate(range(min = 0.0, max = 100.0, message = "score must be between 0 and 100"))]
    pub score: Option<f64>,
    #[validate(length(max = 1000))]
    pub feedback: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GradeFilterParams {
    pub evaluation_id: Option<i32>,
    pub student_id: Option<i32>,
    pub group_id: Option<i32>,
}
