//! Course groups: a section of a course taught in a given period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Group {
    pub id: i32,
    pub course_id: i32,
    /// User id of the teacher in charge, if assigned
    pub teacher_id: Option<i32>,
    pub name: String,
    /// Academic period, e.g. `2025-1`
    pub period: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupDto {
    pub course_id: i32,
    pub teacher_id: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub period: String,
    #[validate(range(min = 1, message = "capacity must be greater than 0"))]
    pub capacity: i32,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGroupDto {
    pub teacher_id: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub period: Option<String>,
    #[validate(range(min = 1, message = "capacity must be greater than 0"))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupFilterParams {
    pub course_id: Option<i32>,
    pub teacher_id: Option<i32>,
    pub period: Option<String>,
}
