use axum::{Router, routing::get};

use super::controller::{
    create_student, delete_student, get_student, list_student_attendance,
    list_student_enrollments, list_student_grades, list_students, update_student,
};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/{id}/enrollments", get(list_student_enrollments))
        .route("/{id}/grades", get(list_student_grades))
        .route("/{id}/attendance", get(list_student_attendance))
}
