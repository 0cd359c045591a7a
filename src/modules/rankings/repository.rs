use aula_core::AppError;
use aula_models::RankingRow;
use sqlx::PgPool;
use tracing::instrument;

use crate::db::db_error;

/// One row per student holding a non-withdrawn enrollment in the group, with
/// the grade aggregates over that group's evaluations.
const GROUP_AGGREGATE: &str = "SELECT s.id AS student_id, s.student_code, u.first_name, u.last_name,
        COALESCE(SUM(g.score * ev.weight), 0)::float8 AS weighted_sum,
        COALESCE(SUM(ev.weight) FILTER (WHERE g.id IS NOT NULL), 0)::float8 AS weight_total,
        COUNT(g.id) AS graded_evaluations
     FROM enrollments en
     JOIN students s ON s.id = en.student_id
     JOIN users u ON u.id = s.user_id
     LEFT JOIN evaluations ev ON ev.group_id = en.group_id
     LEFT JOIN grades g ON g.evaluation_id = ev.id AND g.student_id = s.id
     WHERE en.group_id = $1 AND en.status <> 'withdrawn'
     GROUP BY s.id, s.student_code, u.first_name, u.last_name";

#[derive(Clone, Debug)]
pub struct RankingRepository {
    db: PgPool,
}

impl RankingRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn group_aggregates(&self, group_id: i32) -> Result<Vec<RankingRow>, AppError> {
        sqlx::query_as::<_, RankingRow>(GROUP_AGGREGATE)
            .bind(group_id)
            .fetch_all(&self.db)
            .await
            .map_err(db_error("Failed to aggregate group grades"))
    }
}
