use aula_core::AppError;
use aula_models::evaluations::MAX_TOTAL_WEIGHT;
use aula_models::{CreateEvaluationDto, Evaluation, EvaluationFilterParams, UpdateEvaluationDto};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::db::db_error;

const EVALUATION_COLUMNS: &str =
    "id, group_id, name, description, weight, due_date, created_at, updated_at";

/// Float sums of decimal weights (e.g. `33.3 + 33.3 + 33.4`) land slightly off.
const WEIGHT_EPSILON: f64 = 1e-9;

pub(crate) fn weight_fits(allocated: f64, requested: f64) -> bool {
    allocated + requested <= MAX_TOTAL_WEIGHT + WEIGHT_EPSILON
}

/// Locks the group and checks that `requested` more weight fits, ignoring the
/// evaluation being replaced (`exclude`).
async fn check_weight_budget(
    tx: &mut Transaction<'_, Postgres>,
    group_id: i32,
    requested: f64,
    exclude: Option<i32>,
) -> Result<(), AppError> {
    let group: Option<i32> =
        sqlx::query_scalar("SELECT id FROM course_groups WHERE id = $1 FOR UPDATE")
            .bind(group_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("Failed to lock group"))?;

    if group.is_none() {
        return Err(AppError::not_found("Group not found"));
    }

    let allocated: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(weight), 0)::float8 FROM evaluations
         WHERE group_id = $1 AND ($2::int IS NULL OR id <> $2)",
    )
    .bind(group_id)
    .bind(exclude)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_error("Failed to sum evaluation weights"))?;

    if !weight_fits(allocated, requested) {
        return Err(AppError::conflict(format!(
            "Total evaluation weight of the group would exceed {} ({} already allocated)",
            MAX_TOTAL_WEIGHT, allocated
        )));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct EvaluationRepository {
    db: PgPool,
}

impl EvaluationRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        limit: i64,
        offset: i64,
        filters: &EvaluationFilterParams,
    ) -> Result<(Vec<Evaluation>, i64), AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM evaluations WHERE ($1::int IS NULL OR group_id = $1)",
        )
        .bind(filters.group_id)
        .fetch_one(&self.db)
        .await
        .map_err(db_error("Failed to count evaluations"))?;

        let evaluations = sqlx::query_as::<_, Evaluation>(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations
             WHERE ($1::int IS NULL OR group_id = $1)
             ORDER BY group_id, due_date NULLS LAST, id
             LIMIT $2 OFFSET $3"
        ))
        .bind(filters.group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("Failed to fetch evaluations"))?;

        Ok((evaluations, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Evaluation>, AppError> {
        sqlx::query_as::<_, Evaluation>(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("Failed to fetch evaluation"))
    }

    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: &CreateEvaluationDto) -> Result<Evaluation, AppError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        check_weight_budget(&mut tx, dto.group_id, dto.weight, None).await?;

        let evaluation = sqlx::query_as::<_, Evaluation>(&format!(
            "INSERT INTO evaluations (group_id, name, description, weight, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EVALUATION_COLUMNS}"
        ))
        .bind(dto.group_id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.weight)
        .bind(dto.due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create evaluation"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit evaluation"))?;

        Ok(evaluation)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(
        &self,
        id: i32,
        dto: &UpdateEvaluationDto,
    ) -> Result<Option<Evaluation>, AppError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        if let Some(weight) = dto.weight {
            let group_id: Option<i32> =
                sqlx::query_scalar("SELECT group_id FROM evaluations WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_error("Failed to fetch evaluation"))?;

            let Some(group_id) = group_id else {
                return Ok(None);
            };
            check_weight_budget(&mut tx, group_id, weight, Some(id)).await?;
        }

        let evaluation = sqlx::query_as::<_, Evaluation>(&format!(
            "UPDATE evaluations
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 weight = COALESCE($4, weight),
                 due_date = COALESCE($5, due_date),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {EVALUATION_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.weight)
        .bind(dto.due_date)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to update evaluation"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit evaluation"))?;

        Ok(evaluation)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM evaluations WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("Failed to delete evaluation"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_fits_up_to_the_cap() {
        assert!(weight_fits(0.0, 100.0));
        assert!(weight_fits(60.0, 40.0));
        assert!(!weight_fits(60.0, 40.5));
    }

    #[test]
    fn test_weight_fits_tolerates_float_noise() {
        assert!(weight_fits(33.3 + 33.3, 33.4));
    }
}
