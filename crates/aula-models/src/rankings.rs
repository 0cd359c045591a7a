//! Group standings by weighted average.
//!
//! The weighted average of a student is `Σ(score · weight) / Σ(weight)` over
//! the evaluations of the group that have a grade for that student. Students
//! without any grade have an average of `0`. Positions use competition
//! ranking: tied averages share a position and the next position skips
//! accordingly (`1, 2, 2, 4`).

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Per-student aggregate as produced by the ranking query.
#[derive(Debug, Clone, FromRow)]
pub struct RankingRow {
    pub student_id: i32,
    pub student_code: String,
    pub first_name: String,
    pub last_name: String,
    pub weighted_sum: f64,
    pub weight_total: f64,
    pub graded_evaluations: i64,
}

impl RankingRow {
    pub fn average(&self) -> f64 {
        if self.weight_total > 0.0 {
            round2(self.weighted_sum / self.weight_total)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RankingEntry {
    pub position: usize,
    pub student_id: i32,
    pub student_code: String,
    pub first_name: String,
    pub last_name: String,
    /// Weighted average rounded to two decimals
    pub average: f64,
    pub graded_evaluations: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupRanking {
    pub group_id: i32,
    pub entries: Vec<RankingEntry>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Orders rows by average (descending) and assigns competition positions.
///
/// Ties are listed by last name, then first name, then student id.
pub fn rank(rows: Vec<RankingRow>) -> Vec<RankingEntry> {
    let mut scored: Vec<(f64, RankingRow)> = rows.into_iter().map(|r| (r.average(), r)).collect();

    scored.sort_by(|(a, ra), (b, rb)| {
        b.total_cmp(a)
            .then_with(|| ra.last_name.cmp(&rb.last_name))
            .then_with(|| ra.first_name.cmp(&rb.first_name))
            .then_with(|| ra.student_id.cmp(&rb.student_id))
    });

    let mut entries: Vec<RankingEntry> = Vec::with_capacity(scored.len());
    for (index, (average, row)) in scored.into_iter().enumerate() {
        let position = match entries.last() {
            Some(prev) if prev.average == average => prev.position,
            _ => index + 1,
        };
        entries.push(RankingEntry {
            position,
            student_id: row.student_id,
            student_code: row.student_code,
            first_name: row.first_name,
            last_name: row.last_name,
            average,
            graded_evaluations: row.graded_evaluations,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, last_name: &str, weighted_sum: f64, weight_total: f64) -> RankingRow {
        RankingRow {
            student_id: id,
            student_code: format!("S-{id:04}"),
            first_name: "Test".to_string(),
            last_name: last_name.to_string(),
            weighted_sum,
            weight_total,
            graded_evaluations: if weight_total > 0.0 { 1 } else { 0 },
        }
    }

    #[test]
    fn test_average_is_weighted() {
        // 90 on a 40% evaluation and 60 on a 60% evaluation
        let r = row(1, "A", 90.0 * 40.0 + 60.0 * 60.0, 100.0);
        assert_eq!(r.average(), 72.0);
    }

    #[test]
    fn test_average_without_grades_is_zero() {
        assert_eq!(row(1, "A", 0.0, 0.0).average(), 0.0);
    }

    #[test]
    fn test_competition_ranking_shares_positions() {
        let ranked = rank(vec![
            row(1, "Diaz", 7000.0, 100.0),
            row(2, "Alvarez", 9000.0, 100.0),
            row(3, "Castro", 8000.0, 100.0),
            row(4, "Bravo", 8000.0, 100.0),
        ]);

        let positions: Vec<(i32, usize)> =
            ranked.iter().map(|e| (e.student_id, e.position)).collect();
        assert_eq!(positions, vec![(2, 1), (4, 2), (3, 2), (1, 4)]);
    }

    #[test]
    fn test_empty_group() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_rounding_treats_near_equal_averages_as_tied() {
        let ranked = rank(vec![
            row(1, "A", 8533.333, 100.0),
            row(2, "B", 8533.334, 100.0),
        ]);
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[1].position, 1);
    }
}
