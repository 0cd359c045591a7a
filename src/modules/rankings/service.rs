use std::sync::Arc;

use aula_core::AppError;
use aula_models::{GroupRanking, rank};
use tracing::instrument;

use super::repository::RankingRepository;
use crate::modules::groups::repository::GroupRepository;

#[derive(Debug)]
pub struct RankingService {
    repo: Arc<RankingRepository>,
    groups: Arc<GroupRepository>,
}

impl RankingService {
    pub fn new(repo: Arc<RankingRepository>, groups: Arc<GroupRepository>) -> Self {
        Self { repo, groups }
    }

    /// Standings of a group by weighted average, best first.
    #[instrument(skip(self))]
    pub async fn for_group(&self, group_id: i32) -> Result<GroupRanking, AppError> {
        if self.groups.find_by_id(group_id).await?.is_none() {
            return Err(AppError::not_found("Group not found"));
        }

        let rows = self.repo.group_aggregates(group_id).await?;
        Ok(GroupRanking {
            group_id,
            entries: rank(rows),
        })
    }
}
