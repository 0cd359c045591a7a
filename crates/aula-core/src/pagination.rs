//! Pagination for list endpoints.
//!
//! List endpoints accept `limit` together with either `page` (1-indexed) or
//! `offset`. When `page` is present it wins over `offset`. Query strings often
//! carry empty values (`?limit=&page=2`), which are treated as absent.
//!
//! ```ignore
//! use aula_core::pagination::PaginationParams;
//!
//! async fn list_courses(Query(params): Query<PaginationParams>) -> Result<_, AppError> {
//!     let (courses, total) = repo.find_all(params.limit(), params.offset()).await?;
//!     Ok(Json(ApiResponse::paginated(courses, params.meta(total))))
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata returned next to a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Limit that was applied
    pub limit: i64,
    /// Number of items skipped
    pub offset: i64,
    /// Current page, when page-based pagination was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Number of pages at the applied limit
    pub total_pages: i64,
    /// Whether more items follow this page
    pub has_more: bool,
}

/// Query parameters for pagination.
///
/// `limit` is clamped to `[1, 100]`, `offset` to a minimum of 0 and `page` to
/// a minimum of 1.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (ignored when `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number, 1-indexed
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page() {
            Some(page) => (page - 1).saturating_mul(self.limit()),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }

    /// Builds the response metadata for a result set of `total` items.
    #[must_use]
    pub fn meta(&self, total: i64) -> PaginationMeta {
        let limit = self.limit();
        let offset = self.offset();
        let total = total.max(0);

        PaginationMeta {
            total,
            limit,
            offset,
            page: self.page(),
            total_pages: total.saturating_add(limit - 1) / limit,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.page(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-3), None, None).limit(), 1);
        assert_eq!(params(Some(150), None, None).limit(), 100);
        assert_eq!(params(Some(25), None, None).limit(), 25);
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let params = params(Some(20), Some(7), Some(3));
        assert_eq!(params.offset(), 40);
        assert_eq!(params.page(), Some(3));
    }

    #[test]
    fn test_negative_offset_and_page() {
        assert_eq!(params(Some(10), Some(-5), None).offset(), 0);
        assert_eq!(params(Some(10), None, Some(-2)).offset(), 0);
    }

    #[test]
    fn test_meta_computation() {
        let meta = params(Some(10), None, Some(2)).meta(35);
        assert_eq!(meta.total, 35);
        assert_eq!(meta.offset, 10);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_more);

        let last = params(Some(10), None, Some(4)).meta(35);
        assert!(!last.has_more);

        let empty = PaginationParams::default().meta(0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_more);
    }

    #[test]
    fn test_extreme_page_and_offset_saturate() {
        let far_page = params(Some(10), None, Some(i64::MAX));
        assert_eq!(far_page.offset(), i64::MAX);
        assert!(!far_page.meta(5).has_more);

        let far_offset = params(None, Some(i64::MAX), None).meta(5);
        assert_eq!(far_offset.offset, i64::MAX);
        assert!(!far_offset.has_more);

        let huge_total = params(Some(100), None, None).meta(i64::MAX);
        assert_eq!(huge_total.total_pages, i64::MAX / 100);
        assert!(huge_total.has_more);
    }

    #[test]
    fn test_deserialize_empty_strings_as_absent() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"limit":"","offset":"","page":""}"#).unwrap();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_deserialize_string_numbers() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"limit":"25","page":"2"}"#).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 25);
    }

    #[test]
    fn test_page_meta_serialization_skips_missing_page() {
        let meta = params(Some(5), Some(5), None).meta(12);
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("page").is_none());
        assert_eq!(json["offset"], 5);
        assert_eq!(json["total_pages"], 3);
    }
}
