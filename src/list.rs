//! Allow/deny list paging.

use serde::Deserialize;

use crate::client::{Endpoint, SignedRequestClient};
use crate::params::RequestParams;
use crate::response::{ApiResponse, null_as_default};
use crate::Result;

/// Also served from [`YUN_API_HOST`](crate::config::YUN_API_HOST).
pub const LIST_PAGE_QUERY: Endpoint = Endpoint::new("/v2/list/pageQuery", "v2");

#[derive(Debug, Clone, PartialEq)]
pub struct ListPageQuery {
    pub page_num: u32,
    pub page_size: u32,
    pub start_time: i64,
    pub end_time: i64,
    pub list_type: i64,
    pub entity_type: i64,
}

impl ListPageQuery {
    fn into_params(self) -> RequestParams {
        RequestParams::new()
            .with("pageNum", self.page_num)
            .with("pageSize", self.page_size)
            .with("startTime", self.start_time)
            .with("endTime", self.end_time)
            .with("listType", self.list_type)
            .with("entityType", self.entity_type)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRow {
    pub list_type: i64,
    pub entity_type: i64,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub target_id: Option<i64>,
    pub entity: String,
    #[serde(default)]
    pub release_time: Option<i64>,
    #[serde(default)]
    pub source: Option<i64>,
    #[serde(default)]
    pub spam_type: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<ListRow>,
}

impl SignedRequestClient {
    pub async fn list_page_query(&self, query: ListPageQuery) -> Result<ApiResponse<ListPage>> {
        self.call_typed(&LIST_PAGE_QUERY, query.into_params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_null_rows_decode_as_empty() -> Result<()> {
        let page: ListPage = serde_json::from_str(r#"{"count":0}"#)?;
        assert!(page.rows.is_empty());
        let page: ListPage = serde_json::from_str(r#"{"count":0,"rows":null}"#)?;
        assert!(page.rows.is_empty());
        Ok(())
    }

    #[test]
    fn decodes_rows() -> Result<()> {
        let page: ListPage = serde_json::from_str(
            r#"{"count":1,"rows":[{"listType":2,"entityType":1,"productId":7,"targetId":8,
                "entity":"spam.example","releaseTime":1598961727666,"source":1,"spamType":100}]}"#,
        )?;
        assert_eq!(page.count, 1);
        assert_eq!(page.rows[0].entity, "spam.example");
        assert_eq!(page.rows[0].spam_type, Some(100));
        Ok(())
    }

    #[test]
    fn query_params_are_numeric() {
        let params = ListPageQuery {
            page_num: 1,
            page_size: 20,
            start_time: 1598951727666,
            end_time: 1598961727666,
            list_type: 2,
            entity_type: 1,
        }
        .into_params();
        assert_eq!(params.len(), 6);
        assert_eq!(
            params.get("startTime").map(ToString::to_string).as_deref(),
            Some("1598951727666")
        );
    }
}
