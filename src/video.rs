//! Video moderation: live stream screenshots and on-demand callbacks.

use serde::Deserialize;

use crate::client::{Endpoint, SignedRequestClient};
use crate::params::RequestParams;
use crate::response::ApiResponse;
use crate::Result;

pub const LIVE_VIDEO_QUERY_IMAGE: Endpoint = Endpoint::new("/v1/livevideo/query/image", "v1");
/// Also served from [`CALLBACK_API_HOST`](crate::config::CALLBACK_API_HOST);
/// use [`Endpoint::on_host`] for accounts still on that host.
pub const VIDEO_CALLBACK_RESULTS: Endpoint = Endpoint::new("/v3/video/callback/results", "v3");

/// Outcome of a screenshot lookup for a live task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveImageQueryStatus {
    Ok,
    /// Task is older than the seven-day retention window.
    Expired,
    NotFound,
    Other(i64),
}

impl From<i64> for LiveImageQueryStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Ok,
            20 => Self::Expired,
            30 => Self::NotFound,
            other => Self::Other(other),
        }
    }
}

/// Paging and filter options for live screenshot lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveImageQuery {
    pub task_id: String,
    pub levels: Vec<i64>,
    pub page_num: u32,
    pub page_size: u32,
    pub callback_status: Option<i64>,
    pub order_type: Option<i64>,
}

impl LiveImageQuery {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            levels: vec![0, 1, 2],
            page_num: 1,
            page_size: 20,
            callback_status: None,
            order_type: None,
        }
    }

    pub(crate) fn into_params(self) -> RequestParams {
        RequestParams::new()
            .with("taskId", self.task_id)
            .with("levels", self.levels)
            .with("pageNum", self.page_num)
            .with("pageSize", self.page_size)
            .with_opt("callbackStatus", self.callback_status)
            .with_opt("orderType", self.order_type)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveImageRow {
    pub url: String,
    pub label: i64,
    pub label_level: i64,
    #[serde(default)]
    pub callback_status: Option<i64>,
    pub begin_time: i64,
    pub end_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveImagePage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub rows: Vec<LiveImageRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveImageQueryResult {
    pub status: i64,
    /// Only populated when `status` is 0.
    #[serde(default)]
    pub images: Option<LiveImagePage>,
}

impl LiveImageQueryResult {
    pub fn status(&self) -> LiveImageQueryStatus {
        self.status.into()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCallbackResult {
    pub status: i64,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub evidences: Vec<serde_json::Value>,
}

impl VideoCallbackResult {
    /// Non-zero `status` means the video itself could not be processed.
    pub fn is_processed(&self) -> bool {
        self.status == 0
    }

    pub fn is_normal(&self) -> bool {
        self.is_processed() && self.level.unwrap_or(0) == 0
    }
}

impl SignedRequestClient {
    pub async fn live_video_query_images(
        &self,
        query: LiveImageQuery,
    ) -> Result<ApiResponse<LiveImageQueryResult>> {
        self.call_typed(&LIVE_VIDEO_QUERY_IMAGE, query.into_params())
            .await
    }

    pub async fn video_callback_results(&self) -> Result<ApiResponse<Vec<VideoCallbackResult>>> {
        self.call_typed(&VIDEO_CALLBACK_RESULTS, RequestParams::new())
            .await
    }
}
