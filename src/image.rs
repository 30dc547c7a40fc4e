//! Image moderation: offline task lookup and callback polling.

use serde::Deserialize;

use crate::client::{Endpoint, SignedRequestClient};
use crate::params::RequestParams;
use crate::response::ApiResponse;
use crate::Result;

pub const IMAGE_QUERY_TASK: Endpoint = Endpoint::new("/v1/image/query/task", "v1");
/// Also served from [`CALLBACK_API_HOST`](crate::config::CALLBACK_API_HOST);
/// use [`Endpoint::on_host`] for accounts still on that host.
pub const IMAGE_CALLBACK_RESULTS: Endpoint = Endpoint::new("/v2/image/callback/results", "v2");

/// Severity attached to a label hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LabelLevel {
    Normal,
    Suspect,
    Definite,
}

impl LabelLevel {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            1 => Some(Self::Suspect),
            2 => Some(Self::Definite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLabel {
    pub label: i64,
    pub level: i64,
    #[serde(default)]
    pub rate: f64,
}

impl ImageLabel {
    pub fn level(&self) -> Option<LabelLevel> {
        LabelLevel::from_code(self.level)
    }
}

/// Highest recognized level among `labels`.
pub fn max_level(labels: &[ImageLabel]) -> Option<LabelLevel> {
    labels.iter().filter_map(ImageLabel::level).max()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTaskResult {
    pub task_id: String,
    pub status: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Vec<ImageLabel>,
}

impl ImageTaskResult {
    pub fn max_level(&self) -> Option<LabelLevel> {
        max_level(&self.labels)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCallbackResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<ImageLabel>,
}

impl ImageCallbackResult {
    pub fn max_level(&self) -> Option<LabelLevel> {
        max_level(&self.labels)
    }
}

impl SignedRequestClient {
    /// Looks up finished image checks by task id.
    pub async fn image_query_tasks<S: AsRef<str>>(
        &self,
        task_ids: &[S],
    ) -> Result<ApiResponse<Vec<ImageTaskResult>>> {
        let ids: Vec<&str> = task_ids.iter().map(AsRef::as_ref).collect();
        let params = RequestParams::new().with("taskIds", ids);
        self.call_typed(&IMAGE_QUERY_TASK, params).await
    }

    /// Drains pending image check results.
    pub async fn image_callback_results(&self) -> Result<ApiResponse<Vec<ImageCallbackResult>>> {
        self.call_typed(&IMAGE_CALLBACK_RESULTS, RequestParams::new())
            .await
    }
}
