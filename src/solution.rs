//! Media solution callbacks and live-wall screenshots. Neither endpoint
//! sends `businessId`.

use serde::Deserialize;

use crate::client::{Endpoint, SignedRequestClient};
use crate::params::RequestParams;
use crate::response::ApiResponse;
use crate::video::{LiveImageQuery, LiveImageQueryResult};
use crate::Result;

pub const MEDIA_SOLUTION_CALLBACK_RESULTS: Endpoint =
    Endpoint::new("/v2/mediasolution/callback/results", "v2").without_business_id();
/// Also served from [`YUN_API_HOST`](crate::config::YUN_API_HOST).
pub const LIVE_WALL_SOLUTION_QUERY_IMAGE: Endpoint =
    Endpoint::new("/v1/livewallsolution/query/image", "v1.0").without_business_id();

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemVerdict {
    pub data_id: String,
    #[serde(default)]
    pub suggestion: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
}

/// Per-media evidence lists; the service fills the ones present in the
/// submitted bundle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEvidences {
    #[serde(default)]
    pub texts: Option<Vec<MediaItemVerdict>>,
    #[serde(default)]
    pub images: Option<Vec<MediaItemVerdict>>,
    #[serde(default)]
    pub audios: Option<Vec<MediaItemVerdict>>,
    #[serde(default)]
    pub audiovideos: Option<Vec<MediaItemVerdict>>,
    #[serde(default)]
    pub files: Option<Vec<MediaItemVerdict>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvidenceKind<'a> {
    Texts(&'a [MediaItemVerdict]),
    Images(&'a [MediaItemVerdict]),
    Audios(&'a [MediaItemVerdict]),
    AudioVideos(&'a [MediaItemVerdict]),
    Files(&'a [MediaItemVerdict]),
}

impl MediaEvidences {
    /// First present list, checked as texts, images, audios, audiovideos, files.
    pub fn kind(&self) -> Option<MediaEvidenceKind<'_>> {
        if let Some(items) = &self.texts {
            return Some(MediaEvidenceKind::Texts(items));
        }
        if let Some(items) = &self.images {
            return Some(MediaEvidenceKind::Images(items));
        }
        if let Some(items) = &self.audios {
            return Some(MediaEvidenceKind::Audios(items));
        }
        if let Some(items) = &self.audiovideos {
            return Some(MediaEvidenceKind::AudioVideos(items));
        }
        self.files.as_deref().map(MediaEvidenceKind::Files)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAntispam {
    pub task_id: String,
    #[serde(default)]
    pub data_id: Option<String>,
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default)]
    pub suggestion: Option<i64>,
    #[serde(default)]
    pub result_type: Option<i64>,
    #[serde(default)]
    pub check_status: Option<i64>,
    #[serde(default)]
    pub evidences: Option<MediaEvidences>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSolutionResult {
    #[serde(default)]
    pub antispam: Option<MediaAntispam>,
}

/// Screenshot lookup for a live-wall task; same paging as live video.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveWallImageQuery {
    pub inner: LiveImageQuery,
}

impl LiveWallImageQuery {
    pub fn new(task_id: impl Into<String>) -> Self {
        let mut inner = LiveImageQuery::new(task_id);
        inner.levels = vec![1, 2];
        inner.page_size = 10;
        Self { inner }
    }
}

impl SignedRequestClient {
    pub async fn media_solution_callback_results(
        &self,
    ) -> Result<ApiResponse<Vec<MediaSolutionResult>>> {
        self.call_typed(&MEDIA_SOLUTION_CALLBACK_RESULTS, RequestParams::new())
            .await
    }

    pub async fn live_wall_solution_query_images(
        &self,
        query: LiveWallImageQuery,
    ) -> Result<ApiResponse<LiveImageQueryResult>> {
        self.call_typed(&LIVE_WALL_SOLUTION_QUERY_IMAGE, query.inner.into_params())
            .await
    }
}
