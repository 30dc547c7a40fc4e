//! Audio moderation: on-demand callbacks and live audio streams.

use serde::Deserialize;

use crate::client::{Endpoint, SignedRequestClient};
use crate::params::RequestParams;
use crate::response::{ApiResponse, null_as_default};
use crate::Result;

pub const AUDIO_CALLBACK_RESULTS: Endpoint = Endpoint::new("/v4/audio/callback/results", "v4");
pub const LIVE_AUDIO_QUERY_TASK: Endpoint = Endpoint::new("/v1/liveaudio/query/task", "v1.0");
pub const LIVE_AUDIO_CALLBACK_RESULTS: Endpoint =
    Endpoint::new("/v4/liveaudio/callback/results", "v4");

/// `antispam.status` value of a finished check.
pub const CHECK_STATUS_SUCCESS: i64 = 2;
/// `asrStatus` value of a failed transcription.
pub const ASR_STATUS_FAILED: i64 = 4;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioLabel {
    pub label: i64,
    pub level: i64,
    #[serde(default)]
    pub sub_labels: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSegment {
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub labels: Vec<AudioLabel>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAntispam {
    pub task_id: String,
    pub status: i64,
    #[serde(default)]
    pub data_id: Option<String>,
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default)]
    pub suggestion: Option<i64>,
    #[serde(default)]
    pub result_type: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub segments: Vec<AudioSegment>,
}

impl AudioAntispam {
    pub fn is_finished(&self) -> bool {
        self.status == CHECK_STATUS_SUCCESS
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpan {
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetail {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub segments: Vec<TimeSpan>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioLanguage {
    pub task_id: String,
    #[serde(default)]
    pub data_id: Option<String>,
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<LanguageDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsrDetail {
    pub start_time: i64,
    pub end_time: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAsr {
    pub task_id: String,
    #[serde(default)]
    pub data_id: Option<String>,
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<AsrDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDetail {
    #[serde(default)]
    pub main_gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioVoice {
    pub task_id: String,
    #[serde(default)]
    pub data_id: Option<String>,
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default)]
    pub detail: Option<VoiceDetail>,
}

/// One callback entry; each detection family is present only when enabled
/// for the business.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioCallbackResult {
    #[serde(default)]
    pub antispam: Option<AudioAntispam>,
    #[serde(default)]
    pub language: Option<AudioLanguage>,
    #[serde(default)]
    pub asr: Option<AudioAsr>,
    #[serde(default)]
    pub voice: Option<AudioVoice>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioSection<'a> {
    Antispam(&'a AudioAntispam),
    Language(&'a AudioLanguage),
    Asr(&'a AudioAsr),
    Voice(&'a AudioVoice),
}

impl AudioCallbackResult {
    pub fn sections(&self) -> Vec<AudioSection<'_>> {
        let mut out = Vec::new();
        if let Some(antispam) = &self.antispam {
            out.push(AudioSection::Antispam(antispam));
        }
        if let Some(language) = &self.language {
            out.push(AudioSection::Language(language));
        }
        if let Some(asr) = &self.asr {
            out.push(AudioSection::Asr(asr));
        }
        if let Some(voice) = &self.voice {
            out.push(AudioSection::Voice(voice));
        }
        out
    }
}

/// Machine verdict on a live audio slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveAudioAction {
    Pass,
    Suspect,
    Reject,
    Other(i64),
}

impl From<i64> for LiveAudioAction {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Pass,
            1 => Self::Suspect,
            2 => Self::Reject,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveAudioTaskQuery {
    pub task_id: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl LiveAudioTaskQuery {
    fn into_params(self) -> RequestParams {
        RequestParams::new()
            .with("taskId", self.task_id)
            .with("startTime", self.start_time)
            .with("endTime", self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAudioTaskResult {
    pub task_id: String,
    #[serde(default)]
    pub asr_status: Option<i64>,
    pub action: i64,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub segments: Vec<serde_json::Value>,
}

impl LiveAudioTaskResult {
    pub fn action(&self) -> LiveAudioAction {
        self.action.into()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAudioAntispam {
    pub task_id: String,
    pub status: i64,
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default)]
    pub data_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineEvidence {
    pub asr_status: i64,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub asr_result: Option<i64>,
    #[serde(default)]
    pub action: Option<i64>,
    #[serde(default)]
    pub segments: Vec<serde_json::Value>,
}

impl MachineEvidence {
    pub fn asr_failed(&self) -> bool {
        self.asr_status == ASR_STATUS_FAILED
    }

    /// `None` when transcription failed and no verdict was produced.
    pub fn action(&self) -> Option<LiveAudioAction> {
        if self.asr_failed() {
            return None;
        }
        self.action.map(LiveAudioAction::from)
    }
}

/// Human reviewer action on a live stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Warn,
    CutOff,
    Prompt,
    Other(i64),
}

impl From<i64> for ReviewAction {
    fn from(code: i64) -> Self {
        match code {
            2 => Self::Warn,
            3 => Self::CutOff,
            4 => Self::Prompt,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvidence {
    pub action: i64,
    #[serde(default)]
    pub action_time: Option<i64>,
    #[serde(default)]
    pub spam_type: Option<i64>,
    #[serde(default)]
    pub spam_detail: Option<String>,
    #[serde(default)]
    pub warn_count: Option<i64>,
    #[serde(default)]
    pub promp_count: Option<i64>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub segments: Vec<serde_json::Value>,
}

impl ReviewEvidence {
    pub fn action(&self) -> ReviewAction {
        self.action.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveAudioEvidence<'a> {
    Machine(&'a MachineEvidence),
    Human(&'a ReviewEvidence),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAudioAsr {
    pub task_id: String,
    pub start_time: i64,
    pub end_time: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveAudioCallbackResult {
    #[serde(default)]
    pub antispam: Option<LiveAudioAntispam>,
    #[serde(default)]
    pub evidences: Option<MachineEvidence>,
    #[serde(default)]
    pub review_evidences: Option<ReviewEvidence>,
    #[serde(default)]
    pub asr: Option<LiveAudioAsr>,
}

impl LiveAudioCallbackResult {
    /// Machine evidence wins when both are present.
    pub fn evidence(&self) -> Option<LiveAudioEvidence<'_>> {
        if let Some(machine) = &self.evidences {
            return Some(LiveAudioEvidence::Machine(machine));
        }
        self.review_evidences.as_ref().map(LiveAudioEvidence::Human)
    }
}

impl SignedRequestClient {
    pub async fn audio_callback_results(&self) -> Result<ApiResponse<Vec<AudioCallbackResult>>> {
        self.call_typed(&AUDIO_CALLBACK_RESULTS, RequestParams::new())
            .await
    }

    /// Results of one live audio task within a time window (epoch ms).
    pub async fn live_audio_query_task(
        &self,
        query: LiveAudioTaskQuery,
    ) -> Result<ApiResponse<Vec<LiveAudioTaskResult>>> {
        self.call_typed(&LIVE_AUDIO_QUERY_TASK, query.into_params())
            .await
    }

    pub async fn live_audio_callback_results(
        &self,
    ) -> Result<ApiResponse<Vec<LiveAudioCallbackResult>>> {
        self.call_typed(&LIVE_AUDIO_CALLBACK_RESULTS, RequestParams::new())
            .await
    }
}
