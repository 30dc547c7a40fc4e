//! Website crawl jobs.

use serde::Deserialize;

use crate::client::{Endpoint, SignedRequestClient};
use crate::params::RequestParams;
use crate::response::ApiResponse;
use crate::Result;

pub const CRAWLER_JOB_SUBMIT: Endpoint =
    Endpoint::new("/v1/crawler/job/submit", "v1.0").without_business_id();

/// A crawl job definition. `site_url` must be publicly reachable and start
/// with `http`.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlerJob {
    pub site_url: String,
    pub kind: i64,
    pub frequency: i64,
    pub level: i64,
    pub max_resource_amount: i64,
    /// Additional documented fields passed through verbatim.
    pub extra: RequestParams,
}

impl CrawlerJob {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            kind: 1,
            frequency: 100,
            level: 1,
            max_resource_amount: 1,
            extra: RequestParams::new(),
        }
    }

    fn into_params(self) -> RequestParams {
        let mut params = self.extra;
        params.insert("siteUrl", self.site_url);
        params.insert("type", self.kind);
        params.insert("frequency", self.frequency);
        params.insert("level", self.level);
        params.insert("maxResourceAmount", self.max_resource_amount);
        params
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerJobReceipt {
    pub job_id: i64,
    #[serde(default)]
    pub data_id: Option<String>,
}

impl SignedRequestClient {
    pub async fn submit_crawler_job(
        &self,
        job: CrawlerJob,
    ) -> Result<ApiResponse<CrawlerJobReceipt>> {
        self.call_typed(&CRAWLER_JOB_SUBMIT, job.into_params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn job_fields_override_extra() {
        let mut job = CrawlerJob::new("http://xxx.com");
        job.extra.insert("type", 9);
        job.extra.insert("callback", "cb");
        let params = job.into_params();
        assert_eq!(params.get("type"), Some(&ParamValue::Int(1)));
        assert_eq!(params.get("callback"), Some(&ParamValue::from("cb")));
        assert_eq!(params.get("siteUrl"), Some(&ParamValue::from("http://xxx.com")));
    }

    #[test]
    fn submit_endpoint_skips_business_id() {
        assert!(!CRAWLER_JOB_SUBMIT.requires_business_id);
    }

    #[test]
    fn decodes_receipt() -> Result<()> {
        let receipt: CrawlerJobReceipt = serde_json::from_str(r#"{"jobId":42,"dataId":"d"}"#)?;
        assert_eq!(receipt.job_id, 42);
        assert_eq!(receipt.data_id.as_deref(), Some("d"));
        Ok(())
    }
}
