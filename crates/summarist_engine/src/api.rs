use std::path::Path;

use futures_util::stream::StreamExt;
use reqwest::multipart;
use reqwest::Url;

use crate::stream::EventStream;
use crate::types::{
    ApiError, EngineConfig, PaperId, PaperRecord, StreamError, SummaryRecord,
};

/// HTTP client for the summarization service.
///
/// Plain request/response calls go through a bounded-timeout client; the
/// processing stream uses a separate client with a connect timeout only,
/// since a session may legitimately stay open for minutes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    stream_http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &EngineConfig) -> Result<Self, ApiError> {
        // A base without a trailing slash would drop its last path
        // segment on join.
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        let stream_http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            stream_http,
            base,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base.join(path)
    }

    /// GET `/paper/get_all_papers`.
    pub async fn list_papers(&self) -> Result<Vec<PaperRecord>, ApiError> {
        let url = self.endpoint("paper/get_all_papers")?;
        let response = check_status(self.http.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    /// POST `/paper/upload` with the file as a multipart `file` field.
    ///
    /// Only PDFs are accepted; the check happens before the request so no
    /// partial paper is ever registered for an unsupported file.
    pub async fn upload_paper(&self, path: &Path) -> Result<PaperRecord, ApiError> {
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(ApiError::NotPdf(path.display().to_string()));
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::FileRead {
            path: path.display().to_string(),
            source,
        })?;

        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let url = self.endpoint("paper/upload")?;
        let response = check_status(self.http.post(url).multipart(form).send().await?)?;
        Ok(response.json().await?)
    }

    /// GET `/summary/paper/{id}`, the stored-summary snapshot.
    pub async fn fetch_summaries(&self, paper_id: PaperId) -> Result<Vec<SummaryRecord>, ApiError> {
        let url = self.endpoint(&format!("summary/paper/{paper_id}"))?;
        let response = check_status(self.http.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    /// GET `/paper/{id}/process`, returning the live event stream.
    ///
    /// Fails before yielding any event when the endpoint does not answer
    /// with a success status.
    pub async fn open_processing_stream(
        &self,
        paper_id: PaperId,
    ) -> Result<EventStream, StreamError> {
        let url = self.endpoint(&format!("paper/{paper_id}/process"))?;
        let response = self
            .stream_http
            .get(url)
            .send()
            .await
            .map_err(StreamError::Open)?;
        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::OpenStatus(status));
        }
        Ok(EventStream::new(response.bytes_stream().boxed()))
    }

    /// URL for viewing the original document at a given page. Opened
    /// out-of-band by a viewer; never fetched here.
    pub fn view_url(&self, paper_id: PaperId, page: i64) -> String {
        format!("{}paper/{paper_id}/view#page={page}", self.base)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status))
    }
}
