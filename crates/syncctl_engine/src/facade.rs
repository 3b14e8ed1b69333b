use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use syncctl_core::{CommandAck, FileRecord, JobCommand, JobStatusSnapshot, Page, RecordId};
use url::Url;

use crate::wire::{error_message, CommandBody, PageBody, StatusBody};
use crate::{ControllerSettings, FacadeError};

/// Request/response interface of the remote sync job.
#[async_trait::async_trait]
pub trait JobFacade: Send + Sync {
    async fn get_status(&self) -> Result<JobStatusSnapshot, FacadeError>;

    async fn send_command(&self, command: JobCommand) -> Result<CommandAck, FacadeError>;

    async fn list_pending(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<FileRecord>, FacadeError>;

    async fn confirm_deletion(&self, id: RecordId) -> Result<(), FacadeError>;
}

/// `JobFacade` over the server's JSON API.
#[derive(Debug, Clone)]
pub struct HttpJobFacade {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpJobFacade {
    pub fn new(settings: &ControllerSettings) -> Result<Self, FacadeError> {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FacadeError::Network(err.to_string()))?;
        Ok(Self {
            http,
            base_url: normalize_base(&settings.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, FacadeError> {
        Ok(self.base_url.join(path)?)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, FacadeError> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(FacadeError::from_status(status.as_u16(), error_message(&body)))
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FacadeError> {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|err| FacadeError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobFacade for HttpJobFacade {
    async fn get_status(&self) -> Result<JobStatusSnapshot, FacadeError> {
        let url = self.endpoint("sync/status")?;
        let body: StatusBody = self.fetch_json(self.http.get(url)).await?;
        Ok(body.into())
    }

    async fn send_command(&self, command: JobCommand) -> Result<CommandAck, FacadeError> {
        let url = self.endpoint(&format!("sync/{}", command_path(command)))?;
        let body: CommandBody = self.fetch_json(self.http.post(url)).await?;
        Ok(body.into())
    }

    async fn list_pending(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<FileRecord>, FacadeError> {
        let mut url = self.endpoint("sync/pending")?;
        url.query_pairs_mut()
            .append_pair("page", &page_number.to_string())
            .append_pair("size", &page_size.to_string());
        let body: PageBody = self.fetch_json(self.http.get(url)).await?;
        Ok(body.into())
    }

    async fn confirm_deletion(&self, id: RecordId) -> Result<(), FacadeError> {
        let url = self.endpoint(&format!("sync/pending/{id}/confirm-deletion"))?;
        // Any 2xx counts; the body is not inspected.
        self.execute(self.http.post(url)).await.map(|_| ())
    }
}

fn command_path(command: JobCommand) -> &'static str {
    match command {
        JobCommand::Start => "start",
        JobCommand::Pause => "pause",
        JobCommand::Resume => "resume",
        JobCommand::Stop => "stop",
    }
}

/// Relative endpoints are joined onto the base, which therefore must end in `/`.
fn normalize_base(raw: &str) -> Result<Url, FacadeError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_without_trailing_slash_keeps_its_path() {
        let url = normalize_base("http://sync.local:9000/api").unwrap();
        assert_eq!(
            url.join("sync/status").unwrap().as_str(),
            "http://sync.local:9000/api/sync/status"
        );
    }

    #[test]
    fn invalid_base_is_reported() {
        assert!(matches!(
            normalize_base("not a url"),
            Err(FacadeError::InvalidUrl(_))
        ));
    }
}
