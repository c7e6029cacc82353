use crate::config::UpstreamConfig;
use crate::errors::ApiError;
use crate::models::{CreateRoutineRequest, CreateRoutineResponse, ScheduleRequest, ScheduleResponse};
use crate::submission::{CreateOutcome, RoutineApi, ScheduleOutcome};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

const CREATE_PATH: &str = "/IA/manual/guardar/";
const SCHEDULE_PATH: &str = "/IA/calendario/manual/registrar/";

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    csrf_token: String,
    session_cookie: Option<String>,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            csrf_token: config.csrf_token.clone(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self
            .http
            .post(format!("{}{path}", self.base_url))
            .header("X-CSRFToken", &self.csrf_token);

        match &self.session_cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        }
    }
}

impl RoutineApi for UpstreamClient {
    async fn create_routine(&self, request: &CreateRoutineRequest) -> Result<CreateOutcome, ApiError> {
        let response = self.post(CREATE_PATH).json(request).send().await?;
        let body: CreateRoutineResponse = decode(response).await?;
        Ok(narrow_create(body))
    }

    async fn schedule_routine(&self, request: &ScheduleRequest) -> Result<ScheduleOutcome, ApiError> {
        let response = self.post(SCHEDULE_PATH).json(request).send().await?;
        let body: ScheduleResponse = decode(response).await?;
        Ok(narrow_schedule(body))
    }
}

// Business errors arrive as `{success: false, error}` with 4xx/5xx codes.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    debug!(%status, len = bytes.len(), "upstream response");

    serde_json::from_slice(&bytes).map_err(|err| {
        if status.is_success() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Status(status.as_u16())
        }
    })
}

pub fn narrow_create(body: CreateRoutineResponse) -> CreateOutcome {
    match (body.success, body.rutina_id) {
        (true, Some(id)) => CreateOutcome::Created(id),
        (true, None) => CreateOutcome::Rejected("La respuesta no incluye la rutina creada.".to_string()),
        (false, _) => CreateOutcome::Rejected(body.error.unwrap_or_default()),
    }
}

pub fn narrow_schedule(body: ScheduleResponse) -> ScheduleOutcome {
    let text = body.message.or(body.error).unwrap_or_default();
    if body.success {
        ScheduleOutcome::Scheduled(text)
    } else {
        ScheduleOutcome::Failed(text)
    }
}
