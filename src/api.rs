// Transport layer: the calls the model layer needs from the TeamSupport XML API

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, TeamSupportError};
use crate::xml_request::{to_xml_body, Fields};
use crate::xml_response::Element;

pub const DEFAULT_BASE_URL: &str = "https://app.teamsupport.com/api/xml";

// Client configuration
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub org_id: String,
    pub api_token: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            org_id: String::new(),
            api_token: String::new(),
            timeout_ms: 30_000,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("org_id", &self.org_id)
            .field("api_token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(org_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            api_token: api_token.into(),
            ..Self::default()
        }
    }

    /// Read credentials from `TEAMSUPPORT_ORG_ID` and `TEAMSUPPORT_API_TOKEN`.
    /// `TEAMSUPPORT_BASE_URL` optionally overrides the API location.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let org_id = var("TEAMSUPPORT_ORG_ID")
            .ok_or_else(|| TeamSupportError::Config("TEAMSUPPORT_ORG_ID is not set".to_string()))?;
        let api_token = var("TEAMSUPPORT_API_TOKEN").ok_or_else(|| {
            TeamSupportError::Config("TEAMSUPPORT_API_TOKEN is not set".to_string())
        })?;

        let mut config = Self::new(org_id, api_token);
        if let Some(base_url) = var("TEAMSUPPORT_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.org_id.is_empty() || self.api_token.is_empty() {
            return Err(TeamSupportError::Config(
                "org_id and api_token are required".to_string(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(TeamSupportError::Config("base_url is empty".to_string()));
        }
        Ok(())
    }
}

// Remote operations consumed by the model layer. Collection calls return the
// wrapping element (`<Actions>`, `<Contacts>`, ...) with one child per item.
#[async_trait]
pub trait TeamSupportService: Send + Sync {
    async fn get_ticket(&self, ticket_id: &str) -> Result<Element>;
    async fn create_ticket(&self, data: &Fields) -> Result<Element>;
    async fn update_ticket(&self, ticket_id: &str, data: &Fields) -> Result<Element>;
    async fn delete_ticket(&self, ticket_id: &str) -> Result<()>;

    async fn get_ticket_actions(&self, ticket_id: &str, filter: &Fields) -> Result<Element>;
    async fn get_ticket_action(&self, ticket_id: &str, action_id: &str) -> Result<Element>;
    async fn update_ticket_action(
        &self,
        ticket_id: &str,
        action_id: &str,
        data: &Fields,
    ) -> Result<Element>;

    async fn get_ticket_contacts(&self, ticket_id: &str) -> Result<Element>;
    async fn get_ticket_customers(&self, ticket_id: &str) -> Result<Element>;

    async fn get_ticket_statuses(&self) -> Result<Element>;
    async fn get_ticket_types(&self) -> Result<Element>;

    async fn search_contacts(&self, filter: &Fields) -> Result<Element>;
    async fn get_contact(&self, contact_id: &str) -> Result<Element>;
    async fn create_contact(&self, data: &Fields) -> Result<Element>;
    async fn delete_contact(&self, contact_id: &str) -> Result<()>;

    async fn get_customer(&self, customer_id: &str) -> Result<Element>;
    async fn get_customer_contacts(&self, customer_id: &str) -> Result<Element>;
}

/// [`TeamSupportService`] over HTTP, authenticating with the organization ID
/// and API token.
pub struct HttpTeamSupportService {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpTeamSupportService {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Each identifier becomes exactly one percent-encoded path segment
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| TeamSupportError::Config(format!("invalid base_url: {}", e)))?;

        for segment in segments {
            if segment.is_empty() || *segment == "." || *segment == ".." {
                return Err(TeamSupportError::InvalidIdentifier(segment.to_string()));
            }
        }

        url.path_segments_mut()
            .map_err(|_| TeamSupportError::Config("base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<&Fields>,
        body: Option<String>,
    ) -> Result<Option<Element>> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        debug!(%method, path = %path, "TeamSupport request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .basic_auth(&self.config.org_id, Some(&self.config.api_token));
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/xml").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%method, path = %path, status = status.as_u16(), "TeamSupport request failed");
            return Err(TeamSupportError::ApiResponse {
                status_code: status.as_u16(),
                message: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        Element::parse(&text).map(Some)
    }

    async fn fetch(&self, segments: &[&str], query: Option<&Fields>) -> Result<Element> {
        let element = self.send(Method::GET, segments, query, None).await?;
        expect_body(segments, element)
    }

    async fn submit(
        &self,
        method: Method,
        segments: &[&str],
        root: &str,
        data: &Fields,
    ) -> Result<Element> {
        let body = to_xml_body(root, data)?;
        let element = self.send(method, segments, None, Some(body)).await?;
        expect_body(segments, element)
    }

    async fn remove(&self, segments: &[&str]) -> Result<()> {
        self.send(Method::DELETE, segments, None, None).await?;
        Ok(())
    }
}

fn expect_body(segments: &[&str], element: Option<Element>) -> Result<Element> {
    element.ok_or_else(|| {
        TeamSupportError::XmlParse(format!("empty response body from {}", segments.join("/")))
    })
}

#[async_trait]
impl TeamSupportService for HttpTeamSupportService {
    async fn get_ticket(&self, ticket_id: &str) -> Result<Element> {
        self.fetch(&["Tickets", ticket_id], None).await
    }

    async fn create_ticket(&self, data: &Fields) -> Result<Element> {
        self.submit(Method::POST, &["Tickets"], "Ticket", data).await
    }

    async fn update_ticket(&self, ticket_id: &str, data: &Fields) -> Result<Element> {
        self.submit(Method::PUT, &["Tickets", ticket_id], "Ticket", data)
            .await
    }

    async fn delete_ticket(&self, ticket_id: &str) -> Result<()> {
        self.remove(&["Tickets", ticket_id]).await
    }

    async fn get_ticket_actions(&self, ticket_id: &str, filter: &Fields) -> Result<Element> {
        self.fetch(&["Tickets", ticket_id, "Actions"], Some(filter))
            .await
    }

    async fn get_ticket_action(&self, ticket_id: &str, action_id: &str) -> Result<Element> {
        self.fetch(&["Tickets", ticket_id, "Actions", action_id], None)
            .await
    }

    async fn update_ticket_action(
        &self,
        ticket_id: &str,
        action_id: &str,
        data: &Fields,
    ) -> Result<Element> {
        self.submit(
            Method::PUT,
            &["Tickets", ticket_id, "Actions", action_id],
            "Action",
            data,
        )
        .await
    }

    async fn get_ticket_contacts(&self, ticket_id: &str) -> Result<Element> {
        self.fetch(&["Tickets", ticket_id, "Contacts"], None).await
    }

    async fn get_ticket_customers(&self, ticket_id: &str) -> Result<Element> {
        self.fetch(&["Tickets", ticket_id, "Customers"], None).await
    }

    async fn get_ticket_statuses(&self) -> Result<Element> {
        self.fetch(&["Properties", "TicketStatuses"], None).await
    }

    async fn get_ticket_types(&self) -> Result<Element> {
        self.fetch(&["Properties", "TicketTypes"], None).await
    }

    async fn search_contacts(&self, filter: &Fields) -> Result<Element> {
        self.fetch(&["Contacts"], Some(filter)).await
    }

    async fn get_contact(&self, contact_id: &str) -> Result<Element> {
        self.fetch(&["Contacts", contact_id], None).await
    }

    async fn create_contact(&self, data: &Fields) -> Result<Element> {
        self.submit(Method::POST, &["Contacts"], "Contact", data).await
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<()> {
        self.remove(&["Contacts", contact_id]).await
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Element> {
        self.fetch(&["Customers", customer_id], None).await
    }

    async fn get_customer_contacts(&self, customer_id: &str) -> Result<Element> {
        self.fetch(&["Customers", customer_id, "Contacts"], None)
            .await
    }
}
