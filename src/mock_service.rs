// In-memory TeamSupportService for unit tests: canned XML per method, calls recorded in order

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::TeamSupportService;
use crate::error::{Result, TeamSupportError};
use crate::xml_request::Fields;
use crate::xml_response::Element;

pub const STATUSES_XML: &str = r#"<TicketStatuses>
    <TicketStatus><TicketStatusID>1</TicketStatusID><Name>Closed</Name></TicketStatus>
    <TicketStatus><TicketStatusID>2</TicketStatusID><Name>New</Name></TicketStatus>
</TicketStatuses>"#;

pub const TYPES_XML: &str = r#"<TicketTypes>
    <TicketType><TicketTypeID>10</TicketTypeID><Name>Bug</Name></TicketType>
    <TicketType><TicketTypeID>11</TicketTypeID><Name>SUPPORT</Name></TicketType>
</TicketTypes>"#;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub args: Vec<String>,
    pub fields: Fields,
}

#[derive(Default)]
pub struct MockTeamSupportService {
    responses: Mutex<HashMap<&'static str, String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTeamSupportService {
    pub fn new() -> Self {
        Self::default()
    }

    // Canned body returned by every later call to `method`
    pub async fn respond(&self, method: &'static str, xml: &str) {
        self.responses.lock().await.insert(method, xml.to_string());
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn methods(&self) -> Vec<&'static str> {
        self.calls.lock().await.iter().map(|c| c.method).collect()
    }

    pub async fn calls_to(&self, method: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    async fn record(&self, method: &'static str, args: &[&str], fields: Option<&Fields>) {
        self.calls.lock().await.push(RecordedCall {
            method,
            args: args.iter().map(|a| a.to_string()).collect(),
            fields: fields.cloned().unwrap_or_default(),
        });
    }

    async fn reply(&self, method: &'static str, args: &[&str], fields: Option<&Fields>) -> Result<Element> {
        self.record(method, args, fields).await;
        match self.responses.lock().await.get(method) {
            Some(xml) => Element::parse(xml),
            None => Err(TeamSupportError::ApiResponse {
                status_code: 404,
                message: format!("no canned response for {}", method),
            }),
        }
    }
}

#[async_trait]
impl TeamSupportService for MockTeamSupportService {
    async fn get_ticket(&self, ticket_id: &str) -> Result<Element> {
        self.reply("get_ticket", &[ticket_id], None).await
    }

    async fn create_ticket(&self, data: &Fields) -> Result<Element> {
        self.reply("create_ticket", &[], Some(data)).await
    }

    async fn update_ticket(&self, ticket_id: &str, data: &Fields) -> Result<Element> {
        self.reply("update_ticket", &[ticket_id], Some(data)).await
    }

    async fn delete_ticket(&self, ticket_id: &str) -> Result<()> {
        self.record("delete_ticket", &[ticket_id], None).await;
        Ok(())
    }

    async fn get_ticket_actions(&self, ticket_id: &str, filter: &Fields) -> Result<Element> {
        self.reply("get_ticket_actions", &[ticket_id], Some(filter)).await
    }

    async fn get_ticket_action(&self, ticket_id: &str, action_id: &str) -> Result<Element> {
        self.reply("get_ticket_action", &[ticket_id, action_id], None)
            .await
    }

    async fn update_ticket_action(
        &self,
        ticket_id: &str,
        action_id: &str,
        data: &Fields,
    ) -> Result<Element> {
        self.reply("update_ticket_action", &[ticket_id, action_id], Some(data))
            .await
    }

    async fn get_ticket_contacts(&self, ticket_id: &str) -> Result<Element> {
        self.reply("get_ticket_contacts", &[ticket_id], None).await
    }

    async fn get_ticket_customers(&self, ticket_id: &str) -> Result<Element> {
        self.reply("get_ticket_customers", &[ticket_id], None).await
    }

    async fn get_ticket_statuses(&self) -> Result<Element> {
        self.reply("get_ticket_statuses", &[], None).await
    }

    async fn get_ticket_types(&self) -> Result<Element> {
        self.reply("get_ticket_types", &[], None).await
    }

    async fn search_contacts(&self, filter: &Fields) -> Result<Element> {
        self.reply("search_contacts", &[], Some(filter)).await
    }

    async fn get_contact(&self, contact_id: &str) -> Result<Element> {
        self.reply("get_contact", &[contact_id], None).await
    }

    async fn create_contact(&self, data: &Fields) -> Result<Element> {
        self.reply("create_contact", &[], Some(data)).await
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<()> {
        self.record("delete_contact", &[contact_id], None).await;
        Ok(())
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Element> {
        self.reply("get_customer", &[customer_id], None).await
    }

    async fn get_customer_contacts(&self, customer_id: &str) -> Result<Element> {
        self.reply("get_customer_contacts", &[customer_id], None).await
    }
}
