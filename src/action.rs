// Ticket actions (comments, emails, the auto-created description)

use tracing::debug;

use crate::client::TeamSupportClient;
use crate::error::{Result, TeamSupportError};
use crate::record::XmlRecord;
use crate::xml_request::Fields;
use crate::xml_response::Element;

/// `SystemActionTypeID` of the description action every new ticket gets.
pub const ACTION_TYPE_DESCRIPTION: u32 = 1;

#[derive(Debug, Clone)]
pub struct Action {
    client: TeamSupportClient,
    data: Element,
    id: String,
    ticket_id: String,
}

impl Action {
    /// Fetch when both identifiers are given, otherwise wrap `data`.
    pub async fn new(
        client: &TeamSupportClient,
        ticket_id: Option<&str>,
        action_id: Option<&str>,
        data: Option<Element>,
    ) -> Result<Self> {
        let ticket_id = ticket_id.filter(|id| !id.is_empty());
        let action_id = action_id.filter(|id| !id.is_empty());

        match (ticket_id, action_id, data) {
            (Some(ticket_id), Some(action_id), _) => Self::fetch(client, ticket_id, action_id).await,
            (_, _, Some(data)) => Self::from_element(client, data),
            _ => Err(TeamSupportError::MissingArgument(
                "Action needs either both a ticket_id and an action_id or a data fragment".to_string(),
            )),
        }
    }

    pub async fn fetch(client: &TeamSupportClient, ticket_id: &str, action_id: &str) -> Result<Self> {
        debug!(ticket_id, action_id, "Fetching action");
        let data = client.service().get_ticket_action(ticket_id, action_id).await?;
        Self::from_element(client, data)
    }

    pub fn from_element(client: &TeamSupportClient, data: Element) -> Result<Self> {
        // Collections use <ID>, some single-action responses use <ActionID>
        let id = data
            .child_text("ID")
            .or_else(|| data.child_text("ActionID"))
            .map(str::to_owned)
            .ok_or_else(|| TeamSupportError::AttributeMissing("ID".to_string()))?;
        let ticket_id = crate::record::required_field(&data, "TicketID")?;

        Ok(Self {
            client: client.clone(),
            data,
            id,
            ticket_id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    pub fn name(&self) -> Option<&str> {
        self.field("Name")
    }

    pub fn description(&self) -> Option<&str> {
        self.field("Description")
    }

    pub fn is_description(&self) -> bool {
        self.field("SystemActionTypeID")
            .and_then(|v| v.trim().parse::<u32>().ok())
            == Some(ACTION_TYPE_DESCRIPTION)
    }

    pub async fn update(&self, data: &Fields) -> Result<Action> {
        let updated = self
            .client
            .service()
            .update_ticket_action(&self.ticket_id, &self.id, data)
            .await?;
        Self::from_element(&self.client, updated)
    }
}

impl XmlRecord for Action {
    fn element(&self) -> &Element {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_service::MockTeamSupportService;
    use crate::xml_request::fields;
    use std::sync::Arc;
    use test_case::test_case;

    const ACTION_XML: &str = r#"<Action>
        <ID>ActionID</ID>
        <TicketID>ID</TicketID>
        <Name>Description</Name>
    </Action>"#;

    fn action_element() -> Element {
        Element::new("Action")
            .with_field("ID", "ActionID")
            .with_field("TicketID", "ID")
            .with_field("Name", "Description")
    }

    fn client_with(service: Arc<MockTeamSupportService>) -> TeamSupportClient {
        TeamSupportClient::new(service)
    }

    #[tokio::test]
    async fn test_initialisation_with_ids() {
        let service = Arc::new(MockTeamSupportService::new());
        service.respond("get_ticket_action", ACTION_XML).await;
        let client = client_with(service.clone());

        let action = Action::new(&client, Some("ID"), Some("ActionID"), None)
            .await
            .unwrap();

        assert_eq!(action.ticket_id(), "ID");
        assert_eq!(action.id(), "ActionID");
        let calls = service.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["ID", "ActionID"]);
    }

    #[tokio::test]
    async fn test_initialisation_with_data() {
        let service = Arc::new(MockTeamSupportService::new());
        let client = client_with(service.clone());

        let action = Action::new(&client, None, None, Some(action_element()))
            .await
            .unwrap();

        assert_eq!(action.ticket_id(), "ID");
        assert_eq!(action.id(), "ActionID");
        assert_eq!(action.name(), Some("Description"));
        assert!(service.calls().await.is_empty());
    }

    #[test_case(None, None; "nothing given")]
    #[test_case(Some("ID"), None; "only ticket id")]
    #[test_case(None, Some("ActionID"); "only action id")]
    #[test_case(Some(""), Some("ActionID"); "empty ticket id")]
    #[tokio::test]
    async fn test_initialisation_fails_when_missing_args(
        ticket_id: Option<&str>,
        action_id: Option<&str>,
    ) {
        let service = Arc::new(MockTeamSupportService::new());
        let client = client_with(service.clone());

        let err = Action::new(&client, ticket_id, action_id, None)
            .await
            .unwrap_err();

        assert!(err.is_missing_argument());
        assert!(service.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_action_id_falls_back_to_action_id_tag() {
        let client = client_with(Arc::new(MockTeamSupportService::new()));
        let data = Element::new("Action")
            .with_field("ActionID", "77")
            .with_field("TicketID", "5");

        let action = Action::from_element(&client, data).unwrap();
        assert_eq!(action.id(), "77");
    }

    #[tokio::test]
    async fn test_fragment_without_ticket_id_is_attribute_missing() {
        let client = client_with(Arc::new(MockTeamSupportService::new()));
        let data = Element::new("Action").with_field("ID", "77");

        let err = Action::from_element(&client, data).unwrap_err();
        assert!(err.is_attribute_missing());
    }

    #[tokio::test]
    async fn test_update_sends_fields_for_both_ids() {
        let service = Arc::new(MockTeamSupportService::new());
        service.respond("update_ticket_action", ACTION_XML).await;
        let client = client_with(service.clone());
        let action = Action::from_element(&client, action_element()).unwrap();

        action
            .update(&fields([("Description", "Updated")]))
            .await
            .unwrap();

        let calls = service.calls().await;
        assert_eq!(calls[0].method, "update_ticket_action");
        assert_eq!(calls[0].args, vec!["ID", "ActionID"]);
        assert_eq!(calls[0].fields["Description"], "Updated");
    }
}
