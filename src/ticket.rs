// Tickets and the convenience operations built on them

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::action::{Action, ACTION_TYPE_DESCRIPTION};
use crate::client::TeamSupportClient;
use crate::contact::Contact;
use crate::customer::Customer;
use crate::error::{Result, TeamSupportError};
use crate::record::{required_field, XmlRecord};
use crate::xml_request::{fields, Fields};
use crate::xml_response::Element;

/// Input for [`Ticket::create`].
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub contact_email: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub description: String,
    // Sent along with the creation request; never overrides the fields set by `create`
    pub extra_fields: Fields,
}

#[derive(Debug)]
pub struct Ticket {
    client: TeamSupportClient,
    data: Element,
    id: String,
    actions: OnceCell<Vec<Action>>,
    contacts: OnceCell<Vec<Contact>>,
    customers: OnceCell<Vec<Customer>>,
}

impl Ticket {
    /// Fetch the ticket when `ticket_id` is given, otherwise wrap `data`.
    pub async fn new(
        client: &TeamSupportClient,
        ticket_id: Option<&str>,
        data: Option<Element>,
    ) -> Result<Self> {
        match (ticket_id.filter(|id| !id.is_empty()), data) {
            (Some(ticket_id), _) => Self::fetch(client, ticket_id).await,
            (None, Some(data)) => Self::from_element(client, data),
            (None, None) => Err(TeamSupportError::MissingArgument(
                "Ticket needs either a ticket_id or a data fragment (neither given)".to_string(),
            )),
        }
    }

    pub async fn fetch(client: &TeamSupportClient, ticket_id: &str) -> Result<Self> {
        debug!(ticket_id, "Fetching ticket");
        let data = client.service().get_ticket(ticket_id).await?;
        Self::from_element(client, data)
    }

    pub fn from_element(client: &TeamSupportClient, data: Element) -> Result<Self> {
        let id = required_field(&data, "TicketID")?;
        Ok(Self {
            client: client.clone(),
            data,
            id,
            actions: OnceCell::new(),
            contacts: OnceCell::new(),
            customers: OnceCell::new(),
        })
    }

    /// Open a support ticket on behalf of `request.contact_email`.
    ///
    /// The contact is looked up by email and created if missing. The remote side
    /// creates an empty description action with every ticket, so the description
    /// is written by a second request once the ticket exists.
    pub async fn create(client: &TeamSupportClient, request: NewTicket) -> Result<Ticket> {
        let contact = match Contact::get(client, &request.contact_email).await? {
            Some(contact) => contact,
            None => {
                Contact::create(
                    client,
                    &request.contact_email,
                    fields([
                        ("FirstName", request.first_name.as_str()),
                        ("LastName", request.last_name.as_str()),
                    ]),
                )
                .await?
            }
        };

        let service = client.service();
        let status_id = client.lookups().ticket_status_new(service).await?;
        let type_id = client.lookups().ticket_type_support(service).await?;

        let mut data = request.extra_fields;
        data.extend(fields([
            ("Name", request.title.as_str()),
            ("TicketStatusID", status_id),
            ("TicketTypeID", type_id),
            ("ContactID", contact.id()),
        ]));

        let ticket = Ticket::from_element(client, service.create_ticket(&data).await?)?;
        info!(ticket_id = ticket.id(), contact_id = contact.id(), "Created ticket");

        ticket.set_description(&request.description).await?;
        Ok(ticket)
    }

    pub async fn delete(&self) -> Result<()> {
        self.client.service().delete_ticket(&self.id).await?;
        info!(ticket_id = %self.id, "Deleted ticket");
        Ok(())
    }

    /// Send `data` as a ticket update and return the ticket as the API now reports it.
    pub async fn update(&self, data: &Fields) -> Result<Ticket> {
        let updated = self.client.service().update_ticket(&self.id, data).await?;
        Ticket::from_element(&self.client, updated)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.field("Name")
    }

    pub fn status(&self) -> Option<&str> {
        self.field("Status")
    }

    pub fn ticket_number(&self) -> Option<&str> {
        self.field("TicketNumber")
    }

    async fn description_action(&self) -> Result<Option<Action>> {
        let filter = fields([("SystemActionTypeID", ACTION_TYPE_DESCRIPTION.to_string())]);
        let actions = self
            .client
            .service()
            .get_ticket_actions(&self.id, &filter)
            .await?;

        // The filter is not always honoured; prefer an action typed as the
        // description, else the first one that carries no type at all
        let mut untyped = None;
        for data in actions.children() {
            let action = Action::from_element(&self.client, data.clone())?;
            if action.is_description() {
                return Ok(Some(action));
            }
            if untyped.is_none() && action.field("SystemActionTypeID").is_none() {
                untyped = Some(action);
            }
        }
        Ok(untyped)
    }

    /// Text of the description action, `None` if the ticket has none.
    pub async fn description(&self) -> Result<Option<String>> {
        Ok(self
            .description_action()
            .await?
            .and_then(|action| action.description().map(str::to_owned)))
    }

    pub async fn set_description(&self, description: &str) -> Result<()> {
        let action = self.description_action().await?.ok_or_else(|| {
            TeamSupportError::MissingDescriptionAction {
                ticket_id: self.id.clone(),
            }
        })?;

        self.client
            .service()
            .update_ticket_action(&self.id, action.id(), &fields([("Description", description)]))
            .await?;
        debug!(ticket_id = %self.id, action_id = action.id(), "Updated ticket description");
        Ok(())
    }

    /// Actions on this ticket, fetched on first access and cached afterwards.
    pub async fn actions(&self) -> Result<&[Action]> {
        let actions = self
            .actions
            .get_or_try_init(|| async {
                let collection = self
                    .client
                    .service()
                    .get_ticket_actions(&self.id, &Fields::new())
                    .await?;
                collection
                    .find_all("Action")
                    .map(|data| Action::from_element(&self.client, data.clone()))
                    .collect::<Result<Vec<_>>>()
            })
            .await?;
        Ok(actions.as_slice())
    }

    pub async fn contacts(&self) -> Result<&[Contact]> {
        let contacts = self
            .contacts
            .get_or_try_init(|| async {
                let collection = self.client.service().get_ticket_contacts(&self.id).await?;
                collection
                    .find_all("Contact")
                    .map(|data| Contact::from_element(&self.client, data.clone()))
                    .collect::<Result<Vec<_>>>()
            })
            .await?;
        Ok(contacts.as_slice())
    }

    pub async fn customers(&self) -> Result<&[Customer]> {
        let customers = self
            .customers
            .get_or_try_init(|| async {
                let collection = self.client.service().get_ticket_customers(&self.id).await?;
                collection
                    .find_all("Customer")
                    .map(|data| Customer::from_element(&self.client, data.clone()))
                    .collect::<Result<Vec<_>>>()
            })
            .await?;
        Ok(customers.as_slice())
    }
}

impl XmlRecord for Ticket {
    fn element(&self) -> &Element {
        &self.data
    }
}
