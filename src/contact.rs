// Contacts: looked up by email or created, never fetched by bare ID

use tracing::{debug, info};

use crate::client::TeamSupportClient;
use crate::error::Result;
use crate::record::{required_field, XmlRecord};
use crate::xml_request::{fields, Fields};
use crate::xml_response::Element;

#[derive(Debug, Clone)]
pub struct Contact {
    client: TeamSupportClient,
    data: Element,
    id: String,
}

impl Contact {
    pub fn from_element(client: &TeamSupportClient, data: Element) -> Result<Self> {
        let id = required_field(&data, "ContactID")?;
        Ok(Self {
            client: client.clone(),
            data,
            id,
        })
    }

    /// First contact with the given email, or `None` when the search is empty.
    pub async fn get(client: &TeamSupportClient, email: &str) -> Result<Option<Contact>> {
        let results = client
            .service()
            .search_contacts(&fields([("Email", email)]))
            .await?;
        debug!(email, found = results.children().len(), "Searched contacts");

        results
            .children()
            .first()
            .map(|data| Contact::from_element(client, data.clone()))
            .transpose()
    }

    /// Create a contact; `extra` is merged in, with `Email` always taken from `email`.
    pub async fn create(client: &TeamSupportClient, email: &str, extra: Fields) -> Result<Contact> {
        let mut data = extra;
        data.insert("Email".to_string(), email.to_string());

        let created = client.service().create_contact(&data).await?;
        let contact = Contact::from_element(client, created)?;
        info!(contact_id = contact.id(), "Created contact");
        Ok(contact)
    }

    pub async fn delete(&self) -> Result<()> {
        self.client.service().delete_contact(&self.id).await?;
        info!(contact_id = %self.id, "Deleted contact");
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.field("Email")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.field("FirstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.field("LastName")
    }
}

impl XmlRecord for Contact {
    fn element(&self) -> &Element {
        &self.data
    }
}
