// Customers (organizations in the TeamSupport API)

use tokio::sync::OnceCell;

use crate::client::TeamSupportClient;
use crate::contact::Contact;
use crate::error::Result;
use crate::record::{required_field, XmlRecord};
use crate::xml_response::Element;

#[derive(Debug)]
pub struct Customer {
    client: TeamSupportClient,
    data: Element,
    id: String,
    contacts: OnceCell<Vec<Contact>>,
}

impl Customer {
    pub fn from_element(client: &TeamSupportClient, data: Element) -> Result<Self> {
        let id = required_field(&data, "OrganizationID")?;
        Ok(Self {
            client: client.clone(),
            data,
            id,
            contacts: OnceCell::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.field("Name")
    }

    /// Contacts of this customer, fetched on first access and cached afterwards.
    pub async fn contacts(&self) -> Result<&[Contact]> {
        let contacts = self
            .contacts
            .get_or_try_init(|| async {
                let collection = self.client.service().get_customer_contacts(&self.id).await?;
                collection
                    .find_all("Contact")
                    .map(|data| Contact::from_element(&self.client, data.clone()))
                    .collect::<Result<Vec<_>>>()
            })
            .await?;
        Ok(contacts.as_slice())
    }
}

impl XmlRecord for Customer {
    fn element(&self) -> &Element {
        &self.data
    }
}
