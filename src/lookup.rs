// Resolved reference values ("New" ticket status, "Support" ticket type)
//
// Both are organization-wide IDs that never change for the life of a process, so each
// is queried once and reused by every ticket creation sharing this cache.

use tokio::sync::OnceCell;
use tracing::debug;

use crate::api::TeamSupportService;
use crate::error::{Result, TeamSupportError};
use crate::xml_response::Element;

pub const TICKET_STATUS_NEW: &str = "new";
pub const TICKET_TYPE_SUPPORT: &str = "support";

#[derive(Debug, Default)]
pub struct LookupCache {
    ticket_status_new: OnceCell<String>,
    ticket_type_support: OnceCell<String>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// ID of the "New" ticket status. Queried on first use only; a failed
    /// resolution leaves the cache empty so the next call retries.
    pub async fn ticket_status_new(&self, service: &dyn TeamSupportService) -> Result<&str> {
        let id = self
            .ticket_status_new
            .get_or_try_init(|| async move {
                let statuses = service.get_ticket_statuses().await?;
                resolve(&statuses, "ticket status", TICKET_STATUS_NEW, "TicketStatusID")
            })
            .await?;
        Ok(id.as_str())
    }

    /// ID of the "Support" ticket type, with the same caching as the status.
    pub async fn ticket_type_support(&self, service: &dyn TeamSupportService) -> Result<&str> {
        let id = self
            .ticket_type_support
            .get_or_try_init(|| async move {
                let types = service.get_ticket_types().await?;
                resolve(&types, "ticket type", TICKET_TYPE_SUPPORT, "TicketTypeID")
            })
            .await?;
        Ok(id.as_str())
    }

    pub fn is_resolved(&self) -> bool {
        self.ticket_status_new.initialized() && self.ticket_type_support.initialized()
    }
}

// Find the entry whose Name matches case-insensitively and return its ID field
fn resolve(collection: &Element, kind: &'static str, name: &str, id_field: &str) -> Result<String> {
    let entry = collection
        .children()
        .iter()
        .find(|entry| {
            entry
                .child_text("Name")
                .map_or(false, |n| n.trim().eq_ignore_ascii_case(name))
        })
        .ok_or_else(|| TeamSupportError::LookupNotFound {
            kind,
            name: name.to_string(),
        })?;

    let id = entry
        .child_text(id_field)
        .ok_or_else(|| TeamSupportError::AttributeMissing(id_field.to_string()))?;
    debug!(kind, name, id, "Resolved lookup value");
    Ok(id.to_string())
}
