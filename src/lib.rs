// Client library for the TeamSupport XML API
//
// Responses are parsed into a loose element tree and wrapped by the entity types below;
// every child tag of an entity stays reachable through `XmlRecord::field`.

pub mod action;
pub mod api;
pub mod client;
pub mod contact;
pub mod customer;
pub mod error;
pub mod lookup;
pub mod record;
pub mod ticket;
pub mod xml_request;
pub mod xml_response;

#[cfg(test)]
mod mock_service;

// Re-export key types for convenience
pub use action::{Action, ACTION_TYPE_DESCRIPTION};
pub use api::{ClientConfig, HttpTeamSupportService, TeamSupportService};
pub use client::TeamSupportClient;
pub use contact::Contact;
pub use customer::Customer;
pub use error::{Result, TeamSupportError};
pub use lookup::LookupCache;
pub use record::{filter_by, find_by, XmlRecord};
pub use ticket::{NewTicket, Ticket};
pub use xml_request::{fields, Fields};
pub use xml_response::Element;
