// Field access shared by every wrapped entity

use crate::error::{Result, TeamSupportError};
use crate::xml_response::Element;

/// An entity backed by a parsed XML fragment.
///
/// Every child tag of the fragment is readable by name, including custom
/// fields the typed accessors don't know about.
pub trait XmlRecord {
    fn element(&self) -> &Element;

    /// Text of the child named `name`, or `None` if there is no such child.
    fn field(&self, name: &str) -> Option<&str> {
        self.element().child_text(name)
    }

    /// Like [`XmlRecord::field`] but an absent child is an `AttributeMissing` error.
    fn attr(&self, name: &str) -> Result<&str> {
        self.field(name)
            .ok_or_else(|| TeamSupportError::AttributeMissing(name.to_string()))
    }

    fn matches(&self, name: &str, value: &str) -> bool {
        self.field(name) == Some(value)
    }
}

// Read the identifying field of a fragment at construction time
pub(crate) fn required_field(element: &Element, name: &str) -> Result<String> {
    element
        .child_text(name)
        .map(str::to_owned)
        .ok_or_else(|| TeamSupportError::AttributeMissing(name.to_string()))
}

/// First record whose `name` field equals `value`.
pub fn find_by<'a, R: XmlRecord>(records: &'a [R], name: &str, value: &str) -> Option<&'a R> {
    records.iter().find(|record| record.matches(name, value))
}

/// Every record whose `name` field equals `value`.
pub fn filter_by<'a, R: XmlRecord>(records: &'a [R], name: &str, value: &str) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| record.matches(name, value))
        .collect()
}
