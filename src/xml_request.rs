// Request bodies for create/update calls
use std::collections::BTreeMap;

use crate::error::{Result, TeamSupportError};

/// Field name to value mapping sent to (or used to filter) the API.
///
/// Ordered so request bodies and query strings are deterministic.
pub type Fields = BTreeMap<String, String>;

// Build a `Fields` map from string pairs
pub fn fields<K, V, I>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Serialize `fields` as `<root><Key>value</Key>...</root>`.
///
/// Every key becomes a child element, so keys the serializer would turn into
/// attributes (`@name`) or bare text (`$text`, `$value`) are rejected.
pub fn to_xml_body(root: &str, fields: &Fields) -> Result<String> {
    if let Some(key) = fields
        .keys()
        .find(|key| key.is_empty() || key.starts_with('@') || key.starts_with('$'))
    {
        return Err(TeamSupportError::XmlSerialize(format!(
            "invalid field name {:?}",
            key
        )));
    }
    quick_xml::se::to_string_with_root(root, fields)
        .map_err(|e| TeamSupportError::XmlSerialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml_response::Element;
    use test_case::test_case;

    #[test]
    fn test_body_contains_one_element_per_field() {
        let body = to_xml_body(
            "Ticket",
            &fields([("Name", "Broken printer"), ("ContactID", "42")]),
        )
        .unwrap();

        assert!(body.starts_with("<Ticket>"));
        assert!(body.contains("<Name>Broken printer</Name>"));
        assert!(body.contains("<ContactID>42</ContactID>"));
        assert!(body.ends_with("</Ticket>"));
    }

    #[test]
    fn test_body_escapes_markup() {
        let body = to_xml_body("Action", &fields([("Description", "a < b & c")])).unwrap();

        assert!(!body.contains("a < b"));
        let parsed = Element::parse(&body).unwrap();
        assert_eq!(parsed.child_text("Description"), Some("a < b & c"));
    }

    #[test_case("@Severity"; "attribute prefix")]
    #[test_case("$text"; "text content")]
    #[test_case("$value"; "value content")]
    #[test_case(""; "empty name")]
    fn test_body_rejects_non_element_field_names(key: &str) {
        let result = to_xml_body("Ticket", &fields([("Name", "Broken"), (key, "x")]));
        assert!(matches!(result, Err(TeamSupportError::XmlSerialize(_))));
    }
}
