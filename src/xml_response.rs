// Generic element tree for TeamSupport XML responses
//
// The API returns documents like `<Tickets><Ticket><TicketID>1</TicketID>...</Ticket></Tickets>`.
// Field sets differ per organization (custom fields are emitted as plain child tags), so
// responses are kept as a loose tree instead of being deserialized into fixed structs.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::{Result, TeamSupportError};

// Deepest element nesting accepted from a response
pub const MAX_DEPTH: usize = 256;

/// A parsed XML node: tag, accumulated text content and child elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    // Builder used by tests and by callers assembling fragments by hand
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    // Shorthand for a leaf child: `<tag>text</tag>`
    pub fn with_field(self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_child(Element::new(tag).with_text(text))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given tag.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// All direct children with the given tag, in document order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Text of the first direct child named `tag`, if there is one.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.find(tag).map(Element::text)
    }

    /// Parse a whole document and return its root element.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(TeamSupportError::XmlParse(format!(
                            "nesting deeper than {} elements at position {}",
                            MAX_DEPTH,
                            reader.error_position()
                        )));
                    }
                    stack.push(Element::new(
                        String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    ));
                }
                Ok(Event::Empty(e)) => {
                    let element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        TeamSupportError::XmlParse("unexpected closing tag".to_string())
                    })?;
                    // Indentation between child elements is not content
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = String::from_utf8_lossy(&e);
                        let text = quick_xml::escape::unescape(&raw)
                            .map_err(|e| TeamSupportError::XmlParse(e.to_string()))?;
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = String::from_utf8_lossy(&e);
                        current.text.push_str(&resolve_reference(&name)?);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(TeamSupportError::XmlParse(format!(
                        "Error at position {}: {:?}",
                        reader.error_position(),
                        e
                    )))
                }
                _ => (),
            }
        }

        if !stack.is_empty() {
            return Err(TeamSupportError::XmlParse(format!(
                "unclosed element <{}>",
                stack.last().map(Element::tag).unwrap_or_default()
            )));
        }

        root.ok_or_else(|| TeamSupportError::XmlParse("document has no root element".to_string()))
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(TeamSupportError::XmlParse(
                "document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

// Entity references arrive as separate events: `&amp;` -> "amp", `&#65;` -> "#65"
fn resolve_reference(name: &str) -> Result<String> {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        };
        return parsed
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| TeamSupportError::XmlParse(format!("invalid character reference &{};", name)));
    }

    let resolved = match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        other => {
            return Err(TeamSupportError::XmlParse(format!(
                "unknown entity &{};",
                other
            )))
        }
    };
    Ok(resolved.to_string())
}
