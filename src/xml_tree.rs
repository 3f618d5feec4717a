// Generic XML to serde_json tree conversion for legacy API responses.
//
// Leaf elements become strings, empty elements become null and repeated
// siblings become arrays. Names listed in `force_list` are always arrays so a
// single <item> decodes the same way as many. Attributes are ignored.
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::DecodeError;

struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Map::new(),
            text: String::new(),
        }
    }

    fn into_value(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.children.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert("#text".to_string(), Value::String(text.to_string()));
            }
            Value::Object(children)
        };
        (self.name, value)
    }

    fn insert(&mut self, name: String, value: Value, force_list: &[&str]) {
        let forced = force_list.contains(&name.as_str());
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                let value = if forced { Value::Array(vec![value]) } else { value };
                self.children.insert(name, value);
            }
        }
    }
}

fn parse_error(err: impl std::fmt::Display) -> DecodeError {
    DecodeError::XmlParseError(err.to_string())
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, DecodeError> {
    if let Some(ch) = reference.resolve_char_ref().map_err(parse_error)? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(parse_error)?;
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| parse_error(format!("unknown entity &{name};")))
}

/// Parses a document into its root element name and content tree.
pub fn parse(xml: &str, force_list: &[&str]) -> Result<(String, Value), DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(Frame::new(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let (name, value) = Frame::new(name).into_value();
                match stack.last_mut() {
                    Some(parent) => parent.insert(name, value, force_list),
                    None if root.is_none() => root = Some((name, value)),
                    None => return Err(parse_error("more than one root element")),
                }
            }
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&e.decode().map_err(parse_error)?);
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&e.decode().map_err(parse_error)?);
                }
            }
            Event::GeneralRef(e) => {
                let resolved = resolve_reference(&e)?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&resolved);
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| parse_error("closing tag without an opening tag"))?;
                let (name, value) = frame.into_value();
                match stack.last_mut() {
                    Some(parent) => parent.insert(name, value, force_list),
                    None if root.is_none() => root = Some((name, value)),
                    None => return Err(parse_error("more than one root element")),
                }
            }
            Event::Eof => break,
            // declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| parse_error("document has no root element"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ITEM: &[&str] = &["item"];

    #[test]
    fn single_item_is_still_a_list() {
        let (root, tree) = parse(
            "<?xml version=\"1.0\"?><destinations><item><place_id>42</place_id></item></destinations>",
            ITEM,
        )
        .unwrap();
        assert_eq!(root, "destinations");
        assert_eq!(tree, json!({"item": [{"place_id": "42"}]}));
    }

    #[test]
    fn three_items_keep_document_order() {
        let xml = "<destinations>\
            <item><place_id>1</place_id></item>\
            <item><place_id>2</place_id></item>\
            <item><place_id>3</place_id></item>\
            </destinations>";
        let (_, tree) = parse(xml, ITEM).unwrap();
        let ids: Vec<&str> = tree["item"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["place_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn repeated_unforced_siblings_become_arrays() {
        let (_, tree) = parse("<r><email>a</email><email>b</email></r>", &[]).unwrap();
        assert_eq!(tree, json!({"email": ["a", "b"]}));
    }

    #[test]
    fn empty_elements_are_null() {
        let (_, tree) = parse("<r><description/><routingcode></routingcode></r>", ITEM).unwrap();
        assert_eq!(tree, json!({"description": null, "routingcode": null}));
    }

    #[test]
    fn empty_root_is_null() {
        let (root, tree) = parse("<orders/>", ITEM).unwrap();
        assert_eq!(root, "orders");
        assert_eq!(tree, Value::Null);
    }

    #[test]
    fn entities_and_cdata_are_resolved() {
        let (_, tree) = parse(
            "<r><name>Narva &amp; Co &#169;</name><text><![CDATA[<b>raw</b>]]></text></r>",
            &[],
        )
        .unwrap();
        assert_eq!(tree["name"], json!("Narva & Co \u{a9}"));
        assert_eq!(tree["text"], json!("<b>raw</b>"));
    }

    #[test]
    fn mixed_content_keeps_text() {
        let (_, tree) = parse("<r>hello<child>x</child></r>", &[]).unwrap();
        assert_eq!(tree, json!({"child": "x", "#text": "hello"}));
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(matches!(
            parse("<r><a></b></r>", ITEM),
            Err(DecodeError::XmlParseError(_))
        ));
        assert!(parse("<r><a>", ITEM).is_err());
        assert!(parse("", ITEM).is_err());
    }
}
