//! XML log codec
//!
//! Layout, compact with every value carried in attributes:
//!
//! ```text
//! <AuditLog>
//!   <Entry action="Updated" user="bob" timestamp="2025-01-02T03:04:05.0000000Z">
//!     <Field name="Price" before="10" after="20"/>
//!   </Entry>
//!   <Entry action="Added" user="bob" timestamp="..." related="Tag">
//!     <Field name="Tag" value="Gaming"/>
//!   </Entry>
//! </AuditLog>
//! ```

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use super::codec::LogCodec;
use crate::error::{AuditError, AuditResult};
use crate::models::value::{format_timestamp, parse_timestamp};
use crate::models::{AuditAction, AuditLogEntry, FieldChange, LogFormat};

const ROOT: &str = "AuditLog";
const ENTRY: &str = "Entry";
const FIELD: &str = "Field";

/// Codec for the XML log format
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl LogCodec for XmlCodec {
    fn format(&self) -> LogFormat {
        LogFormat::Xml
    }

    fn load(&self, existing: &str) -> AuditResult<Vec<AuditLogEntry>> {
        let mut reader = Reader::from_str(existing);
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut current: Option<AuditLogEntry> = None;
        let mut seen_root = false;
        // 0 = outside root, 1 = inside root, 2 = inside an entry
        let mut depth = 0usize;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| AuditError::corrupt_xml(e.to_string()))?;

            match event {
                Event::Start(e) => {
                    match depth {
                        0 => open_root(&mut seen_root)?,
                        1 if e.local_name().as_ref() == ENTRY.as_bytes() => {
                            current = Some(read_entry(&e)?);
                        }
                        2 if e.local_name().as_ref() == FIELD.as_bytes() => {
                            if let Some(entry) = current.as_mut() {
                                entry.fields.push(read_field(&e)?);
                            }
                        }
                        _ => {}
                    }
                    depth += 1;
                }
                Event::Empty(e) => match depth {
                    0 => open_root(&mut seen_root)?,
                    1 if e.local_name().as_ref() == ENTRY.as_bytes() => {
                        entries.push(read_entry(&e)?);
                    }
                    2 if e.local_name().as_ref() == FIELD.as_bytes() => {
                        if let Some(entry) = current.as_mut() {
                            entry.fields.push(read_field(&e)?);
                        }
                    }
                    _ => {}
                },
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                    }
                }
                Event::Text(text) if !text.iter().all(u8::is_ascii_whitespace) => {
                    return Err(AuditError::corrupt_xml("unexpected text content"));
                }
                Event::CData(_) => {
                    return Err(AuditError::corrupt_xml("unexpected text content"));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if depth != 0 {
            return Err(AuditError::corrupt_xml("unclosed element at end of input"));
        }
        if !seen_root {
            return Err(AuditError::corrupt_xml("missing root element"));
        }

        Ok(entries)
    }

    fn render(&self, entries: &[AuditLogEntry]) -> AuditResult<String> {
        let mut writer = Writer::new(Vec::new());

        if entries.is_empty() {
            writer
                .write_event(Event::Empty(BytesStart::new(ROOT)))
                .map_err(write_error)?;
        } else {
            writer
                .write_event(Event::Start(BytesStart::new(ROOT)))
                .map_err(write_error)?;
            for entry in entries {
                write_entry(&mut writer, entry)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(ROOT)))
                .map_err(write_error)?;
        }

        String::from_utf8(writer.into_inner()).map_err(|e| AuditError::Xml(e.to_string()))
    }
}

fn open_root(seen_root: &mut bool) -> AuditResult<()> {
    if *seen_root {
        return Err(AuditError::corrupt_xml("more than one root element"));
    }
    *seen_root = true;
    Ok(())
}

fn write_entry(writer: &mut Writer<Vec<u8>>, entry: &AuditLogEntry) -> AuditResult<()> {
    let timestamp = format_timestamp(&entry.timestamp);
    let mut element = BytesStart::new(ENTRY);
    element.push_attribute(("action", entry.action.as_str()));
    element.push_attribute(("user", entry.user.as_str()));
    element.push_attribute(("timestamp", timestamp.as_str()));
    if let Some(related) = &entry.related {
        element.push_attribute(("related", related.as_str()));
    }

    if entry.fields.is_empty() {
        return writer
            .write_event(Event::Empty(element))
            .map_err(write_error);
    }

    writer
        .write_event(Event::Start(element))
        .map_err(write_error)?;
    for field in &entry.fields {
        let mut node = BytesStart::new(FIELD);
        node.push_attribute(("name", field.name.as_str()));
        if let Some(before) = &field.before {
            node.push_attribute(("before", before.as_str()));
        }
        if let Some(after) = &field.after {
            node.push_attribute(("after", after.as_str()));
        }
        if let Some(value) = &field.value {
            node.push_attribute(("value", value.as_str()));
        }
        writer.write_event(Event::Empty(node)).map_err(write_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(ENTRY)))
        .map_err(write_error)
}

fn write_error(e: impl std::fmt::Display) -> AuditError {
    AuditError::Xml(e.to_string())
}

fn attribute_text(attr: &Attribute<'_>) -> AuditResult<String> {
    attr.unescape_value()
        .map(|v| v.into_owned())
        .map_err(|e| AuditError::corrupt_xml(e.to_string()))
}

fn read_entry(element: &BytesStart<'_>) -> AuditResult<AuditLogEntry> {
    let mut action = None;
    let mut user = None;
    let mut timestamp = None;
    let mut related = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| AuditError::corrupt_xml(e.to_string()))?;
        match attr.key.local_name().as_ref() {
            b"action" => action = Some(attribute_text(&attr)?),
            b"user" => user = Some(attribute_text(&attr)?),
            b"timestamp" => timestamp = Some(attribute_text(&attr)?),
            b"related" => related = Some(attribute_text(&attr)?),
            _ => {}
        }
    }

    let timestamp = timestamp
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or_else(|| AuditError::corrupt_xml("entry has a missing or invalid timestamp"))?;

    Ok(AuditLogEntry {
        action: AuditAction::parse_lenient(action.as_deref().unwrap_or_default()),
        user: user.unwrap_or_default(),
        timestamp,
        related,
        fields: Vec::new(),
    })
}

fn read_field(element: &BytesStart<'_>) -> AuditResult<FieldChange> {
    let mut field = FieldChange::default();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| AuditError::corrupt_xml(e.to_string()))?;
        match attr.key.local_name().as_ref() {
            b"name" => field.name = attribute_text(&attr)?,
            b"before" => field.before = Some(attribute_text(&attr)?),
            b"after" => field.after = Some(attribute_text(&attr)?),
            b"value" => field.value = Some(attribute_text(&attr)?),
            _ => {}
        }
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RelatedAction;

    #[test]
    fn test_create_on_empty_log() {
        let log = XmlCodec.append_create(None, "alice").unwrap();
        assert!(log.starts_with("<AuditLog><Entry action=\"Created\" user=\"alice\""));
        assert!(log.ends_with("/></AuditLog>"));
        assert!(!log.contains('\n'));

        let entries = XmlCodec.parse(Some(&log));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Created);
        assert_eq!(entries[0].user, "alice");
        assert!(entries[0].fields.is_empty());
    }

    #[test]
    fn test_update_omits_null_attributes() {
        let changes = vec![
            FieldChange::update("Price", Some("10".into()), Some("20".into())),
            FieldChange::update("Note", None, Some("new".into())),
        ];
        let log = XmlCodec.append_update(None, &changes, "bob").unwrap();
        assert!(log.contains("<Field name=\"Price\" before=\"10\" after=\"20\"/>"));
        assert!(log.contains("<Field name=\"Note\" after=\"new\"/>"));

        let entries = XmlCodec.parse(Some(&log));
        let note = entries[0].field("Note").unwrap();
        assert_eq!(note.before, None);
        assert_eq!(note.after.as_deref(), Some("new"));
    }

    #[test]
    fn test_related_value_fallback() {
        let fields = vec![
            FieldChange::update("FromAfter", None, Some("a".into())),
            FieldChange::update("FromBefore", Some("b".into()), None),
            FieldChange::update("Empty", None, None),
        ];
        let log = XmlCodec
            .append_related(None, RelatedAction::Removed, "Tag", &fields, "carol")
            .unwrap();
        assert!(log.contains("related=\"Tag\""));
        assert!(log.contains("<Field name=\"FromAfter\" value=\"a\"/>"));
        assert!(log.contains("<Field name=\"FromBefore\" value=\"b\"/>"));
        assert!(log.contains("<Field name=\"Empty\"/>"));

        let entries = XmlCodec.parse(Some(&log));
        assert_eq!(entries[0].action, AuditAction::Removed);
        let empty = entries[0].field("Empty").unwrap();
        assert_eq!(empty.value, None);
    }

    #[test]
    fn test_values_are_escaped() {
        let changes = vec![FieldChange::update(
            "Name",
            Some("<Tom & \"Jerry\">".into()),
            Some("it's".into()),
        )];
        let log = XmlCodec.append_update(None, &changes, "a&b").unwrap();
        let entries = XmlCodec.parse(Some(&log));
        assert_eq!(entries[0].user, "a&b");
        let field = entries[0].field("Name").unwrap();
        assert_eq!(field.before.as_deref(), Some("<Tom & \"Jerry\">"));
        assert_eq!(field.after.as_deref(), Some("it's"));
    }

    #[test]
    fn test_append_preserves_history() {
        let log = XmlCodec.append_create(None, "a").unwrap();
        let log = XmlCodec.append_delete(Some(&log), "b").unwrap();
        let entries = XmlCodec.parse(Some(&log));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].action, AuditAction::Deleted);
        assert_eq!(entries[1].user, "b");
    }

    #[test]
    fn test_corrupt_existing_is_replaced() {
        let log = XmlCodec
            .append_create(Some("not a valid document"), "alice")
            .unwrap();
        let entries = XmlCodec.parse(Some(&log));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user, "alice");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(XmlCodec.parse(Some("not a valid document")).is_empty());
        assert!(XmlCodec.parse(Some("<AuditLog><Entry>")).is_empty());
        assert!(XmlCodec.parse(Some("<AuditLog></Other>")).is_empty());
        assert!(XmlCodec.parse(Some("<a/><b/>")).is_empty());
        assert!(XmlCodec
            .parse(Some(
                r#"<AuditLog>junk<Entry action="Created" user="x" timestamp="2024-05-01T10:00:00Z"/></AuditLog>"#
            ))
            .is_empty());
        assert!(XmlCodec
            .parse(Some(
                r#"<AuditLog><Entry action="Created" user="x" timestamp="2024-05-01T10:00:00Z">text</Entry></AuditLog>"#
            ))
            .is_empty());
        assert!(XmlCodec
            .try_parse(Some("<AuditLog><Entry action=\"Created\"/></AuditLog>"))
            .unwrap_err()
            .is_corrupt());
    }

    #[test]
    fn test_parse_blank() {
        assert!(XmlCodec.parse(None).is_empty());
        assert!(XmlCodec.parse(Some("   ")).is_empty());
        assert!(XmlCodec.try_parse(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_tolerates_declaration_and_whitespace() {
        let log = r#"<?xml version="1.0" encoding="utf-8"?>
<AuditLog>
  <!-- imported -->
  <Entry action="Updated" user="x" timestamp="2024-05-01T10:00:00Z">
    <Field name="Qty" before="1" after="2" />
  </Entry>
  <Unknown foo="bar"><Field name="Ignored"/></Unknown>
</AuditLog>"#;
        let entries = XmlCodec.parse(Some(log));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fields.len(), 1);
        assert_eq!(entries[0].fields[0].name, "Qty");
    }

    #[test]
    fn test_unknown_action_is_kept_as_created() {
        let log = r#"<AuditLog><Entry action="Archived" user="x" timestamp="2024-05-01T10:00:00Z"/></AuditLog>"#;
        let entries = XmlCodec.parse(Some(log));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Created);
    }

    #[test]
    fn test_render_empty_log() {
        assert_eq!(XmlCodec.render(&[]).unwrap(), "<AuditLog/>");
        assert!(XmlCodec.parse(Some("<AuditLog/>")).is_empty());
    }
}
