//! EDMX metadata document parser.
//!
//! This module walks an OData v4 `$metadata` document with a streaming
//! reader and collects raw declaration records. Elements that are not
//! modeled (annotations, navigation properties, functions, actions,
//! singletons, references, ...) are skipped wholesale.

use crate::envelope;
use crate::error::{DecodeError, ParseError};
use crate::raw::{
    RawDataServices, RawDocument, RawEntityContainer, RawEntitySet, RawEnumType, RawMember,
    RawProperty, RawSchema, RawStructuredType,
};
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashSet;

/// The only EDMX version accepted.
pub const SUPPORTED_VERSION: &str = "4.0";

type XmlReader<'a> = Reader<&'a [u8]>;

/// What a child visitor did with the element it was handed.
enum Child {
    /// The visitor read the element's content, or there was none.
    Consumed,
    /// The element's content is not needed and must be skipped.
    Skip,
}

/// Parses a metadata document into its single validated `DataServices` block.
///
/// # Arguments
/// * `bytes` - Raw document bytes
///
/// # Returns
/// The raw per-namespace records of the document.
///
/// # Errors
/// Returns `ParseError::MalformedDocument` if the bytes are not an EDMX
/// document (carrying the service message when the body is an error
/// envelope), `ParseError::VersionMismatch` if the version is not `4.0`,
/// and `ParseError::Structure` for a wrong number of `DataServices` or
/// `Schema` blocks.
pub fn parse_document(bytes: &[u8]) -> Result<RawDataServices, ParseError> {
    let document =
        decode_document(bytes).map_err(|source| ParseError::MalformedDocument {
            message: envelope::service_message(bytes),
            source,
        })?;

    validate_document(document)
}

/// Checks version and block cardinality of a decoded document.
fn validate_document(document: RawDocument) -> Result<RawDataServices, ParseError> {
    if document.version.as_deref() != Some(SUPPORTED_VERSION) {
        return Err(ParseError::VersionMismatch {
            found: document.version.unwrap_or_default(),
        });
    }

    let count = document.data_services.len();
    let mut blocks = document.data_services.into_iter();
    let (Some(data_services), None) = (blocks.next(), blocks.next()) else {
        return Err(ParseError::structure(format!(
            "expected exactly one DataServices element, found {count}"
        )));
    };

    if data_services.schemas.is_empty() {
        return Err(ParseError::structure("DataServices declares no Schema"));
    }

    let mut seen = HashSet::new();
    for schema in &data_services.schemas {
        if !seen.insert(schema.namespace.as_str()) {
            return Err(ParseError::structure(format!(
                "duplicate Schema namespace '{}'",
                schema.namespace
            )));
        }
    }

    Ok(data_services)
}

/// Decodes the whole document without judging its contents.
fn decode_document(bytes: &[u8]) -> Result<RawDocument, DecodeError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => return parse_edmx(&mut reader, e, true),
            Event::Empty(ref e) => return parse_edmx(&mut reader, e, false),
            Event::Eof => return Err(DecodeError::MissingRoot),
            _ => {}
        }
        buf.clear();
    }
}

/// Parses the root `Edmx` element.
fn parse_edmx(
    reader: &mut XmlReader<'_>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<RawDocument, DecodeError> {
    let name = local_name(e)?;
    if name != "Edmx" {
        return Err(DecodeError::UnexpectedRoot { found: name });
    }

    let mut document = RawDocument::default();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        if key == "Version" {
            document.version = Some(attr_value(&attr, reader.decoder())?);
        }
    }

    if has_children {
        for_each_child(reader, "Edmx", |reader, e, has_children| {
            if local_name(e)? != "DataServices" {
                return Ok(Child::Skip);
            }
            let data_services = parse_data_services(reader, has_children)?;
            document.data_services.push(data_services);
            Ok(Child::Consumed)
        })?;
    }

    Ok(document)
}

/// Parses a `DataServices` block.
fn parse_data_services(
    reader: &mut XmlReader<'_>,
    has_children: bool,
) -> Result<RawDataServices, DecodeError> {
    let mut data_services = RawDataServices::default();

    if has_children {
        for_each_child(reader, "DataServices", |reader, e, has_children| {
            if local_name(e)? != "Schema" {
                return Ok(Child::Skip);
            }
            let schema = parse_schema(reader, e, has_children)?;
            data_services.schemas.push(schema);
            Ok(Child::Consumed)
        })?;
    }

    Ok(data_services)
}

/// Parses a `Schema` element and its declarations.
fn parse_schema(
    reader: &mut XmlReader<'_>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<RawSchema, DecodeError> {
    let mut namespace = None;
    let mut alias = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_value(&attr, reader.decoder())?;

        match key {
            "Namespace" => namespace = Some(value),
            "Alias" => alias = Some(value),
            _ => {}
        }
    }

    let namespace = namespace.ok_or_else(|| DecodeError::missing_attr("Schema", "Namespace"))?;
    let mut schema = RawSchema::new(namespace);
    schema.alias = alias;

    if !has_children {
        return Ok(schema);
    }

    for_each_child(reader, "Schema", |reader, e, has_children| {
        match local_name(e)?.as_str() {
            "EntityType" => {
                let entity_type = parse_structured_type(reader, e, "EntityType", has_children)?;
                schema.entity_types.push(entity_type);
            }
            "ComplexType" => {
                let complex_type = parse_structured_type(reader, e, "ComplexType", has_children)?;
                schema.complex_types.push(complex_type);
            }
            "EnumType" => {
                let enum_type = parse_enum_type(reader, e, has_children)?;
                schema.enum_types.push(enum_type);
            }
            "EntityContainer" => {
                let container = parse_entity_container(reader, e, has_children)?;
                schema.containers.push(container);
            }
            _ => return Ok(Child::Skip),
        }
        Ok(Child::Consumed)
    })?;

    Ok(schema)
}

/// Parses an `EntityType` or `ComplexType` element.
fn parse_structured_type(
    reader: &mut XmlReader<'_>,
    e: &BytesStart<'_>,
    element: &str,
    has_children: bool,
) -> Result<RawStructuredType, DecodeError> {
    let mut name = None;
    let mut base_type = None;
    let mut is_abstract = false;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_value(&attr, reader.decoder())?;

        match key {
            "Name" => name = Some(value),
            "BaseType" => base_type = Some(value),
            "Abstract" => is_abstract = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| DecodeError::missing_attr(element, "Name"))?;
    let mut structured = RawStructuredType::new(name);
    structured.base_type = base_type;
    structured.is_abstract = is_abstract;

    if !has_children {
        return Ok(structured);
    }

    for_each_child(reader, element, |reader, e, has_children| {
        match local_name(e)?.as_str() {
            "Property" => {
                structured.properties.push(parse_property(e, reader.decoder())?);
                // Property content is annotations only
                Ok(Child::Skip)
            }
            "Key" if has_children => {
                for_each_child(reader, "Key", |reader, e, _| {
                    if local_name(e)? == "PropertyRef" {
                        let name = required_attr(e, reader.decoder(), "PropertyRef", "Name")?;
                        structured.key.push(name);
                    }
                    Ok(Child::Skip)
                })?;
                Ok(Child::Consumed)
            }
            _ => Ok(Child::Skip),
        }
    })?;

    Ok(structured)
}

/// Parses a `Property` element's attributes.
fn parse_property(e: &BytesStart<'_>, decoder: Decoder) -> Result<RawProperty, DecodeError> {
    let mut name = None;
    let mut type_name = None;
    let mut nullable = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_value(&attr, decoder)?;

        match key {
            "Name" => name = Some(value),
            "Type" => type_name = Some(value),
            "Nullable" => nullable = Some(value),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| DecodeError::missing_attr("Property", "Name"))?;
    let type_name = type_name.ok_or_else(|| DecodeError::missing_attr("Property", "Type"))?;

    Ok(RawProperty::new(name, type_name, nullable))
}

/// Parses an `EnumType` element and its members.
fn parse_enum_type(
    reader: &mut XmlReader<'_>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<RawEnumType, DecodeError> {
    let mut name = None;
    let mut is_flags = false;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr_value(&attr, reader.decoder())?;

        match key {
            "IsFlags" => is_flags = value.eq_ignore_ascii_case("true"),
            "Name" => name = Some(value),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| DecodeError::missing_attr("EnumType", "Name"))?;
    let mut enum_type = RawEnumType::new(name);
    enum_type.is_flags = is_flags;

    if !has_children {
        return Ok(enum_type);
    }

    for_each_child(reader, "EnumType", |reader, e, _| {
        if local_name(e)? == "Member" {
            let mut name = None;
            let mut value = None;

            for attr in e.attributes().flatten() {
                let key = std::str::from_utf8(attr.key.as_ref())?;
                let text = attr_value(&attr, reader.decoder())?;

                match key {
                    "Name" => name = Some(text),
                    "Value" => value = Some(text),
                    _ => {}
                }
            }

            let name = name.ok_or_else(|| DecodeError::missing_attr("Member", "Name"))?;
            enum_type.members.push(RawMember { name, value });
        }
        Ok(Child::Skip)
    })?;

    Ok(enum_type)
}

/// Parses an `EntityContainer` element and its entity sets.
fn parse_entity_container(
    reader: &mut XmlReader<'_>,
    e: &BytesStart<'_>,
    has_children: bool,
) -> Result<RawEntityContainer, DecodeError> {
    let mut container = RawEntityContainer {
        name: required_attr(e, reader.decoder(), "EntityContainer", "Name")?,
        entity_sets: Vec::new(),
    };

    if !has_children {
        return Ok(container);
    }

    for_each_child(reader, "EntityContainer", |reader, e, _| {
        if local_name(e)? == "EntitySet" {
            let decoder = reader.decoder();
            container.entity_sets.push(RawEntitySet {
                name: required_attr(e, decoder, "EntitySet", "Name")?,
                entity_type: required_attr(e, decoder, "EntitySet", "EntityType")?,
            });
        }
        // Navigation bindings and annotations are not modeled
        Ok(Child::Skip)
    })?;

    Ok(container)
}

/// Feeds every direct child element to `visit` until the parent closes.
fn for_each_child<F>(
    reader: &mut XmlReader<'_>,
    element: &str,
    mut visit: F,
) -> Result<(), DecodeError>
where
    F: FnMut(&mut XmlReader<'_>, &BytesStart<'_>, bool) -> Result<Child, DecodeError>,
{
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                if let Child::Skip = visit(&mut *reader, e, true)? {
                    skip_element(reader, &local_name(e)?)?;
                }
            }
            Event::Empty(ref e) => {
                visit(&mut *reader, e, false)?;
            }
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(DecodeError::unexpected_eof(element)),
            _ => {}
        }
        buf.clear();
    }
}

/// Skips to the end of the current element.
fn skip_element(reader: &mut XmlReader<'_>, element: &str) -> Result<(), DecodeError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(DecodeError::unexpected_eof(element)),
            _ => {}
        }
        buf.clear();
    }
}

/// Returns the element name without its namespace prefix.
fn local_name(e: &BytesStart<'_>) -> Result<String, DecodeError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

/// Reads an attribute value with character and entity references resolved.
fn attr_value(attr: &Attribute<'_>, decoder: Decoder) -> Result<String, DecodeError> {
    Ok(attr.decode_and_unescape_value(decoder)?.into_owned())
}

/// Reads an attribute that must be present.
fn required_attr(
    e: &BytesStart<'_>,
    decoder: Decoder,
    element: &str,
    attribute: &str,
) -> Result<String, DecodeError> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == attribute.as_bytes() {
            return attr_value(&attr, decoder);
        }
    }
    Err(DecodeError::missing_attr(element, attribute))
}
