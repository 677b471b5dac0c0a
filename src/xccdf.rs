//! XCCDF benchmark document parsing.
//!
//! Transforms a DISA-format STIG benchmark document into the entity graph
//! in [`crate::domain`]: a single top-down pass over the XML event
//! stream, with one sub-parser per recognized node kind. The grammar
//! inside a `Rule` element is strict; an unrecognized child aborts the
//! enclosing group rather than producing a partial result.

use std::{fs, io, path::Path};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use tracing::debug;

use crate::domain::{Check, Fix, FixText, Group, Identifier, Reference, Rule};

/// A parsed benchmark document: the ordered sequence of checklist groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Benchmark {
    groups: Vec<Group>,
}

impl Benchmark {
    /// Reads and parses a benchmark document from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content does
    /// not conform to the benchmark grammar.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text)?)
    }

    /// Parses a benchmark document from its XML text.
    ///
    /// Groups are recognized anywhere in the document and returned in
    /// document order. The input is never mutated; parsing builds the
    /// entity graph and nothing else.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or a group subtree
    /// violates the benchmark grammar. There is no partial recovery: a
    /// single malformed rule fails the whole document.
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut groups = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(element) if element.name().as_ref() == b"Group" => {
                    groups.push(parse_group(&mut reader, &element)?);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        debug!(groups = groups.len(), "parsed benchmark document");
        Ok(Self { groups })
    }

    /// The checklist groups, in document order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Consumes the benchmark, returning its groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

/// Errors that can occur when loading a benchmark document from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The document content could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors that can occur while parsing a benchmark document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A rule contained a child element outside the fixed grammar.
    #[error("unrecognized node '{0}' in rule")]
    UnrecognizedNode(String),

    /// A rule was missing one of its required components.
    #[error("rule '{rule}' is missing its '{element}' element")]
    MissingElement {
        /// Identifier of the offending rule.
        rule: String,
        /// Name of the element the grammar requires.
        element: &'static str,
    },

    /// The document ended inside an unclosed element.
    #[error("unexpected end of document")]
    UnexpectedEof,

    /// The document is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}

/// Returns the value of the named attribute, if present.
///
/// Attribute values are taken as-is; the identifiers and references
/// carried in benchmark attributes do not use character entities.
fn attr(element: &BytesStart, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.into_inner() == name)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Reads the inline text content of the element that just started.
fn text(reader: &mut Reader<&[u8]>, element: &BytesStart) -> Result<String, ParseError> {
    Ok(reader.read_text(element.name())?.into_owned())
}

fn node_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

/// Parses a `Group` element: its `id` attribute plus `title`,
/// `description`, and `Rule` children.
///
/// Children outside that set are skipped wholesale; group elements in the
/// wild carry bookkeeping nodes that are irrelevant to the checklist
/// model.
fn parse_group(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Group, ParseError> {
    let mut group = Group::new(attr(start, b"id").unwrap_or_default(), None, None);

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.name().as_ref() {
                b"title" => group.title = Some(text(reader, &element)?),
                b"description" => group.description = Some(text(reader, &element)?),
                b"Rule" => {
                    let rule = parse_rule(reader, &element)?;
                    group.add_rule(rule);
                }
                _ => {
                    reader.read_to_end(element.name())?;
                }
            },
            Event::Empty(element) => match element.name().as_ref() {
                b"title" => group.title = Some(String::new()),
                b"description" => group.description = Some(String::new()),
                b"Rule" => {
                    return Err(ParseError::MissingElement {
                        rule: attr(&element, b"id").unwrap_or_default(),
                        element: "reference",
                    });
                }
                _ => {}
            },
            Event::End(element) if element.name() == start.name() => break,
            Event::Eof => return Err(ParseError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(group)
}

/// Parses a `Rule` element.
///
/// The child grammar is strict: `version`, `title`, `description`,
/// `reference`, `ident`, `fixtext`, `fix`, and repeatable `check` are the
/// only labels admitted. Anything else is a schema violation.
fn parse_rule(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Rule, ParseError> {
    let id = attr(start, b"id").unwrap_or_default();
    let severity = attr(start, b"severity");
    let weight = attr(start, b"weight");

    let mut version = None;
    let mut title = None;
    let mut description = None;
    let mut reference = None;
    let mut identifier = None;
    let mut fix_text = None;
    let mut fix = None;
    let mut checks = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.name().as_ref() {
                b"version" => version = Some(text(reader, &element)?),
                b"title" => title = Some(text(reader, &element)?),
                b"description" => description = Some(text(reader, &element)?),
                b"reference" => reference = Some(parse_reference(reader, &element)?),
                b"ident" => identifier = Some(parse_ident(reader, &element)?),
                b"fixtext" => fix_text = Some(parse_fixtext(reader, &element)?),
                b"fix" => {
                    fix = Some(Fix {
                        fix_id: attr(&element, b"id"),
                    });
                    reader.read_to_end(element.name())?;
                }
                b"check" => checks.push(parse_check(reader, &element)?),
                _ => return Err(ParseError::UnrecognizedNode(node_name(&element))),
            },
            Event::Empty(element) => match element.name().as_ref() {
                b"version" => version = Some(String::new()),
                b"title" => title = Some(String::new()),
                b"description" => description = Some(String::new()),
                b"reference" => reference = Some(Reference::default()),
                b"ident" => {
                    identifier = Some(Identifier {
                        system: attr(&element, b"id"),
                        content: None,
                    });
                }
                b"fixtext" => {
                    fix_text = Some(FixText {
                        fix_ref: attr(&element, b"fixref"),
                        content: None,
                    });
                }
                b"fix" => {
                    fix = Some(Fix {
                        fix_id: attr(&element, b"id"),
                    });
                }
                b"check" => checks.push(Check {
                    system: attr(&element, b"system"),
                    ..Check::default()
                }),
                _ => return Err(ParseError::UnrecognizedNode(node_name(&element))),
            },
            Event::End(element) if element.name() == start.name() => break,
            Event::Eof => return Err(ParseError::UnexpectedEof),
            _ => {}
        }
    }

    let reference = reference.ok_or_else(|| ParseError::MissingElement {
        rule: id.clone(),
        element: "reference",
    })?;
    let fix_text = fix_text.ok_or_else(|| ParseError::MissingElement {
        rule: id.clone(),
        element: "fixtext",
    })?;
    let fix = fix.ok_or_else(|| ParseError::MissingElement {
        rule: id.clone(),
        element: "fix",
    })?;

    let mut rule = Rule::with_severity(id, reference, fix_text, fix, severity, weight);
    rule.version = version;
    rule.title = title;
    rule.description = description;
    rule.identifier = identifier;
    for check in checks {
        rule.add_check(check);
    }

    Ok(rule)
}

/// Parses a `reference` element: five optional Dublin Core children.
fn parse_reference(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Reference, ParseError> {
    let mut reference = Reference::default();

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.name().as_ref() {
                b"dc:title" => reference.title = Some(text(reader, &element)?),
                b"dc:publisher" => reference.publisher = Some(text(reader, &element)?),
                b"dc:type" => reference.kind = Some(text(reader, &element)?),
                b"dc:subject" => reference.subject = Some(text(reader, &element)?),
                b"dc:identifier" => reference.identifier = Some(text(reader, &element)?),
                _ => {
                    reader.read_to_end(element.name())?;
                }
            },
            Event::End(element) if element.name() == start.name() => break,
            Event::Eof => return Err(ParseError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(reference)
}

/// Parses an `ident` element: one attribute plus inline text content.
fn parse_ident(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Identifier, ParseError> {
    Ok(Identifier {
        system: attr(start, b"id"),
        content: Some(text(reader, start)?),
    })
}

/// Parses a `fixtext` element: a `fixref` attribute plus inline text.
fn parse_fixtext(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<FixText, ParseError> {
    Ok(FixText {
        fix_ref: attr(start, b"fixref"),
        content: Some(text(reader, start)?),
    })
}

/// Parses a `check` element: a `system` attribute plus an optional
/// content reference and optional inline content.
fn parse_check(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Check, ParseError> {
    let mut check = Check {
        system: attr(start, b"system"),
        ..Check::default()
    };

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.name().as_ref() {
                b"check-content-ref" => {
                    check.href = attr(&element, b"href");
                    check.name = attr(&element, b"name");
                    reader.read_to_end(element.name())?;
                }
                b"check-content" => check.content = Some(text(reader, &element)?),
                _ => {
                    reader.read_to_end(element.name())?;
                }
            },
            Event::Empty(element) => {
                if element.name().as_ref() == b"check-content-ref" {
                    check.href = attr(&element, b"href");
                    check.name = attr(&element, b"name");
                }
            }
            Event::End(element) if element.name() == start.name() => break,
            Event::Eof => return Err(ParseError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(check)
}
