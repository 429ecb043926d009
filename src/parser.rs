//! XML parsing into the ordered [`Document`] tree.
//!
//! The parser drives quick-xml's streaming reader and builds the tree with an
//! explicit element stack. It never recovers from malformed input: the first
//! problem aborts the parse with a [`ParseError`].
//!
//! # Examples
//!
//! ```
//! use xmlcmp_rs::parser::parse_xml;
//!
//! let doc = parse_xml(r#"<root id="7"><name>Bob</name></root>"#).unwrap();
//! assert_eq!(doc.root.name, "root");
//! assert_eq!(doc.root.attributes.get("id").map(String::as_str), Some("7"));
//! ```

use crate::error::ParseError;
use crate::tree::{Document, Element, Node};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Parser behaviour, fixed for the lifetime of an [`XmlParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Trim text payloads and drop whitespace-only text.
    pub trim_text: bool,
    /// Keep CDATA sections as text. When false they are skipped.
    pub include_cdata: bool,
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            trim_text: true,
            include_cdata: true,
            max_depth: 512,
        }
    }
}

/// Builds [`Document`] trees from XML text.
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    options: ParserOptions,
}

/// Mutable state of one parse.
struct TreeBuilder<'o> {
    options: &'o ParserOptions,
    stack: Vec<Element>,
    root: Option<Element>,
    pending_text: Option<String>,
}

impl XmlParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<Document, ParseError> {
        let mut reader = Reader::from_str(xml);
        // Whitespace handling happens in TreeBuilder::flush_text.
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        reader.config_mut().check_end_names = true;

        let mut builder = TreeBuilder::new(&self.options);

        loop {
            let event = reader
                .read_event()
                .map_err(|e| syntax_error(&reader, e))?;

            match event {
                Event::Start(ref e) => {
                    builder.flush_text()?;
                    let element = parse_element(e, &reader)?;
                    builder.open(element)?;
                }
                Event::End(_) => {
                    builder.flush_text()?;
                    builder
                        .close()
                        .map_err(|message| ParseError::syntax(message, reader.buffer_position()))?;
                }
                Event::Empty(ref e) => {
                    builder.flush_text()?;
                    let element = parse_element(e, &reader)?;
                    builder.open(element)?;
                    builder
                        .close()
                        .map_err(|message| ParseError::syntax(message, reader.buffer_position()))?;
                }
                Event::Text(e) => {
                    let raw = std::str::from_utf8(e.as_ref())
                        .map_err(|e| syntax_error(&reader, e))?;
                    let text = unescape(raw).map_err(|e| syntax_error(&reader, e))?;
                    check_chars(&text, &reader)?;
                    builder.push_text(&text);
                }
                Event::CData(e) => {
                    if self.options.include_cdata {
                        let text = std::str::from_utf8(e.as_ref())
                            .map_err(|e| syntax_error(&reader, e))?;
                        check_chars(text, &reader)?;
                        builder.push_text(text);
                    }
                }
                Event::GeneralRef(e) => {
                    if let Some(ch) = e.resolve_char_ref().map_err(|e| syntax_error(&reader, e))? {
                        let text = ch.encode_utf8(&mut [0u8; 4]).to_string();
                        check_chars(&text, &reader)?;
                        builder.push_text(&text);
                    } else {
                        let name = e.decode().map_err(|e| syntax_error(&reader, e))?;
                        let resolved = resolve_predefined_entity(&name).ok_or_else(|| {
                            ParseError::syntax(
                                format!("unknown entity &{};", name),
                                reader.buffer_position(),
                            )
                        })?;
                        builder.push_text(resolved);
                    }
                }
                Event::Eof => break,
                // Comments, declarations, processing instructions, DOCTYPE
                _ => {}
            }
        }

        builder.finish(reader.buffer_position())
    }

    /// Parses XML from a file.
    pub fn parse_file(&self, path: &Path) -> Result<Document, ParseError> {
        if !path.exists() {
            return Err(ParseError::file_not_found(
                path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ParseError::read_error(path.to_string_lossy().to_string(), &e))?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "parsing XML file");
        self.parse_str(&content)
    }
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParserOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            root: None,
            pending_text: None,
        }
    }

    fn open(&mut self, element: Element) -> Result<(), ParseError> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(ParseError::MultipleRoots { name: element.name });
        }
        if self.stack.len() >= self.options.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        self.stack.push(element);
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        let element = self
            .stack
            .pop()
            .ok_or_else(|| "closing tag without a matching opening tag".to_string())?;
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => self.root = Some(element),
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        match self.pending_text.as_mut() {
            Some(pending) => pending.push_str(text),
            None => self.pending_text = Some(text.to_string()),
        }
    }

    fn flush_text(&mut self) -> Result<(), ParseError> {
        let Some(text) = self.pending_text.take() else {
            return Ok(());
        };

        let text = if self.options.trim_text {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(());
            }
            trimmed.to_string()
        } else {
            text
        };

        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(Node::Text(text));
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(ParseError::TextOutsideRoot { text }),
        }
    }

    fn finish(mut self, position: u64) -> Result<Document, ParseError> {
        self.flush_text()?;
        if let Some(open) = self.stack.last() {
            return Err(ParseError::syntax(
                format!("unclosed tag <{}>", open.name),
                position,
            ));
        }
        self.root.map(Document::new).ok_or(ParseError::Empty)
    }
}

/// Parses an element's name and attributes.
fn parse_element(e: &BytesStart, reader: &Reader<&[u8]>) -> Result<Element, ParseError> {
    let name = reader
        .decoder()
        .decode(e.name().as_ref())
        .map_err(|err| syntax_error(reader, err))?
        .to_string();

    let mut element = Element::new(name);
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|err| syntax_error(reader, err))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|err| syntax_error(reader, err))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| syntax_error(reader, err))?
            .to_string();
        check_chars(&value, reader)?;
        element.attributes.insert(key, value);
    }

    Ok(element)
}

/// XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn check_chars(text: &str, reader: &Reader<&[u8]>) -> Result<(), ParseError> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(ParseError::syntax(
            format!("invalid character U+{:04X} in character data", c as u32),
            reader.buffer_position(),
        )),
        None => Ok(()),
    }
}

fn syntax_error(reader: &Reader<&[u8]>, err: impl Display) -> ParseError {
    ParseError::syntax(err.to_string(), reader.error_position())
}

/// Parses a string with default [`ParserOptions`].
pub fn parse_xml(xml: &str) -> Result<Document, ParseError> {
    XmlParser::default().parse_str(xml)
}

/// Parses a file with default [`ParserOptions`].
pub fn parse_xml_file(path: &Path) -> Result<Document, ParseError> {
    XmlParser::default().parse_file(path)
}
