//! In-memory element tree for one article metadata document.
//!
//! The tree is an arena: elements are stored in document order (pre-order),
//! so "every element named X in document order" is a linear filter and
//! element handles are just indices.

use crate::error::{ErrorKind, Result};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use std::borrow::Cow;
use std::io::BufRead;
use std::str::FromStr;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Attribute {
    /// Resolved namespace URI, `None` for unprefixed attributes.
    namespace: Option<String>,
    name: String,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    name: String,
    attributes: Vec<Attribute>,
    /// Direct text content; text inside child elements is not included.
    text: String,
    children: Vec<usize>,
}

/// A parsed article metadata document.
///
/// # Examples
///
/// ```
/// use oami_extract::ArticleDocument;
///
/// let xml = r#"<article xmlns:xlink="http://www.w3.org/1999/xlink">
///     <front><article-id pub-id-type="pmc">1234567</article-id></front>
///     <media mimetype="video" xlink:href="1.avi"/>
/// </article>"#;
/// let document: ArticleDocument = xml.parse().unwrap();
/// assert_eq!(document.root().name(), "article");
/// let media = document.descendants("media").next().unwrap();
/// assert_eq!(media.attr_ns("http://www.w3.org/1999/xlink", "href"), Some("1.avi"));
/// assert_eq!(media.attr("href"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDocument {
    source: Option<String>,
    nodes: Vec<Node>,
}

impl ArticleDocument {
    /// Parse a whole document from a buffered reader.
    ///
    /// The input must be well-formed XML with a single root element; DTD
    /// declarations are skipped, not loaded. Character data that fails to
    /// unescape (usually entities only the DTD defines) is kept verbatim.
    #[instrument(level = "trace", skip(reader))]
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut reader = NsReader::from_reader(reader);
        let mut buffer = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        loop {
            let event = match reader.read_event_into(&mut buffer) {
                Ok(event) => event,
                Err(quick_xml::Error::Io(_)) => exn::bail!(ErrorKind::Io),
                Err(e) => exn::bail!(ErrorKind::MalformedXml(format!("at byte {}: {e}", reader.error_position()))),
            };
            match event {
                Event::Start(start) => {
                    let index = Self::push(&reader, &mut nodes, &open, &start)?;
                    open.push(index);
                },
                Event::Empty(start) => {
                    Self::push(&reader, &mut nodes, &open, &start)?;
                },
                Event::End(_) => {
                    open.pop();
                },
                Event::Text(text) => {
                    if let Some(&index) = open.last() {
                        nodes[index].text.push_str(&unescape_text(&text));
                    }
                },
                Event::CData(data) => {
                    if let Some(&index) = open.last() {
                        nodes[index].text.push_str(&String::from_utf8_lossy(&data));
                    }
                },
                Event::Eof => break,
                // Declarations, DOCTYPE, comments and processing instructions.
                _ => {},
            }
            buffer.clear();
        }
        if !open.is_empty() {
            exn::bail!(ErrorKind::MalformedXml(format!("{} unclosed element(s) at end of document", open.len())));
        }
        if nodes.is_empty() {
            exn::bail!(ErrorKind::EmptyDocument);
        }
        Ok(Self { source: None, nodes })
    }

    /// Remember where the document came from (an archive member name), for
    /// diagnostics.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The document element.
    pub fn root(&self) -> Element<'_> {
        Element { document: self, index: 0 }
    }

    /// Every element named `name` (local name, any namespace), in document
    /// order, including the root.
    pub fn descendants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Element<'a>> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.name == name)
            .map(|(index, _)| Element { document: self, index })
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a successfully parsed document.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push<R>(reader: &NsReader<R>, nodes: &mut Vec<Node>, open: &[usize], start: &BytesStart<'_>) -> Result<usize> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| ErrorKind::MalformedXml(e.to_string()))?;
            // Namespace declarations are bookkeeping for the reader, not data.
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }
            let (namespace, local) = reader.resolve_attribute(attribute.key);
            let namespace = match namespace {
                ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
                ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
            };
            let value = match attribute.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attribute.value).into_owned(),
            };
            attributes.push(Attribute {
                namespace,
                name: String::from_utf8_lossy(local.as_ref()).into_owned(),
                value,
            });
        }
        let index = nodes.len();
        nodes.push(Node {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        });
        match open.last() {
            Some(&parent) => nodes[parent].children.push(index),
            // A second top-level element; XML allows exactly one.
            None if index > 0 => exn::bail!(ErrorKind::MalformedXml("multiple root elements".to_string())),
            None => {},
        }
        Ok(index)
    }
}

impl FromStr for ArticleDocument {
    type Err = crate::error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for ArticleDocument {
    type Error = crate::error::Error;
    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes)
    }
}

fn unescape_text<'a>(text: &'a BytesText<'_>) -> Cow<'a, str> {
    match text.unescape() {
        Ok(text) => text,
        Err(_) => String::from_utf8_lossy(text.as_ref()),
    }
}

/// A borrowed handle to one element of an [`ArticleDocument`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    document: &'a ArticleDocument,
    index: usize,
}

impl<'a> Element<'a> {
    fn node(&self) -> &'a Node {
        &self.document.nodes[self.index]
    }

    /// Local name of the element.
    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    /// Value of an attribute without a namespace.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node()
            .attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Value of an attribute in the namespace `namespace` (a URI, not a
    /// prefix).
    pub fn attr_ns(&self, namespace: &str, name: &str) -> Option<&'a str> {
        self.node()
            .attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Direct text content.
    pub fn text(&self) -> &'a str {
        &self.node().text
    }

    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let document = self.document;
        self.node().children.iter().map(move |&index| Element { document, index })
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<Element<'a>> {
        self.children().find(|child| child.name() == name)
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document) && self.index == other.index
    }
}
impl Eq for Element<'_> {}
