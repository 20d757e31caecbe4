use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::errors::{CiteGraphError, Result};
use crate::types::{CitationGraph, Edge, GraphNode};

const GEXF_NAMESPACE: &str = "http://gexf.net/1.2";

/// Node attributes declared in the `<attributes class="node">` block.
const NODE_ATTRIBUTES: &[&str] = &["title", "doi", "publish_time", "authors", "journal", "url"];

fn attribute_value<'n>(node: &'n GraphNode, name: &str) -> Option<&'n str> {
    match name {
        "title" => Some(node.title.as_str()),
        "doi" => node.doi.as_deref(),
        "publish_time" => node.publish_time.as_deref(),
        "authors" => node.authors.as_deref(),
        "journal" => node.journal.as_deref(),
        "url" => node.url.as_deref(),
        _ => None,
    }
}

fn set_attribute_value(node: &mut GraphNode, name: &str, value: String) {
    match name {
        "title" => node.title = value,
        "doi" => node.doi = Some(value),
        "publish_time" => node.publish_time = Some(value),
        "authors" => node.authors = Some(value),
        "journal" => node.journal = Some(value),
        "url" => node.url = Some(value),
        _ => {}
    }
}

fn format_error(message: String) -> CiteGraphError {
    CiteGraphError::GraphFormat { message }
}

/// Returns `true` for characters XML 1.0 allows in a document.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Drops characters that XML 1.0 forbids, such as stray C0 controls in
/// titles lifted from PDF extraction.
fn xml_safe(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Thin wrapper over the writer that routes failures into the crate error.
struct GexfWriter {
    inner: Writer<Vec<u8>>,
}

impl GexfWriter {
    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event)?;
        Ok(())
    }

    fn start(&mut self, tag: BytesStart<'_>) -> Result<()> {
        self.emit(Event::Start(tag))
    }

    fn empty(&mut self, tag: BytesStart<'_>) -> Result<()> {
        self.emit(Event::Empty(tag))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(BytesStart::new(name))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }
}

/// Formats the graph as a directed, static GEXF 1.2 document.
///
/// Each node carries its id, its title as label, and the metadata
/// attributes that are present. Edge ids are their position in the sorted
/// edge list. Characters not allowed in XML 1.0 are dropped from every
/// written value.
pub fn to_gexf(graph: &CitationGraph) -> Result<String> {
    let mut w = GexfWriter {
        inner: Writer::new_with_indent(Vec::new(), b' ', 2),
    };

    w.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("gexf");
    root.push_attribute(("xmlns", GEXF_NAMESPACE));
    root.push_attribute(("version", "1.2"));
    w.start(root)?;

    w.start(BytesStart::new("meta"))?;
    w.text_element("creator", concat!("citegraph ", env!("CARGO_PKG_VERSION")))?;
    w.text_element("description", "Paper citation graph")?;
    w.end("meta")?;

    let mut graph_tag = BytesStart::new("graph");
    graph_tag.push_attribute(("mode", "static"));
    graph_tag.push_attribute(("defaultedgetype", "directed"));
    w.start(graph_tag)?;

    let mut attributes = BytesStart::new("attributes");
    attributes.push_attribute(("class", "node"));
    w.start(attributes)?;
    for name in NODE_ATTRIBUTES {
        let mut attr = BytesStart::new("attribute");
        attr.push_attribute(("id", *name));
        attr.push_attribute(("title", *name));
        attr.push_attribute(("type", "string"));
        w.empty(attr)?;
    }
    w.end("attributes")?;

    w.start(BytesStart::new("nodes"))?;
    for node in &graph.nodes {
        let mut tag = BytesStart::new("node");
        tag.push_attribute(("id", xml_safe(&node.id).as_ref()));
        tag.push_attribute(("label", xml_safe(&node.label).as_ref()));
        w.start(tag)?;
        w.start(BytesStart::new("attvalues"))?;
        for name in NODE_ATTRIBUTES {
            if let Some(value) = attribute_value(node, name) {
                let mut attvalue = BytesStart::new("attvalue");
                attvalue.push_attribute(("for", *name));
                attvalue.push_attribute(("value", xml_safe(value).as_ref()));
                w.empty(attvalue)?;
            }
        }
        w.end("attvalues")?;
        w.end("node")?;
    }
    w.end("nodes")?;

    w.start(BytesStart::new("edges"))?;
    for (i, edge) in graph.edges.iter().enumerate() {
        let id = i.to_string();
        let mut tag = BytesStart::new("edge");
        tag.push_attribute(("id", id.as_str()));
        tag.push_attribute(("source", xml_safe(&edge.source).as_ref()));
        tag.push_attribute(("target", xml_safe(&edge.target).as_ref()));
        w.empty(tag)?;
    }
    w.end("edges")?;

    w.end("graph")?;
    w.end("gexf")?;

    String::from_utf8(w.inner.into_inner())
        .map_err(|e| format_error(format!("rendered GEXF is not UTF-8: {}", e)))
}

/// Collects the attributes of an element as `(name, unescaped value)` pairs.
fn attributes_of(tag: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn required(attrs: &[(String, String)], key: &str, element: &str) -> Result<String> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .ok_or_else(|| format_error(format!("<{}> without '{}' attribute", element, key)))
}

fn node_from_attributes(attrs: &[(String, String)]) -> Result<GraphNode> {
    let id = required(attrs, "id", "node")?;
    let label = attrs
        .iter()
        .find(|(k, _)| k == "label")
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| id.clone());
    Ok(GraphNode {
        id,
        title: label.clone(),
        label,
        doi: None,
        publish_time: None,
        authors: None,
        journal: None,
        url: None,
    })
}

/// Parses a GEXF document produced by [`to_gexf`].
///
/// Only nodes, their `attvalue`s for the known attributes, and edges are
/// read; everything else is ignored.
pub fn from_gexf(source: &str) -> Result<CitationGraph> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut graph = CitationGraph::default();
    let mut current: Option<GraphNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"node" => {
                current = Some(node_from_attributes(&attributes_of(e)?)?);
            }
            Event::Empty(ref e) if e.name().as_ref() == b"node" => {
                graph.nodes.push(node_from_attributes(&attributes_of(e)?)?);
            }
            Event::End(ref e) if e.name().as_ref() == b"node" => {
                if let Some(node) = current.take() {
                    graph.nodes.push(node);
                }
            }
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"attvalue" => {
                let attrs = attributes_of(e)?;
                if let Some(node) = current.as_mut() {
                    let name = required(&attrs, "for", "attvalue")?;
                    let value = required(&attrs, "value", "attvalue")?;
                    set_attribute_value(node, &name, value);
                }
            }
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"edge" => {
                let attrs = attributes_of(e)?;
                graph.edges.push(Edge::new(
                    required(&attrs, "source", "edge")?,
                    required(&attrs, "target", "edge")?,
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(format_error("unterminated <node> element".to_string()));
    }
    Ok(graph)
}
