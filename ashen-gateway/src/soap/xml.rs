//! Tolerant XML element tree
//!
//! SOAP responses are read into a small owned tree keyed by local element
//! names (namespace prefixes are dropped, undeclared prefixes are fine).
//! Reading never fails: unclosed or misnested elements are kept but marked
//! incomplete, and a reader error simply ends the document at that point.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

/// One element of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Local name (`soap:Fault` -> `Fault`)
    pub name: String,
    /// Concatenated, unescaped direct text content
    pub text: String,
    pub children: Vec<XmlNode>,
    /// False when the closing tag was never seen
    pub complete: bool,
}

impl XmlNode {
    fn open(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
            complete: false,
        }
    }

    /// First direct child with the given local name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Trimmed text of a direct child, `None` if absent or blank
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
    }

    /// Depth-first search below this node (excluding itself)
    pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.find_all(name, out);
        }
    }
}

/// A parsed document: zero or more top-level elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDocument {
    pub roots: Vec<XmlNode>,
}

impl XmlDocument {
    /// Every element with the given local name, in document order
    pub fn find_all(&self, name: &str) -> Vec<&XmlNode> {
        let mut out = Vec::new();
        for root in &self.roots {
            if root.name == name {
                out.push(root);
            }
            root.find_all(name, &mut out);
        }
        out
    }

    /// First element with the given local name
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.find_all(name).into_iter().next()
    }
}

/// Read `input` into a tree, best effort
pub fn parse(input: &str) -> XmlDocument {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut roots: Vec<XmlNode> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(XmlNode::open(name));
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let mut node = XmlNode::open(name);
                node.complete = true;
                attach(&mut stack, &mut roots, node);
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                close(&mut stack, &mut roots, &name);
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    match t.unescape() {
                        Ok(text) => top.text.push_str(&text),
                        Err(_) => top.text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(
                    "XML read stopped at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
        }
    }

    // Whatever is still open was truncated
    while let Some(node) = stack.pop() {
        attach(&mut stack, &mut roots, node);
    }

    XmlDocument { roots }
}

fn attach(stack: &mut [XmlNode], roots: &mut Vec<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Close the innermost open element named `name`
///
/// Elements opened after it are closed implicitly and stay incomplete.
/// A stray end tag with no matching open element is ignored.
fn close(stack: &mut Vec<XmlNode>, roots: &mut Vec<XmlNode>, name: &str) {
    let Some(pos) = stack.iter().rposition(|n| n.name == name) else {
        return;
    };

    while stack.len() > pos + 1 {
        if let Some(orphan) = stack.pop() {
            attach(stack, roots, orphan);
        }
    }

    if let Some(mut node) = stack.pop() {
        node.complete = true;
        attach(stack, roots, node);
    }
}
