//! The `roxmltree`-backed document and the sources a transform can read it from.

use log::debug;
use roxmltree::{Node, ParsingOptions};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use xmlmap_xpath1::{DataSourceNode, NodeType, QName, XML_NAMESPACE};

/// Wrapper around roxmltree::Document providing data source capabilities
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, roxmltree::Error> {
        // OAI-PMH feeds and similar exports often carry a DOCTYPE.
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        debug!("Parsed XML document ({} bytes)", text.len());
        Ok(Self { doc })
    }

    pub fn root_node(&self) -> XmlNode<'_, 'input> {
        XmlNode::Node(self.doc.root())
    }
}

/// Where the document of a transform comes from. Files and strings are parsed when
/// the transform runs.
#[derive(Clone)]
pub enum DocumentSource<'d> {
    File(PathBuf),
    Text(Cow<'d, str>),
    Document(&'d XmlDocument<'d>),
}

impl std::fmt::Debug for DocumentSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSource::File(path) => f.debug_tuple("File").field(path).finish(),
            DocumentSource::Text(text) => write!(f, "Text({} bytes)", text.len()),
            DocumentSource::Document(_) => f.write_str("Document"),
        }
    }
}

/// A node of the parsed tree. roxmltree keeps attributes as data on their element, so
/// an attribute is addressed by its owner and index.
#[derive(Debug, Clone, Copy)]
pub enum XmlNode<'a, 'input> {
    /// Root, element, text, comment or processing instruction
    Node(Node<'a, 'input>),
    Attribute {
        owner: Node<'a, 'input>,
        index: usize,
    },
}

impl<'a, 'input> XmlNode<'a, 'input> {
    /// The element or other tree node, `None` for attributes.
    pub fn inner(&self) -> Option<Node<'a, 'input>> {
        match self {
            XmlNode::Node(node) => Some(*node),
            XmlNode::Attribute { .. } => None,
        }
    }

    /// Sort key in document order: a node, then its attributes, then its children.
    fn order_key(&self) -> (usize, usize) {
        match self {
            XmlNode::Node(node) => (node.id().get() as usize, 0),
            XmlNode::Attribute { owner, index } => (owner.id().get() as usize, index + 1),
        }
    }
}

impl PartialEq for XmlNode<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        self.order_key() == other.order_key()
    }
}

impl Eq for XmlNode<'_, '_> {}

impl PartialOrd for XmlNode<'_, '_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// roxmltree allocates node ids in document order, so an attribute sorts between its
// owner and the owner's first child.
impl Ord for XmlNode<'_, '_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl Hash for XmlNode<'_, '_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_key().hash(state);
    }
}

impl<'a> DataSourceNode<'a> for XmlNode<'a, 'a> {
    fn node_type(&self) -> NodeType {
        match self {
            XmlNode::Node(node) => {
                if node.is_root() {
                    NodeType::Root
                } else if node.is_element() {
                    NodeType::Element
                } else if node.is_text() {
                    NodeType::Text
                } else if node.is_comment() {
                    NodeType::Comment
                } else {
                    NodeType::ProcessingInstruction
                }
            }
            XmlNode::Attribute { .. } => NodeType::Attribute,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        match self {
            XmlNode::Node(node) if node.is_element() => {
                let tag = node.tag_name();
                let namespace = tag.namespace();
                Some(QName {
                    namespace,
                    prefix: namespace
                        .and_then(|uri| node.lookup_prefix(uri))
                        .filter(|p| !p.is_empty()),
                    local_part: tag.name(),
                })
            }
            XmlNode::Node(node) => node.pi().map(|pi| QName::local(pi.target)),
            XmlNode::Attribute { owner, index } => {
                owner.attributes().nth(*index).map(|attr| {
                    let namespace = attr.namespace();
                    let prefix = match namespace {
                        Some(XML_NAMESPACE) => Some("xml"),
                        Some(uri) => owner.lookup_prefix(uri),
                        None => None,
                    };
                    QName {
                        namespace,
                        prefix,
                        local_part: attr.name(),
                    }
                })
            }
        }
    }

    fn string_value(&self) -> String {
        match self {
            XmlNode::Node(node) => {
                if node.is_element() || node.is_root() {
                    node.descendants()
                        .filter(|n| n.is_text())
                        .filter_map(|n| n.text())
                        .collect()
                } else if node.is_pi() {
                    node.pi()
                        .and_then(|pi| pi.value)
                        .unwrap_or_default()
                        .to_string()
                } else {
                    node.text().unwrap_or_default().to_string()
                }
            }
            XmlNode::Attribute { owner, index } => owner
                .attributes()
                .nth(*index)
                .map(|attr| attr.value().to_string())
                .unwrap_or_default(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Node(node) if node.is_element() => {
                let owner = *node;
                let count = node.attributes().len();
                Box::new((0..count).map(move |index| XmlNode::Attribute { owner, index }))
            }
            _ => Box::new(std::iter::empty()),
        }
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        match self {
            XmlNode::Node(node) => Box::new(node.children().map(XmlNode::Node)),
            XmlNode::Attribute { .. } => Box::new(std::iter::empty()),
        }
    }

    fn parent(&self) -> Option<Self> {
        match self {
            XmlNode::Node(node) => node.parent().map(XmlNode::Node),
            XmlNode::Attribute { owner, .. } => Some(XmlNode::Node(*owner)),
        }
    }
}
