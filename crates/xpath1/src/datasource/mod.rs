//! Defines the core abstraction for a navigable, read-only data source tree.
use std::hash::Hash;

/// An expanded name: the namespace URI (if any), the local part, and the prefix the
/// document used for it, which is only needed for `name()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub namespace: Option<&'a str>,
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

impl<'a> QName<'a> {
    pub fn local(local_part: &'a str) -> Self {
        QName {
            namespace: None,
            prefix: None,
            local_part,
        }
    }

    /// Checks the expanded name, ignoring the prefix.
    pub fn matches(&self, namespace: Option<&str>, local_part: &str) -> bool {
        self.namespace == namespace && self.local_part == local_part
    }
}

/// The type of a node in the data source tree, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// The contract for a node in a read-only, hierarchical data source.
///
/// The evaluator is written exclusively against this trait. `Ord` must follow
/// document order: node-sets are sorted with it after every step.
///
/// `'a` is the lifetime of the underlying data source (e.g., the XML string).
pub trait DataSourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    fn node_type(&self) -> NodeType;

    /// The expanded name of an element or attribute, or the target of a processing
    /// instruction. `None` for root, text and comment nodes.
    fn name(&self) -> Option<QName<'a>>;

    /// The string value of the node, as defined by the XPath 1.0 `string()` function.
    /// - For a text node, this is its content.
    /// - For an element or the root, this is the concatenation of all descendant text.
    /// - For an attribute, this is its value.
    /// - For a comment or processing instruction, this is its content.
    fn string_value(&self) -> String;

    /// Attribute nodes of an element; empty for every other node type.
    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// Child nodes in document order; empty for leaf nodes (text, attributes).
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// The parent node. The parent of an attribute is its owning element; the root has none.
    fn parent(&self) -> Option<Self>;
}

/// An in-memory tree for exercising the engine without an XML parser.
pub mod mock {
    use super::*;
    use std::cmp::Ordering;
    use std::hash::Hasher;

    #[derive(Debug, Clone)]
    struct MockNodeData {
        node_type: NodeType,
        namespace: Option<String>,
        prefix: Option<String>,
        local_part: Option<String>,
        value: String,
        children: Vec<usize>,
        attributes: Vec<usize>,
        parent: Option<usize>,
    }

    /// Node ids are allocated in creation order, so a tree built top-down in document
    /// order gets document-ordered ids for free.
    #[derive(Debug)]
    pub struct MockTree {
        nodes: Vec<MockNodeData>,
    }

    #[derive(Debug, Clone, Copy)]
    pub struct MockNode<'a> {
        pub id: usize,
        pub tree: &'a MockTree,
    }

    impl Default for MockTree {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockTree {
        pub const ROOT: usize = 0;

        pub fn new() -> Self {
            MockTree {
                nodes: vec![MockNodeData {
                    node_type: NodeType::Root,
                    namespace: None,
                    prefix: None,
                    local_part: None,
                    value: String::new(),
                    children: vec![],
                    attributes: vec![],
                    parent: None,
                }],
            }
        }

        pub fn node(&self, id: usize) -> MockNode<'_> {
            MockNode { id, tree: self }
        }

        pub fn root(&self) -> MockNode<'_> {
            self.node(Self::ROOT)
        }

        /// Adds an element; `name` may be `prefix:local` when `namespace` is given.
        pub fn element(&mut self, parent: usize, namespace: Option<&str>, name: &str) -> usize {
            let (prefix, local) = split_name(name);
            let id = self.push(parent, NodeType::Element, namespace, prefix, Some(local), "");
            self.nodes[parent].children.push(id);
            id
        }

        pub fn attribute(
            &mut self,
            parent: usize,
            namespace: Option<&str>,
            name: &str,
            value: &str,
        ) -> usize {
            let (prefix, local) = split_name(name);
            let id = self.push(parent, NodeType::Attribute, namespace, prefix, Some(local), value);
            self.nodes[parent].attributes.push(id);
            id
        }

        pub fn text(&mut self, parent: usize, value: &str) -> usize {
            let id = self.push(parent, NodeType::Text, None, None, None, value);
            self.nodes[parent].children.push(id);
            id
        }

        pub fn comment(&mut self, parent: usize, value: &str) -> usize {
            let id = self.push(parent, NodeType::Comment, None, None, None, value);
            self.nodes[parent].children.push(id);
            id
        }

        pub fn processing_instruction(&mut self, parent: usize, target: &str, value: &str) -> usize {
            let id = self.push(
                parent,
                NodeType::ProcessingInstruction,
                None,
                None,
                Some(target),
                value,
            );
            self.nodes[parent].children.push(id);
            id
        }

        fn push(
            &mut self,
            parent: usize,
            node_type: NodeType,
            namespace: Option<&str>,
            prefix: Option<&str>,
            local_part: Option<&str>,
            value: &str,
        ) -> usize {
            self.nodes.push(MockNodeData {
                node_type,
                namespace: namespace.map(str::to_string),
                prefix: prefix.map(str::to_string),
                local_part: local_part.map(str::to_string),
                value: value.to_string(),
                children: vec![],
                attributes: vec![],
                parent: Some(parent),
            });
            self.nodes.len() - 1
        }
    }

    fn split_name(name: &str) -> (Option<&str>, &str) {
        match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, name),
        }
    }

    impl PartialEq for MockNode<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }
    impl Eq for MockNode<'_> {}

    impl PartialOrd for MockNode<'_> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for MockNode<'_> {
        fn cmp(&self, other: &Self) -> Ordering {
            self.id.cmp(&other.id)
        }
    }

    impl Hash for MockNode<'_> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl<'a> DataSourceNode<'a> for MockNode<'a> {
        fn node_type(&self) -> NodeType {
            self.tree.nodes[self.id].node_type
        }

        fn name(&self) -> Option<QName<'a>> {
            let tree = self.tree; // Re-borrow so the name lives as long as the tree
            let data = &tree.nodes[self.id];
            data.local_part.as_deref().map(|local_part| QName {
                namespace: data.namespace.as_deref(),
                prefix: data.prefix.as_deref(),
                local_part,
            })
        }

        fn string_value(&self) -> String {
            match self.node_type() {
                NodeType::Root | NodeType::Element => {
                    let mut out = String::new();
                    let mut stack: Vec<MockNode<'a>> = self.children().collect();
                    stack.reverse();
                    while let Some(node) = stack.pop() {
                        if node.node_type() == NodeType::Text {
                            out.push_str(&self.tree.nodes[node.id].value);
                        }
                        let mut children: Vec<_> = node.children().collect();
                        children.reverse();
                        stack.extend(children);
                    }
                    out
                }
                _ => self.tree.nodes[self.id].value.clone(),
            }
        }

        fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .attributes
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .children
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn parent(&self) -> Option<Self> {
            self.tree.nodes[self.id].parent.map(|id| MockNode {
                id,
                tree: self.tree,
            })
        }
    }

    /// Namespace of the `x:` elements in [`create_test_tree`].
    pub const TEST_NS: &str = "urn:test";

    /// Creates a small tree for testing:
    /// ```text
    /// <root>                                  <!-- id 0 -->
    ///   <list>                                <!-- id 1 -->
    ///     <para id="p1" xml:lang="en">Hello</para>  <!-- id 2, attrs 3 & 4, text 5 -->
    ///     <!-- note -->                       <!-- id 6 -->
    ///     <x:item xmlns:x="urn:test" code="7">World</x:item>  <!-- id 7, attr 8, text 9 -->
    ///     <?pi-target pi-value?>              <!-- id 10 -->
    ///     <para>Again</para>                  <!-- id 11, text 12 -->
    ///   </list>
    /// </root>
    /// ```
    pub fn create_test_tree() -> MockTree {
        let mut tree = MockTree::new();
        let list = tree.element(MockTree::ROOT, None, "list");
        let para = tree.element(list, None, "para");
        tree.attribute(para, None, "id", "p1");
        tree.attribute(
            para,
            Some(crate::namespaces::XML_NAMESPACE),
            "xml:lang",
            "en",
        );
        tree.text(para, "Hello");
        tree.comment(list, " note ");
        let item = tree.element(list, Some(TEST_NS), "x:item");
        tree.attribute(item, None, "code", "7");
        tree.text(item, "World");
        tree.processing_instruction(list, "pi-target", "pi-value");
        let para2 = tree.element(list, None, "para");
        tree.text(para2, "Again");
        tree
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_tree_ids_follow_document_order() {
            let tree = create_test_tree();
            let list = tree.node(1);
            let children: Vec<usize> = list.children().map(|n| n.id).collect();
            assert_eq!(children, vec![2, 6, 7, 10, 11]);
            assert_eq!(tree.node(8).parent(), Some(tree.node(7)));
        }

        #[test]
        fn test_string_values() {
            let tree = create_test_tree();
            assert_eq!(tree.root().string_value(), "HelloWorldAgain");
            assert_eq!(tree.node(3).string_value(), "p1");
            assert_eq!(tree.node(6).string_value(), " note ");
        }

        #[test]
        fn test_names() {
            let tree = create_test_tree();
            let item = tree.node(7).name().unwrap();
            assert!(item.matches(Some(TEST_NS), "item"));
            assert_eq!(item.prefix, Some("x"));
            assert_eq!(tree.node(5).name(), None);
        }
    }
}
