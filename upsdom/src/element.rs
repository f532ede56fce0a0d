use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::errors::DomError;
use crate::selector::Selector;

/// Opaque handle to an element in a [`Document`].
///
/// Handles stay valid until the node is removed; looking up a removed node
/// yields `None` rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u64);

#[derive(Clone, Debug)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) text: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct DocumentInner {
    pub(crate) nodes: HashMap<NodeId, ElementData>,
    next_id: u64,
    pub(crate) head: NodeId,
    pub(crate) body: NodeId,
}

impl DocumentInner {
    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, ElementData::new(tag));
        id
    }

    /// Children of `node`, in insertion order. Unknown nodes have none.
    fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    /// Walk the whole tree in document order (head first, then body).
    pub(crate) fn walk(&self, mut visit: impl FnMut(NodeId) -> bool) {
        let mut stack = vec![self.body, self.head];
        while let Some(node) = stack.pop() {
            if !visit(node) {
                return;
            }
            for child in self.children_of(node).iter().rev() {
                stack.push(*child);
            }
        }
    }
}

/// Shared handle over a document tree.
///
/// Cloning is cheap; all clones address the same tree. Interior locking
/// keeps the tree consistent when the polling threads and user-interaction
/// callbacks touch it concurrently.
#[derive(Clone, Debug)]
pub struct Document {
    inner: Arc<Mutex<DocumentInner>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the `head` and `body` roots.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId(0), ElementData::new("head"));
        nodes.insert(NodeId(1), ElementData::new("body"));
        Self {
            inner: Arc::new(Mutex::new(DocumentInner {
                nodes,
                next_id: 2,
                head: NodeId(0),
                body: NodeId(1),
            })),
        }
    }

    pub fn head(&self) -> NodeId {
        self.inner.lock().unwrap().head
    }

    pub fn body(&self) -> NodeId {
        self.inner.lock().unwrap().body
    }

    /// Create a detached element. It becomes visible to queries once
    /// appended below one of the roots.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner.lock().unwrap().alloc(tag)
    }

    pub fn set_id(&self, node: NodeId, id: &str) {
        if let Some(data) = self.inner.lock().unwrap().nodes.get_mut(&node) {
            data.id = Some(id.to_string());
        }
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        if let Some(data) = self.inner.lock().unwrap().nodes.get_mut(&node) {
            let class = class.to_string();
            if !data.classes.contains(&class) {
                data.classes.push(class);
            }
        }
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.inner.lock().unwrap().nodes.get_mut(&node) {
            data.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(&node)
            .and_then(|data| data.attrs.get(name).cloned())
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        if let Some(data) = self.inner.lock().unwrap().nodes.get_mut(&node) {
            data.text = text.to_string();
        }
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(&node)
            .map(|data| data.text.clone())
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .nodes
            .get(&node)
            .map(|data| data.tag.clone())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.lock().unwrap().nodes.contains_key(&node)
    }

    /// Attach `child` below `parent`.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.nodes.contains_key(&parent) {
            return Err(DomError::UnknownNode(parent));
        }
        match inner.nodes.get(&child) {
            None => return Err(DomError::UnknownNode(child)),
            Some(data) if data.parent.is_some() => {
                return Err(DomError::AlreadyAttached(child));
            }
            Some(_) => {}
        }
        if let Some(data) = inner.nodes.get_mut(&child) {
            data.parent = Some(parent);
        }
        if let Some(data) = inner.nodes.get_mut(&parent) {
            data.children.push(child);
        }
        Ok(())
    }

    /// Remove a node and its whole subtree. Returns false when the node was
    /// already gone; removing twice is not an error.
    pub fn remove(&self, node: NodeId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if node == inner.head || node == inner.body {
            return false;
        }
        if !inner.nodes.contains_key(&node) {
            return false;
        }

        if let Some(parent) = inner.nodes.get(&node).and_then(|data| data.parent) {
            if let Some(parent_data) = inner.nodes.get_mut(&parent) {
                parent_data.children.retain(|child| *child != node);
            }
        }

        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(data) = inner.nodes.remove(&current) {
                stack.extend(data.children);
            }
        }
        true
    }

    /// First element carrying this exact id, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let inner = self.inner.lock().unwrap();
        let mut found = None;
        inner.walk(|node| {
            if inner
                .nodes
                .get(&node)
                .is_some_and(|data| data.id.as_deref() == Some(id))
            {
                found = Some(node);
                return false;
            }
            true
        });
        found
    }

    /// First element matching the selector, in document order.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let parsed = Selector::parse(selector)?;
        let inner = self.inner.lock().unwrap();
        let mut found = None;
        inner.walk(|node| {
            if parsed.matches(&inner, node) {
                found = Some(node);
                return false;
            }
            true
        });
        Ok(found)
    }

    /// Every element matching the selector, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let parsed = Selector::parse(selector)?;
        let inner = self.inner.lock().unwrap();
        let mut found = Vec::new();
        inner.walk(|node| {
            if parsed.matches(&inner, node) {
                found.push(node);
            }
            true
        });
        Ok(found)
    }

    /// Number of elements matching the selector.
    pub fn count_matches(&self, selector: &str) -> Result<usize, DomError> {
        Ok(self.query_selector_all(selector)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_roots() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.head()).as_deref(), Some("head"));
        assert_eq!(doc.tag(doc.body()).as_deref(), Some("body"));
    }

    #[test]
    fn test_append_and_lookup_by_id() {
        let doc = Document::new();
        let button = doc.create_element("button");
        doc.set_id(button, "myButton");

        // Detached nodes are invisible to queries.
        assert_eq!(doc.get_element_by_id("myButton"), None);

        doc.append_child(doc.body(), button).unwrap();
        assert_eq!(doc.get_element_by_id("myButton"), Some(button));
    }

    #[test]
    fn test_append_twice_is_rejected() {
        let doc = Document::new();
        let div = doc.create_element("div");
        doc.append_child(doc.body(), div).unwrap();
        assert!(matches!(
            doc.append_child(doc.head(), div),
            Err(DomError::AlreadyAttached(_))
        ));
    }

    #[test]
    fn test_remove_subtree() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.set_id(inner, "inner");
        doc.append_child(doc.body(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();

        assert!(doc.remove(outer));
        assert!(!doc.contains(outer));
        assert!(!doc.contains(inner));
        assert_eq!(doc.get_element_by_id("inner"), None);

        // Second removal is a no-op, not an error.
        assert!(!doc.remove(outer));
    }

    #[test]
    fn test_roots_cannot_be_removed() {
        let doc = Document::new();
        assert!(!doc.remove(doc.body()));
        assert!(doc.contains(doc.body()));
    }

    #[test]
    fn test_attrs_and_text() {
        let doc = Document::new();
        let button = doc.create_element("button");
        doc.set_attr(button, "type", "button");
        doc.set_text(button, "Click");
        assert_eq!(doc.attr(button, "type").as_deref(), Some("button"));
        assert_eq!(doc.attr(button, "title"), None);
        assert_eq!(doc.text(button).as_deref(), Some("Click"));
    }
}
