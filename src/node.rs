//! The Node arena (§3, §9).
//!
//! Nodes are stored by value in `Tree::arena` and referenced everywhere else — `parent`,
//! `children`, `optional_node_pairs`, `subtree_groups` — by the stable [NodeId] index rather than
//! by direct reference, so back-edges stay valid across `children` vector growth. This mirrors
//! this crate's existing [StreamPtr](crate::wrapper_index::StreamPtr)/[FltrPtr](crate::wrapper_index::FltrPtr)
//! newtype-index convention.

use crate::datatype::DataType;
use crate::error::PgError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// The tagged value a node carries. Replaces the source's overloaded `element` slot (a string, a
/// set, or a `§` sentinel) with an explicit variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Root,
    Fixed(Vec<u8>),
    List(Vec<Vec<u8>>),
    Variable,
}

impl Element {
    pub fn as_fixed(&self) -> Option<&[u8]> {
        match self {
            Element::Fixed(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Vec<u8>]> {
        match self {
            Element::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn sort_key(&self) -> &[u8] {
        match self {
            Element::Fixed(b) => b,
            Element::List(items) => items.first().map(|v| v.as_slice()).unwrap_or(&[]),
            Element::Root | Element::Variable => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub element: Element,
    pub is_list: bool,
    pub is_variable: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub occurrence: u64,
    pub ending_lines: u64,
    pub end: bool,
    pub datatype: BTreeSet<DataType>,
    pub theta1: f64,
    /// Assigned during emission; `0` until then.
    pub id: u64,
    pub ending_line_ids: Vec<u64>,
}

impl Node {
    pub fn root(occurrence: u64) -> Self {
        Self {
            element: Element::Root,
            is_list: false,
            is_variable: false,
            parent: None,
            children: Vec::new(),
            occurrence,
            ending_lines: 0,
            end: false,
            datatype: DataType::initial_set(),
            theta1: 0.0,
            id: 0,
            ending_line_ids: Vec::new(),
        }
    }

    pub fn fixed(element: Vec<u8>) -> Self {
        Self {
            element: Element::Fixed(element),
            is_list: false,
            is_variable: false,
            parent: None,
            children: Vec::new(),
            occurrence: 0,
            ending_lines: 0,
            end: false,
            datatype: DataType::initial_set(),
            theta1: 0.0,
            id: 0,
            ending_line_ids: Vec::new(),
        }
    }

    pub fn variable() -> Self {
        Self {
            element: Element::Variable,
            is_list: false,
            is_variable: true,
            parent: None,
            children: Vec::new(),
            occurrence: 0,
            ending_lines: 0,
            end: false,
            // Starts from the full candidate universe (not `initial_set`) so narrowing can retain
            // Hex/Base64/DateTime alongside String/Integer/Float/IpAddress; see `datatype::narrow`.
            datatype: DataType::full_set(),
            theta1: 0.0,
            id: 0,
            ending_line_ids: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An `(anchor, tail)` annotation: the path from `anchor` through `tail` (inclusive) is optional.
/// Stored at the tree level since it is a graph annotation, not an attribute of either endpoint.
pub type OptionalPair = (NodeId, NodeId);

/// The Node arena plus the graph-level annotations that must survive node relocation.
pub struct Tree {
    arena: Vec<Node>,
    pub root: NodeId,
    pub optional_node_pairs: Vec<OptionalPair>,
    /// Groups of node ids that co-reference a shared, deduplicated subtree (§4.4.5, §9).
    pub subtree_groups: Vec<Vec<NodeId>>,
}

impl Tree {
    pub fn new(total_lines: u64) -> Self {
        let mut arena = Vec::new();
        arena.push(Node::root(total_lines));
        Self {
            arena,
            root: NodeId(0),
            optional_node_pairs: Vec::new(),
            subtree_groups: Vec::new(),
        }
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.arena[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id.0 as usize]
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.arena.len() as u32);
        self.arena.push(node);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, mut child: Node) -> NodeId {
        child.parent = Some(parent);
        let id = self.insert(child);
        self.get_mut(parent).children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Post-order traversal refreshing every `parent` back-edge from the authoritative
    /// `children` lists. Called after any pass that relocates children between nodes.
    pub fn update_parents(&mut self) {
        let root = self.root;
        self.update_parents_from(root);
    }

    fn update_parents_from(&mut self, id: NodeId) {
        let children = self.get(id).children.clone();
        for child in children {
            self.get_mut(child).parent = Some(id);
            self.update_parents_from(child);
        }
    }

    pub fn count_nodes(&self) -> usize {
        let mut count = 0;
        self.walk(self.root, &mut |_| count += 1);
        count
    }

    pub fn count_leaf_occurrences(&self) -> u64 {
        let mut sum = 0;
        self.walk(self.root, &mut |n| {
            if n.is_leaf() {
                sum += n.occurrence;
            }
        });
        sum
    }

    pub fn walk(&self, id: NodeId, f: &mut impl FnMut(&Node)) {
        f(self.get(id));
        for &child in &self.get(id).children.clone() {
            self.walk(child, f);
        }
    }

    /// Invariant check (§7, §8): `occurrence` accounting and parent back-edges. Fatal if it
    /// fails; only invoked explicitly, and always under `debug_assertions`.
    pub fn check_consistency(&self) -> Result<(), PgError> {
        self.check_consistency_from(self.root)
    }

    fn check_consistency_from(&self, id: NodeId) -> Result<(), PgError> {
        let node = self.get(id);
        let child_sum: u64 = node.children.iter().map(|&c| self.get(c).occurrence).sum();
        if !node.children.is_empty() && child_sum > node.occurrence {
            return Err(PgError::Invariant(format!(
                "node {:?}: children occurrence {} exceeds own occurrence {}",
                id, child_sum, node.occurrence
            )));
        }
        for &child in &node.children {
            if self.get(child).parent != Some(id) {
                return Err(PgError::Invariant(format!(
                    "node {:?}: child {:?} has stale parent back-edge",
                    id, child
                )));
            }
            self.check_consistency_from(child)?;
        }
        Ok(())
    }
}

#[cfg(debug_assertions)]
impl Tree {
    /// Convenience for passes under test: run the pass, then assert consistency immediately.
    pub fn assert_consistent(&self) {
        if let Err(e) = self.check_consistency() {
            panic!("{}", e);
        }
    }
}
