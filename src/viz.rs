//! §4.5 artifact 5 (optional): a `ptree`-rendered view of the final tree, written when
//! `Config::visualize` is set. The original source drew this with `networkx`/`matplotlib`; here
//! it is a plain-text tree, matching this crate's existing [ASTNode](crate::ast_node::ASTNode)
//! `TreeItem` pattern rather than pulling in a plotting dependency for a single opt-in artifact.

use crate::node::{Element, NodeId, Tree};
use ptree::TreeItem;
use std::borrow::Cow;
use std::io::Write;

/// A borrowing view over one node, used only to implement [TreeItem] without cloning the arena.
pub struct TreeView<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> TreeView<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            id: tree.root,
        }
    }
}

impl<'a> Clone for TreeView<'a> {
    fn clone(&self) -> Self {
        TreeView {
            tree: self.tree,
            id: self.id,
        }
    }
}

impl<'a> TreeItem for TreeView<'a> {
    type Child = Self;

    fn write_self<W: Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        let node = self.tree.get(self.id);
        let label = match &node.element {
            Element::Root => "ROOT".to_string(),
            Element::Fixed(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Element::List(items) => format!("{{{} values}}", items.len()),
            Element::Variable => format!("\u{00a7}:{:?}", node.datatype),
        };
        write!(f, "{} ({})", label, node.occurrence)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let views: Vec<Self> = self
            .tree
            .get(self.id)
            .children
            .iter()
            .map(|&child| TreeView {
                tree: self.tree,
                id: child,
            })
            .collect();
        Cow::from(views)
    }
}

pub fn render(tree: &Tree) -> Result<String, std::io::Error> {
    let mut buf = Vec::new();
    ptree::write_tree(&TreeView::new(tree), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
