//! §4.5 artifact 4 and §6: the parser-combinator grammar program. Bit-exact constructor names
//! are mandated by the target runtime that consumes this text; this module only produces it.

use crate::datatype::{self, DataType};
use crate::node::{Element, NodeId, Tree};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

struct NameGen {
    next: HashMap<&'static str, u64>,
}

impl NameGen {
    fn new() -> Self {
        Self {
            next: HashMap::new(),
        }
    }

    fn next(&mut self, kind: &'static str) -> String {
        let counter = self.next.entry(kind).or_insert(0);
        let name = format!("{}{}", kind, counter);
        *counter += 1;
        name
    }
}

/// Writer state threaded through the recursive emission: which node ids belong to a discovered
/// subtree group, which of those groups have already been hoisted to a named top-level binding,
/// and the accumulated preamble of such bindings (written before the root assignment, in the
/// order subtree groups were discovered — ascending height, so referents precede references).
struct Writer<'a> {
    tree: &'a Tree,
    delimiters: &'a BTreeSet<u8>,
    names: NameGen,
    group_of: HashMap<NodeId, usize>,
    group_name: HashMap<usize, String>,
    preamble: Vec<String>,
}

impl<'a> Writer<'a> {
    fn new(tree: &'a Tree, delimiters: &'a BTreeSet<u8>, subtree_groups: &[Vec<NodeId>]) -> Self {
        let mut group_of = HashMap::new();
        for (idx, group) in subtree_groups.iter().enumerate() {
            for &id in group {
                group_of.insert(id, idx);
            }
        }
        Self {
            tree,
            delimiters,
            names: NameGen::new(),
            group_of,
            group_name: HashMap::new(),
            preamble: Vec::new(),
        }
    }

    fn variable_ctor(&mut self, id: NodeId) -> String {
        let node = self.tree.get(id);
        let dominant = datatype::dominant(&node.datatype);
        let name = match dominant {
            DataType::IpAddress => self.names.next("ipaddress"),
            DataType::Base64 => self.names.next("base64"),
            DataType::Hex => self.names.next("hex"),
            DataType::DateTime => self.names.next("datetime"),
            DataType::Integer => {
                if is_port_position(self.tree, id) {
                    self.names.next("port")
                } else {
                    self.names.next("integer")
                }
            }
            DataType::Float => self.names.next("float"),
            DataType::String => self.names.next("variable"),
        };
        match dominant {
            DataType::IpAddress => format!("IpAddressDataModelElement('{}')", name),
            DataType::Base64 => format!("Base64StringModelElement('{}')", name),
            DataType::Hex => format!("HexStringModelElement('{}')", name),
            DataType::DateTime => format!("DateTimeModelElement('{}')", name),
            DataType::Integer if is_port_position(self.tree, id) => {
                format!("DecimalIntegerValueModelElement('{}', value_sign_type=SIGN_TYPE_UNSIGNED)", name)
            }
            DataType::Integer => format!(
                "DecimalIntegerValueModelElement('{}', value_sign_type=SIGN_TYPE_OPTIONAL)",
                name
            ),
            DataType::Float => format!(
                "DecimalFloatValueModelElement('{}', value_sign_type=SIGN_TYPE_OPTIONAL)",
                name
            ),
            DataType::String => {
                format!("VariableByteDataModelElement('{}', alphabet)", name)
            }
        }
    }

    fn fixed_ctor(&mut self, bytes: &[u8]) -> String {
        let name = self.names.next("fixed");
        format!("FixedDataModelElement('{}', b'{}')", name, escape(bytes))
    }

    fn list_ctor(&mut self, items: &[Vec<u8>]) -> String {
        let name = self.names.next("fixed");
        let rendered: Vec<String> = items.iter().map(|i| format!("b'{}'", escape(i))).collect();
        format!(
            "FixedWordlistDataModelElement('{}', [{}])",
            name,
            rendered.join(", ")
        )
    }

    /// Emits the full grammar text for the subtree rooted at `id`, honoring shared subtree
    /// groups: the first visit hoists a named binding into the preamble, every later visit to
    /// a node sharing that group just references the name.
    fn emit(&mut self, id: NodeId) -> String {
        if let Some(&group_idx) = self.group_of.get(&id) {
            if let Some(name) = self.group_name.get(&group_idx) {
                return name.clone();
            }
            let expr = self.emit_uncached(id);
            let name = format!("subtree_{}", group_idx);
            self.preamble.push(format!("{} = {}", name, expr));
            self.group_name.insert(group_idx, name.clone());
            return name;
        }
        self.emit_uncached(id)
    }

    fn emit_uncached(&mut self, id: NodeId) -> String {
        let node = self.tree.get(id);

        if node.is_variable {
            return self.wrap_optional(id, self.variable_ctor(id));
        }
        if node.is_list {
            let items = node.element.as_list().unwrap().to_vec();
            return self.wrap_optional(id, self.list_ctor(&items));
        }

        let own = match &node.element {
            Element::Fixed(bytes) => Some(self.fixed_ctor(bytes)),
            Element::Root => None,
            _ => None,
        };

        let children = node.children.clone();
        // A node where lines both end here and continue through children (`node.end`) means the
        // remaining path is genuinely optional: some matched lines stopped before reaching it.
        let tail_is_optional = node.end && !children.is_empty();
        let wrap_tail = |writer: &mut Self, tail: String| -> String {
            if !tail_is_optional {
                return tail;
            }
            let seq_name = writer.names.next("sequence");
            let opt_name = writer.names.next("optional");
            format!(
                "OptionalMatchModelElement('{}', SequenceModelElement('{}', [{}]))",
                opt_name, seq_name, tail
            )
        };

        let body = match children.len() {
            0 => own.unwrap_or_else(|| "AnyByteDataModelElement('any0')".to_string()),
            1 => {
                let child_text = self.emit(children[0]);
                let tail = wrap_tail(self, child_text);
                let mut members = Vec::new();
                if let Some(o) = own {
                    members.push(o);
                }
                members.push(tail);
                if members.len() == 1 {
                    members.into_iter().next().unwrap()
                } else {
                    let name = self.names.next("sequence");
                    format!(
                        "SequenceModelElement('{}', [{}])",
                        name,
                        members.join(", ")
                    )
                }
            }
            _ => {
                let branch_texts: Vec<String> = children.iter().map(|&c| self.emit(c)).collect();
                let name = self.names.next("first_match");
                let first_match = format!(
                    "FirstMatchModelElement('{}', [{}])",
                    name,
                    branch_texts.join(", ")
                );
                let tail = wrap_tail(self, first_match);
                match own {
                    Some(o) => {
                        let seq_name = self.names.next("sequence");
                        format!(
                            "SequenceModelElement('{}', [{}, {}])",
                            seq_name, o, tail
                        )
                    }
                    None => tail,
                }
            }
        };

        self.wrap_optional(id, body)
    }

    fn wrap_optional(&mut self, id: NodeId, body: String) -> String {
        let is_anchor = self
            .tree
            .optional_node_pairs
            .iter()
            .any(|(anchor, _)| *anchor == id);
        if !is_anchor {
            return body;
        }
        let name = self.names.next("optional");
        format!("OptionalMatchModelElement('{}', {})", name, body)
    }
}

fn is_port_position(tree: &Tree, id: NodeId) -> bool {
    let parent = match tree.get(id).parent {
        Some(p) => p,
        None => return false,
    };
    let parent_is_colon = tree
        .get(parent)
        .element
        .as_fixed()
        .map(|e| e == b":")
        .unwrap_or(false);
    if !parent_is_colon {
        return false;
    }
    let grandparent = match tree.get(parent).parent {
        Some(g) => g,
        None => return false,
    };
    tree.get(grandparent).datatype.contains(&DataType::IpAddress)
}

fn escape(bytes: &[u8]) -> String {
    let mut out = String::new();
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            _ => out.push(b as char),
        }
    }
    out
}

fn alphabet(delimiters: &BTreeSet<u8>) -> String {
    let mut dict: String = (32u8..127).filter(|b| !delimiters.contains(b)).map(|b| b as char).collect();
    dict = dict.replace('\\', "\\\\").replace('\'', "\\'");
    dict
}

/// Writes the whole grammar program: the alphabet constant, any hoisted shared-subtree
/// bindings (ascending height, so referents precede references), then the root assignment.
pub fn write_grammar(
    tree: &Tree,
    subtree_groups: &[Vec<NodeId>],
    delimiters: &BTreeSet<u8>,
) -> Result<String, std::fmt::Error> {
    let mut writer = Writer::new(tree, delimiters, subtree_groups);
    let root_children = tree.get(tree.root).children.clone();

    let root_expr = match root_children.len() {
        0 => "AnyByteDataModelElement('any0')".to_string(),
        1 => {
            let child = writer.emit(root_children[0]);
            let name = writer.names.next("sequence");
            format!("SequenceModelElement('{}', [{}])", name, child)
        }
        _ => {
            let branches: Vec<String> = root_children.iter().map(|&c| writer.emit(c)).collect();
            let name = writer.names.next("first_match");
            format!("FirstMatchModelElement('{}', [{}])", name, branches.join(", "))
        }
    };

    let mut out = String::new();
    writeln!(out, "\"\"\"This module defines a generated parser model.\"\"\"")?;
    writeln!(out)?;
    writeln!(out, "def get_model():")?;
    writeln!(out, "    alphabet = b'{}'", alphabet(delimiters))?;
    writeln!(out)?;
    for binding in &writer.preamble {
        writeln!(out, "    {}", binding)?;
    }
    writeln!(out, "    model = {}", root_expr)?;
    writeln!(out, "    return model")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn single_fixed_child_wraps_in_sequence() {
        let mut tree = Tree::new(100);
        let mut fixed = Node::fixed(b"word".to_vec());
        fixed.occurrence = 100;
        fixed.end = true;
        fixed.ending_lines = 100;
        tree.add_child(tree.root, fixed);

        let grammar = write_grammar(&tree, &[], &BTreeSet::new()).unwrap();
        assert!(grammar.contains("SequenceModelElement"));
        assert!(grammar.contains("FixedDataModelElement"));
        assert!(grammar.contains("b'word'"));
    }

    #[test]
    fn list_child_emits_wordlist() {
        let mut tree = Tree::new(99);
        let mut list = Node::fixed(Vec::new());
        list.element = Element::List(vec![b"this".to_vec(), b"that".to_vec(), b"those".to_vec()]);
        list.is_list = true;
        list.occurrence = 99;
        list.end = true;
        list.ending_lines = 99;
        tree.add_child(tree.root, list);

        let grammar = write_grammar(&tree, &[], &BTreeSet::new()).unwrap();
        assert!(grammar.contains("FixedWordlistDataModelElement"));
    }
}
