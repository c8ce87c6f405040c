//! Owned entity tree handed to the template renderer.
//!
//! Nodes are built bottom-up: leaves first, then wrapped into their parents.
//! Every node exclusively owns its children, so the structure is always a
//! finite, acyclic, rooted tree. `classes`, `json` and `to_tree` walk the tree
//! with an explicit stack and never mutate it, so deep trees do not exhaust the
//! call stack and a shared `&EntityNode` can be read from several threads at
//! once.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::EntityKind;
use crate::domain::error::{DomainError, DomainResult};

/// One documented entity and the entities nested inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityNode {
    name: String,
    kind: EntityKind,
    /// Insertion order is discovery order.
    children: Vec<EntityNode>,
}

impl EntityNode {
    /// Wrap already finished children into a new parent node.
    pub fn new(
        name: impl Into<String>,
        kind: EntityKind,
        children: Vec<EntityNode>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(Self {
            name,
            kind,
            children,
        })
    }

    /// Node without children.
    pub fn leaf(name: impl Into<String>, kind: EntityKind) -> DomainResult<Self> {
        Self::new(name, kind, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn children(&self) -> &[EntityNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal: a node comes before its children, children in
    /// insertion order.
    pub fn iter(&self) -> EntityIter<'_> {
        EntityIter { stack: vec![self] }
    }

    /// Names of every `class` node in this subtree, the node itself included,
    /// in pre-order.
    #[instrument(level = "trace", skip(self), fields(root = %self.name))]
    pub fn classes(&self) -> Vec<String> {
        self.iter()
            .filter(|node| node.kind == EntityKind::Class)
            .map(|node| node.name.clone())
            .collect()
    }

    /// Nested mapping `{"name", "kind", "children": [...]}` of the whole subtree.
    #[instrument(level = "trace", skip(self), fields(root = %self.name))]
    pub fn json(&self) -> Value {
        // Post-order: when a node is finished, the values of its children are
        // the last `children.len()` entries of `built`, in order.
        let mut built: Vec<Value> = Vec::new();
        let mut stack: Vec<(&EntityNode, bool)> = vec![(self, false)];

        while let Some((node, visited)) = stack.pop() {
            if visited {
                let children = built.split_off(built.len() - node.children.len());
                built.push(node_value(node, children));
            } else {
                stack.push((node, true));
                for child in node.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }

        built.pop().unwrap_or_default()
    }

    /// Rebuild a tree from the mapping produced by [`EntityNode::json`].
    #[instrument(level = "debug", skip(value))]
    pub fn from_json(value: &Value) -> DomainResult<Self> {
        let mut built: Vec<EntityNode> = Vec::new();
        let mut stack: Vec<(&Value, String, bool)> = vec![(value, "$".to_string(), false)];

        while let Some((value, path, visited)) = stack.pop() {
            let (name, kind, children) = node_fields(value, &path)?;
            if visited {
                let children = built.split_off(built.len() - children.len());
                let node = EntityNode::new(name, kind, children)
                    .map_err(|e| malformed(&path, e.to_string()))?;
                built.push(node);
            } else {
                stack.push((value, path.clone(), true));
                for (i, child) in children.iter().enumerate().rev() {
                    stack.push((child, format!("{path}.children[{i}]"), false));
                }
            }
        }

        built.pop().ok_or_else(|| malformed("$", "empty document"))
    }

    /// Number of levels, a single node has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                stack.push((child, depth + 1));
            }
        }

        max_depth
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// termtree rendering used for diagnostics.
    pub fn to_tree(&self) -> Tree<String> {
        // Same post-order walk as `json`
        let mut built: Vec<Tree<String>> = Vec::new();
        let mut stack: Vec<(&EntityNode, bool)> = vec![(self, false)];

        while let Some((node, visited)) = stack.pop() {
            if visited {
                let leaves = built.split_off(built.len() - node.children.len());
                built.push(Tree::new(format!("{} ({})", node.name, node.kind)).with_leaves(leaves));
            } else {
                stack.push((node, true));
                for child in node.children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }

        built
            .pop()
            .unwrap_or_else(|| Tree::new(format!("{} ({})", self.name, self.kind)))
    }
}

impl fmt::Display for EntityNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree())
    }
}

fn node_value(node: &EntityNode, children: Vec<Value>) -> Value {
    let mut map = Map::new();
    map.insert("name".into(), Value::String(node.name.clone()));
    map.insert("kind".into(), Value::String(node.kind.as_str().into()));
    map.insert("children".into(), Value::Array(children));
    Value::Object(map)
}

fn node_fields<'a>(
    value: &'a Value,
    path: &str,
) -> DomainResult<(&'a str, EntityKind, &'a Vec<Value>)> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(path, "expected an object"))?;
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(path, "missing string field 'name'"))?;
    let kind = object
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(path, "missing string field 'kind'"))?
        .parse::<EntityKind>()
        .map_err(|e| malformed(path, e.to_string()))?;
    let children = object
        .get("children")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(path, "missing array field 'children'"))?;
    Ok((name, kind, children))
}

fn malformed(path: &str, reason: impl Into<String>) -> DomainError {
    DomainError::MalformedTree {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Pre-order iterator over an [`EntityNode`] subtree.
pub struct EntityIter<'a> {
    stack: Vec<&'a EntityNode>,
}

impl<'a> Iterator for EntityIter<'a> {
    type Item = &'a EntityNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    //  root (package)
    //  ├── A (class)
    //  └── B (module)
    //      └── C (class)
    fn sample() -> EntityNode {
        let a = EntityNode::leaf("A", EntityKind::Class).unwrap();
        let c = EntityNode::leaf("C", EntityKind::Class).unwrap();
        let b = EntityNode::new("B", EntityKind::Module, vec![c]).unwrap();
        EntityNode::new("root", EntityKind::Package, vec![a, b]).unwrap()
    }

    fn chain(depth: usize) -> EntityNode {
        let mut node = EntityNode::leaf("n0", EntityKind::Class).unwrap();
        for i in 1..depth {
            node = EntityNode::new(format!("n{i}"), EntityKind::Module, vec![node]).unwrap();
        }
        node
    }

    #[test]
    fn given_sample_tree_when_collecting_classes_then_returns_all_class_names() {
        assert_eq!(sample().classes(), vec!["A", "C"]);
    }

    #[test]
    fn given_class_root_when_collecting_classes_then_includes_root() {
        let node = EntityNode::leaf("Solo", EntityKind::Class).unwrap();
        assert_eq!(node.classes(), vec!["Solo"]);
    }

    #[test]
    fn given_sample_tree_when_serializing_then_nests_children_in_order() {
        let expected = json!({
            "name": "root",
            "kind": "package",
            "children": [
                {"name": "A", "kind": "class", "children": []},
                {"name": "B", "kind": "module", "children": [
                    {"name": "C", "kind": "class", "children": []}
                ]}
            ]
        });
        assert_eq!(sample().json(), expected);
    }

    #[test]
    fn given_sample_tree_when_using_serde_then_matches_json_view() {
        let tree = sample();
        assert_eq!(serde_json::to_value(&tree).unwrap(), tree.json());
    }

    #[test]
    fn given_deep_chain_when_traversing_then_does_not_overflow() {
        let tree = chain(500);
        assert_eq!(tree.depth(), 500);
        assert_eq!(tree.node_count(), 500);
        assert_eq!(tree.classes(), vec!["n0"]);

        let mut value = &tree.json();
        for _ in 1..500 {
            value = &value["children"][0];
        }
        assert_eq!(value["name"], "n0");
    }

    #[test]
    fn given_json_view_when_reading_back_then_rebuilds_same_tree() {
        let tree = sample();
        assert_eq!(EntityNode::from_json(&tree.json()).unwrap(), tree);
    }

    #[test]
    fn given_unknown_kind_when_reading_json_then_reports_path() {
        let value = json!({
            "name": "root",
            "kind": "package",
            "children": [{"name": "f", "kind": "function", "children": []}]
        });
        match EntityNode::from_json(&value) {
            Err(DomainError::MalformedTree { path, .. }) => assert_eq!(path, "$.children[0]"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn given_blank_name_when_constructing_then_errors() {
        assert_eq!(
            EntityNode::leaf("  ", EntityKind::Module),
            Err(DomainError::EmptyName)
        );
    }

    #[test]
    fn given_deep_chain_when_rendering_tree_then_keeps_every_level() {
        let tree = chain(500).to_tree();
        let mut level = &tree;
        let mut levels = 1;
        while let Some(child) = level.leaves.first() {
            assert_eq!(level.leaves.len(), 1);
            level = child;
            levels += 1;
        }
        assert_eq!(levels, 500);
        assert_eq!(level.root, "n0 (class)");
    }

    #[test]
    fn given_sample_tree_when_displaying_then_renders_tree_lines() {
        let rendered = sample().to_string();
        assert!(rendered.starts_with("root (package)\n"));
        assert!(rendered.contains("C (class)"));
    }
}
