//! The window manager's layout tree and the walk that extracts workspaces.
//!
//! i3 answers `GET_TREE` with a single JSON object describing every output,
//! workspace and container.  Only the handful of fields needed to find
//! workspaces and their windows are deserialized here; everything else is
//! ignored.
//!
//! [`find_workspaces`] turns a tree snapshot into one [`WorkspaceSummary`]
//! per workspace, listing its application windows in layout order (tiled
//! windows first, then floating ones).

use serde::Deserialize;

/// Kind of a tree node, as reported in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Output,
    Workspace,
    Con,
    FloatingCon,
    Dockarea,
    /// A node type this crate does not know about.  It is never a window
    /// and its children are still searched.
    #[serde(other)]
    Unknown,
}

/// X11 window properties of a leaf container.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowProperties {
    /// `WM_CLASS` class part, e.g. `"Firefox"`.
    #[serde(default)]
    pub class: Option<String>,
}

/// A single node of the layout tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    pub id: i64,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub name: Option<String>,
    /// Tiled children.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Floating children, drawn above the tiled ones.
    #[serde(default)]
    pub floating_nodes: Vec<Node>,
    #[serde(default)]
    pub window_properties: Option<WindowProperties>,
}

impl Node {
    /// The node's name, or `""` when it has none.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// The window class of a leaf container, or `""` if it has none.
    pub fn window_class(&self) -> &str {
        self.window_properties
            .as_ref()
            .and_then(|p| p.class.as_deref())
            .unwrap_or("")
    }

    /// Whether this node is an application window.
    ///
    /// Only childless `con` nodes count.  Container kinds that merely group
    /// other nodes are never windows, even when empty.
    pub fn is_window(&self) -> bool {
        if !self.nodes.is_empty() || !self.floating_nodes.is_empty() {
            return false;
        }
        match self.node_type {
            NodeType::Con => true,
            NodeType::Root
            | NodeType::Output
            | NodeType::Workspace
            | NodeType::FloatingCon
            | NodeType::Dockarea
            | NodeType::Unknown => false,
        }
    }
}

/// A workspace together with the windows found inside it.
#[derive(Debug, Clone)]
pub struct WorkspaceSummary<'a> {
    pub workspace: &'a Node,
    /// Leaf windows in traversal order.
    pub windows: Vec<&'a Node>,
}

/// Find every workspace below `node`, depth-first and left to right.
///
/// A workspace ends the descent on its branch; anything else is searched
/// through its tiled children.
pub fn find_workspaces(node: &Node) -> Vec<WorkspaceSummary<'_>> {
    let mut out = Vec::new();
    collect_workspaces(node, &mut out);
    out
}

fn collect_workspaces<'a>(node: &'a Node, out: &mut Vec<WorkspaceSummary<'a>>) {
    match node.node_type {
        NodeType::Workspace => {
            out.push(WorkspaceSummary {
                workspace: node,
                windows: node
                    .nodes
                    .iter()
                    .chain(&node.floating_nodes)
                    .flat_map(visit_windows)
                    .collect(),
            });
        }
        NodeType::Root
        | NodeType::Output
        | NodeType::Con
        | NodeType::FloatingCon
        | NodeType::Dockarea
        | NodeType::Unknown => {
            for child in &node.nodes {
                collect_workspaces(child, out);
            }
        }
    }
}

/// Collect every leaf window at or below `node`, tiled children before
/// floating children.
pub fn visit_windows(node: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    collect_windows(node, &mut out);
    out
}

fn collect_windows<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    if node.is_window() {
        out.push(node);
        return;
    }
    for child in node.nodes.iter().chain(&node.floating_nodes) {
        collect_windows(child, out);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a node; `kids` become tiled children.
    pub(crate) fn node(id: i64, node_type: NodeType, name: &str, kids: Vec<Node>) -> Node {
        Node {
            id,
            node_type,
            name: Some(name.to_string()),
            nodes: kids,
            floating_nodes: Vec::new(),
            window_properties: None,
        }
    }

    /// Build a leaf window with the given class.
    pub(crate) fn window(id: i64, class: &str) -> Node {
        Node {
            id,
            node_type: NodeType::Con,
            name: Some(format!("{} window", class)),
            nodes: Vec::new(),
            floating_nodes: Vec::new(),
            window_properties: Some(WindowProperties {
                class: Some(class.to_string()),
            }),
        }
    }

    fn classes(ws: &WorkspaceSummary<'_>) -> Vec<String> {
        ws.windows.iter().map(|w| w.window_class().to_string()).collect()
    }

    #[test]
    fn deserialize_i3_tree_subset() {
        let json = r#"{
            "id": 1, "type": "root", "name": "root",
            "nodes": [{
                "id": 2, "type": "output", "name": "eDP-1",
                "nodes": [
                    { "id": 3, "type": "dockarea", "name": "topdock", "nodes": [] },
                    { "id": 4, "type": "con", "name": "content", "nodes": [{
                        "id": 5, "type": "workspace", "name": "1", "num": 1,
                        "nodes": [{
                            "id": 6, "type": "con", "name": "term",
                            "window": 1234,
                            "window_properties": { "class": "XTerm", "instance": "xterm" },
                            "nodes": [], "floating_nodes": []
                        }],
                        "floating_nodes": [{
                            "id": 7, "type": "floating_con", "name": null,
                            "nodes": [{
                                "id": 8, "type": "con", "name": "pip",
                                "window_properties": { "class": "mpv" },
                                "nodes": [], "floating_nodes": []
                            }]
                        }]
                    }]}
                ]
            }],
            "floating_nodes": [],
            "rect": { "x": 0, "y": 0, "width": 1920, "height": 1080 }
        }"#;
        let root: Node = serde_json::from_str(json).unwrap();
        assert_eq!(root.node_type, NodeType::Root);
        let ws = find_workspaces(&root);
        assert_eq!(ws.len(), 1);
        assert_eq!(ws[0].workspace.id, 5);
        assert_eq!(classes(&ws[0]), vec!["XTerm", "mpv"]);
    }

    #[test]
    fn unknown_node_type_is_tolerated() {
        let json = r#"{ "id": 1, "type": "future_kind", "nodes": [] }"#;
        let n: Node = serde_json::from_str(json).unwrap();
        assert_eq!(n.node_type, NodeType::Unknown);
        assert!(!n.is_window());
    }

    #[test]
    fn workspaces_found_in_order_across_outputs() {
        let root = node(
            1,
            NodeType::Root,
            "root",
            vec![
                node(
                    2,
                    NodeType::Output,
                    "DP-1",
                    vec![node(
                        3,
                        NodeType::Con,
                        "content",
                        vec![
                            node(10, NodeType::Workspace, "1", vec![window(11, "A")]),
                            node(20, NodeType::Workspace, "2", vec![window(21, "B")]),
                        ],
                    )],
                ),
                node(
                    4,
                    NodeType::Output,
                    "HDMI-A-1",
                    vec![node(30, NodeType::Workspace, "3", vec![])],
                ),
            ],
        );
        let ids: Vec<i64> = find_workspaces(&root).iter().map(|w| w.workspace.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn nested_containers_are_flattened_in_order() {
        let ws = node(
            10,
            NodeType::Workspace,
            "1",
            vec![
                window(11, "A"),
                node(12, NodeType::Con, "split", vec![window(13, "B"), window(14, "A")]),
                window(15, "C"),
            ],
        );
        let found = find_workspaces(&ws);
        assert_eq!(found.len(), 1);
        assert_eq!(classes(&found[0]), vec!["A", "B", "A", "C"]);
    }

    #[test]
    fn floating_windows_come_after_tiled_ones() {
        let mut ws = node(10, NodeType::Workspace, "1", vec![window(11, "Tiled")]);
        ws.floating_nodes = vec![node(
            12,
            NodeType::FloatingCon,
            "",
            vec![window(13, "Floating")],
        )];
        let found = find_workspaces(&ws);
        assert_eq!(classes(&found[0]), vec!["Tiled", "Floating"]);
    }

    #[test]
    fn empty_workspace_has_no_windows() {
        let ws = node(10, NodeType::Workspace, "1", vec![]);
        let found = find_workspaces(&ws);
        assert_eq!(found.len(), 1);
        assert!(found[0].windows.is_empty());
    }

    #[test]
    fn empty_non_con_nodes_are_not_windows() {
        let ws = node(
            10,
            NodeType::Workspace,
            "1",
            vec![
                node(11, NodeType::Dockarea, "dock", vec![]),
                node(12, NodeType::FloatingCon, "", vec![]),
                window(13, "A"),
            ],
        );
        let found = find_workspaces(&ws);
        assert_eq!(classes(&found[0]), vec!["A"]);
    }

    #[test]
    fn visit_windows_on_leaf_returns_itself() {
        let w = window(1, "A");
        let leaves = visit_windows(&w);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].id, 1);
    }

    #[test]
    fn window_without_properties_has_empty_class() {
        let mut w = window(1, "A");
        w.window_properties = None;
        assert_eq!(w.window_class(), "");
    }
}
