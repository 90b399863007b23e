use deckhand::tree::{DisplayMark, NodeKind, SyncState, TreeNode, Visibility, WorkspaceTree};

fn mark_glyph(mark: DisplayMark) -> &'static str {
    match mark {
        DisplayMark::Marked => "[*]",
        DisplayMark::HasMarkedDescendant => "[+]",
        DisplayMark::None => "[ ]",
    }
}

/// Renders the tree as indented text, one node per line. With a
/// `visibility`, hidden nodes and their subtrees are skipped.
pub fn render_tree(tree: &WorkspaceTree, visibility: Option<&Visibility>) -> String {
    let mut out = String::new();
    for root in &tree.roots {
        render_node(root, 0, visibility, &mut out);
    }
    out
}

fn render_node(node: &TreeNode, depth: usize, visibility: Option<&Visibility>, out: &mut String) {
    if visibility.is_some_and(|v| !v.is_visible(&node.id)) {
        return;
    }

    let indent = "  ".repeat(depth);
    match &node.kind {
        NodeKind::Folder {
            display_mark,
            children,
            ..
        } => {
            out.push_str(&format!("{}{} {}/\n", indent, mark_glyph(*display_mark), node.name));
            for child in children {
                render_node(child, depth + 1, visibility, out);
            }
        }
        NodeKind::Leaf { sync_state } => {
            if *sync_state == SyncState::Synced {
                out.push_str(&format!("{}    {}\n", indent, node.name));
            } else {
                out.push_str(&format!("{}    {} ({})\n", indent, node.name, sync_state));
            }
        }
    }
}
