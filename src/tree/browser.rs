use super::node::{NodeId, TreeNode, WorkspaceTree};

/// Navigation stack for stepping into nested folders.
///
/// The stack stores ids rather than references so it survives a tree
/// reload: `revalidate` keeps the part of the path that still exists in
/// the new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderBrowser {
    stack: Vec<NodeId>,
}

impl FolderBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current(&self) -> Option<&NodeId> {
        self.stack.last()
    }

    /// Descends into `id` if it is a folder shown at the current level.
    /// Returns true if the stack changed.
    pub fn enter(&mut self, tree: &WorkspaceTree, id: &NodeId) -> bool {
        let reachable = self
            .current_folders(tree)
            .iter()
            .any(|folder| &folder.id == id);
        if reachable {
            self.stack.push(id.clone());
        }
        reachable
    }

    /// Steps back up one level. Returns false at the top.
    pub fn back(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    /// Folders at the current level: the roots when nothing was entered,
    /// otherwise the child folders of the current folder.
    pub fn current_folders<'a>(&self, tree: &'a WorkspaceTree) -> Vec<&'a TreeNode> {
        let level: &[TreeNode] = match self.current() {
            None => &tree.roots,
            Some(id) => match tree.find(id) {
                Some(node) => node.children(),
                None => &[],
            },
        };
        level.iter().filter(|node| node.is_folder()).collect()
    }

    /// Slash-terminated path of the entered folders, e.g. `"Drive/Sales/"`.
    pub fn breadcrumb(&self, tree: &WorkspaceTree) -> String {
        let Some(current) = self.current() else {
            return String::new();
        };
        tree.path_from_root(current)
            .map(|names| names.iter().map(|name| format!("{}/", name)).collect())
            .unwrap_or_default()
    }

    /// Drops every level from the first folder missing in `tree` onward.
    pub fn revalidate(&mut self, tree: &WorkspaceTree) {
        let mut level: &[TreeNode] = &tree.roots;
        let mut keep = 0;
        for id in &self.stack {
            match level.iter().find(|node| node.is_folder() && &node.id == id) {
                Some(node) => {
                    level = node.children();
                    keep += 1;
                }
                None => break,
            }
        }
        self.stack.truncate(keep);
    }
}
