//! Hierarchy of module names found in a configuration.

/// A node in the module hierarchy. Children keep insertion order.
///
/// Nodes are created lazily while entries are loaded; after [`seal`]
/// the tree no longer grows.
///
/// [`seal`]: ModuleTree::seal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleTree {
    children: Vec<(String, ModuleTree)>,
    sealed: bool,
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl ModuleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node at `path`, creating missing nodes on the way. `None` once the
    /// tree is sealed and the node does not exist.
    pub fn get_or_create(&mut self, path: &str) -> Option<&mut ModuleTree> {
        let mut node = self;
        for segment in segments(path) {
            let index = match node.children.iter().position(|(n, _)| n == segment) {
                Some(i) => i,
                None if node.sealed => return None,
                None => {
                    node.children.push((segment.to_string(), ModuleTree::default()));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index].1;
        }
        Some(node)
    }

    /// Node at `path`. The empty path is this node.
    pub fn lookup(&self, path: &str) -> Option<&ModuleTree> {
        let mut node = self;
        for segment in segments(path) {
            node = node.children.iter().find(|(n, _)| n == segment).map(|(_, c)| c)?;
        }
        Some(node)
    }

    /// Stop growing, recursively.
    pub fn seal(&mut self) {
        self.sealed = true;
        for (_, child) in &mut self.children {
            child.seal();
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Names of the direct children.
    pub fn child_list(&self) -> Vec<String> {
        self.children.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &ModuleTree)> {
        self.children.iter().map(|(n, c)| (n.as_str(), c))
    }
}

/// Part of a qualified variable name before the last `/`, or `""`.
pub fn branch(name: &str) -> &str {
    name.rfind('/').map_or("", |i| &name[..i])
}

/// Part of a qualified variable name after the last `/`.
pub fn leaf(name: &str) -> &str {
    name.rfind('/').map_or(name, |i| &name[i + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation_keeps_order() {
        let mut tree = ModuleTree::new();
        tree.get_or_create("B/X");
        tree.get_or_create("A");
        tree.get_or_create("B/Y");
        assert_eq!(tree.child_list(), vec!["B", "A"]);
        assert_eq!(tree.lookup("B").unwrap().child_list(), vec!["X", "Y"]);
        assert_eq!(tree.lookup("").unwrap().child_list(), vec!["B", "A"]);
        assert!(tree.lookup("C").is_none());
    }

    #[test]
    fn test_sealed_tree_does_not_grow() {
        let mut tree = ModuleTree::new();
        tree.get_or_create("A");
        tree.seal();
        assert!(tree.is_sealed());
        assert!(tree.get_or_create("A").is_some());
        assert!(tree.get_or_create("A/B").is_none());
        assert_eq!(tree.child_list(), vec!["A"]);
    }

    #[test]
    fn test_branch_and_leaf() {
        assert_eq!(branch("A/B/var"), "A/B");
        assert_eq!(leaf("A/B/var"), "var");
        assert_eq!(branch("var"), "");
        assert_eq!(leaf("var"), "var");
    }
}
