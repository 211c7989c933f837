use super::context::NavigationContext;
use super::library::Library;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavNode {
    pub context: NavigationContext,
    pub name: String,
    pub depth: usize,
}

/// Flattened navigation tree: Home, Starred, then each storage with its folders.
#[derive(Debug, Default)]
pub struct Sidebar {
    pub nodes: Vec<NavNode>,
    pub selected: usize,
}

impl Sidebar {
    pub fn new(library: &Library) -> Self {
        let mut sidebar = Self::default();
        sidebar.refresh(library);
        sidebar
    }

    pub fn refresh(&mut self, library: &Library) {
        self.nodes.clear();

        self.nodes.push(NavNode {
            context: NavigationContext::Home,
            name: "Home".to_string(),
            depth: 0,
        });
        self.nodes.push(NavNode {
            context: NavigationContext::Starred,
            name: "Starred".to_string(),
            depth: 0,
        });

        for storage in library.storage_map.values() {
            self.nodes.push(NavNode {
                context: NavigationContext::Storage {
                    storage_key: storage.key.clone(),
                },
                name: storage.name.clone(),
                depth: 0,
            });

            for folder in &storage.folders {
                self.nodes.push(NavNode {
                    context: NavigationContext::Folder {
                        storage_key: storage.key.clone(),
                        folder_key: folder.key.clone(),
                    },
                    name: folder.name.clone(),
                    depth: 1,
                });
            }
        }

        if self.selected >= self.nodes.len() {
            self.selected = self.nodes.len() - 1;
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.nodes.is_empty() {
            self.selected = 0;
            return;
        }

        let max = self.nodes.len().saturating_sub(1) as isize;
        let next = (self.selected as isize + delta).clamp(0, max);
        self.selected = next as usize;
    }

    pub fn selected_node(&self) -> Option<&NavNode> {
        self.nodes.get(self.selected)
    }

    /// Point the highlight at the entry for `pathname`, if it has one.
    pub fn select_path(&mut self, pathname: &str) {
        let Some(context) = NavigationContext::from_path(pathname) else {
            return;
        };
        if let Some(idx) = self.nodes.iter().position(|node| node.context == context) {
            self.selected = idx;
        }
    }
}
