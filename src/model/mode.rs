/// Which pane or overlay receives key input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Note list: selection and list commands.
    #[default]
    List,
    /// Sidebar: storage and folder navigation.
    Sidebar,
    /// Detail pane for the selected note.
    Detail,
    /// Context menu over a list item.
    ContextMenu,
    /// Delete confirmation dialog.
    ConfirmDelete,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::List => "LIST",
            Mode::Sidebar => "SIDEBAR",
            Mode::Detail => "DETAIL",
            Mode::ContextMenu => "MENU",
            Mode::ConfirmDelete => "CONFIRM",
        }
    }
}
