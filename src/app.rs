use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc;

use anyhow::Result;
use chrono_humanize::HumanTime;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::bus::{EventBus, Listener, SubscriptionId, Topic};
use crate::model::config::AppConfig;
use crate::model::context::NavigationContext;
use crate::model::deletion::DialogChoice;
use crate::model::library::{DataApi, Library, LibraryFile, StoreAction};
use crate::model::mode::Mode;
use crate::model::note::{Note, NoteId, NoteKind};
use crate::model::route::{Location, Router};
use crate::model::sidebar::Sidebar;
use crate::msg::Msg;
use crate::note_list::{KeyOutcome, NoteList};
use crate::timer::RefreshTimer;

const WHEEL_ROWS: isize = 2;

struct ConfirmDialog {
    target: NoteId,
    highlighted: usize,
}

pub struct App {
    pub mode: Mode,
    pub config: AppConfig,
    pub library: Library,
    library_file: Arc<LibraryFile>,
    data_api: Arc<dyn DataApi>,
    router: Router,
    bus: EventBus,
    note_list: NoteList,
    subscriptions: Vec<SubscriptionId>,
    sidebar: Sidebar,
    pub sidebar_visible: bool,
    menu_target: Option<NoteId>,
    confirm: Option<ConfirmDialog>,
    pub should_quit: bool,
    pub event_tx: mpsc::Sender<Msg>,
    pub notifications: VecDeque<String>,
    list_area: Rect,
    layout_dirty: bool,
}

impl App {
    pub fn new(config: AppConfig, event_tx: mpsc::Sender<Msg>) -> Result<Self> {
        let library_file = Arc::new(LibraryFile::new(config.library_path()));
        let library = library_file.load()?;
        tracing::info!(
            "loaded {} notes from {}",
            library.note_map.len(),
            library_file.path().display()
        );

        let mut bus = EventBus::default();
        let subscriptions = vec![
            bus.on(Topic::NewNote, Listener::RequestNewNote),
            bus.on(Topic::DetailDelete, Listener::DeleteSelected),
            bus.on(Topic::DetailFocus, Listener::FocusDetail),
        ];

        let timer = RefreshTimer::spawn(config.refresh_interval(), event_tx.clone());
        let note_list = NoteList::mount(&mut bus, config.list_geometry(), Some(timer));

        let router = Router::new(Location::new(config.general.start_path.clone()));
        let mut sidebar = Sidebar::new(&library);
        sidebar.select_path(&router.location().pathname);

        let data_api: Arc<dyn DataApi> = library_file.clone();

        let mut app = Self {
            mode: Mode::List,
            config,
            library,
            library_file,
            data_api,
            router,
            bus,
            note_list,
            subscriptions,
            sidebar,
            sidebar_visible: true,
            menu_target: None,
            confirm: None,
            should_quit: false,
            event_tx,
            notifications: VecDeque::new(),
            list_area: Rect::default(),
            layout_dirty: false,
        };
        app.sync();
        Ok(app)
    }

    /// Tear down the list surface and every bus subscription.
    pub fn shutdown(&mut self) {
        self.note_list.unmount(&mut self.bus);
        for id in self.subscriptions.drain(..) {
            self.bus.off(id);
        }
        tracing::info!(
            "note list unmounted ({} subscriptions left, {} history entries)",
            self.bus.subscription_count(),
            self.router.history_len()
        );
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Mouse(mouse) => self.handle_mouse(mouse),
            Msg::Resize(_w, _h) => {} // viewport is measured during layout
            Msg::LibraryChanged => self.reload_library(),
            Msg::NoteDeleted { id, result } => self.handle_note_deleted(id, result),
            Msg::Refresh => tracing::trace!("refresh tick"),
        }

        self.pump_bus();
        self.sync();
        debug_assert!(self.bus.is_idle());
        Ok(())
    }

    /// Re-sync after a frame measured a new list viewport. Returns whether
    /// another frame is needed.
    pub fn after_draw(&mut self) -> bool {
        if !std::mem::take(&mut self.layout_dirty) {
            return false;
        }
        self.sync();
        true
    }

    fn sync(&mut self) {
        self.note_list.sync(&self.library, &mut self.router);
    }

    fn pump_bus(&mut self) {
        while let Some((topic, listeners)) = self.bus.poll() {
            tracing::debug!("{} -> {} listeners", topic.name(), listeners.len());
            for listener in listeners {
                self.dispatch(listener);
            }
            self.sync();
        }
    }

    fn dispatch(&mut self, listener: Listener) {
        match listener {
            Listener::SelectNext => {
                self.note_list.select_next(&mut self.router, &mut self.bus);
            }
            Listener::SelectPrior => {
                self.note_list.select_prior(&mut self.router, &mut self.bus);
            }
            Listener::RestoreFocus => self.mode = Mode::List,
            Listener::CommitDeletion(id) => {
                if let Some(action) = self.note_list.selection_moved(&id) {
                    self.apply(action);
                }
            }
            Listener::RequestNewNote => {
                self.push_notification("new note: add it to the library file".to_string());
            }
            Listener::DeleteSelected => {
                if let Some(id) = self.note_list.selected(&self.router).cloned() {
                    self.open_confirm(id);
                }
            }
            Listener::FocusDetail => {
                if self.router.location().key.is_some() {
                    self.mode = Mode::Detail;
                }
            }
        }
    }

    fn apply(&mut self, action: StoreAction) {
        tracing::info!("store action {action:?}");
        self.library.apply(action);
        self.sidebar.refresh(&self.library);
        self.sync();
    }

    fn reload_library(&mut self) {
        match self.library_file.load() {
            Ok(next) => {
                self.library.replace_with(next);
                self.sidebar.refresh(&self.library);
                tracing::info!("library reloaded, {} notes", self.library.note_map.len());
            }
            Err(err) => {
                tracing::warn!("library reload failed: {err}");
                self.push_notification(format!("library reload failed: {err}"));
            }
        }
    }

    fn handle_note_deleted(&mut self, id: NoteId, result: Result<NoteId, String>) {
        let failure = result.as_ref().err().cloned();
        if let Some(action) = self.note_list.delete_finished(&id, result, &mut self.bus) {
            self.apply(action);
        }
        if let Some(err) = failure {
            self.push_notification(format!("delete failed: {err}"));
        }
    }

    fn open_confirm(&mut self, id: NoteId) {
        if self.note_list.is_deleting(&id) {
            self.push_notification(format!("already deleting {id}"));
            return;
        }
        self.confirm = Some(ConfirmDialog {
            target: id,
            highlighted: 0,
        });
        self.mode = Mode::ConfirmDelete;
    }

    fn answer_confirm(&mut self, index: usize) {
        let Some(dialog) = self.confirm.take() else {
            return;
        };
        self.mode = Mode::List;

        let choice = DialogChoice::from_index(index);
        match self
            .note_list
            .confirm_delete(dialog.target, choice, &self.router, &mut self.bus)
        {
            Ok(Some(id)) => {
                // selection moves off the note before the delete is dispatched
                self.pump_bus();
                self.dispatch_delete(id);
            }
            Ok(None) => {}
            Err(err) => self.push_notification(err.to_string()),
        }
    }

    fn dispatch_delete(&self, id: NoteId) {
        let api = Arc::clone(&self.data_api);
        let tx = self.event_tx.clone();
        std::thread::spawn(move || {
            let result = api
                .delete_note(id.storage_key(), id.note_key())
                .map_err(|err| err.to_string());
            if tx.send(Msg::NoteDeleted { id, result }).is_err() {
                tracing::warn!("delete finished after shutdown");
            }
        });
    }

    fn push_notification(&mut self, message: String) {
        self.notifications.push_back(message);
        while self.notifications.len() > 8 {
            self.notifications.pop_front();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::List => self.handle_key_list(key),
            Mode::Sidebar => self.handle_key_sidebar(key),
            Mode::Detail => self.handle_key_detail(key),
            Mode::ContextMenu => self.handle_key_menu(key),
            Mode::ConfirmDelete => self.handle_key_confirm(key),
        }
    }

    fn handle_key_list(&mut self, key: KeyEvent) {
        if self.note_list.handle_key(key, &mut self.router, &mut self.bus) == KeyOutcome::Handled {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('e') {
            self.sidebar_visible = !self.sidebar_visible;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Backspace => {
                if self.router.back() {
                    self.sidebar.select_path(&self.router.location().pathname);
                }
            }
            KeyCode::Tab => {
                self.sidebar_visible = true;
                self.sidebar.select_path(&self.router.location().pathname);
                self.mode = Mode::Sidebar;
            }
            _ => {}
        }
    }

    fn handle_key_sidebar(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('e') {
            self.sidebar_visible = false;
            self.mode = Mode::List;
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Tab => self.mode = Mode::List,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.sidebar.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.sidebar.move_selection(-1),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(node) = self.sidebar.selected_node() {
                    let path = node.context.path();
                    if path != self.router.location().pathname {
                        self.router.push(Location::new(path));
                    }
                    self.mode = Mode::List;
                }
            }
            _ => {}
        }
    }

    fn handle_key_detail(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.bus.emit(Topic::LostFocus),
            KeyCode::Char('k') | KeyCode::Up => self.bus.emit(Topic::ListPrior),
            KeyCode::Char('j') | KeyCode::Down => self.bus.emit(Topic::ListNext),
            KeyCode::Char('d') => self.bus.emit(Topic::DetailDelete),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_key_menu(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::List;
                if let Some(id) = self.menu_target.take() {
                    self.open_confirm(id);
                }
            }
            KeyCode::Esc => {
                self.menu_target = None;
                self.mode = Mode::List;
            }
            _ => {}
        }
    }

    fn handle_key_confirm(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                if let Some(dialog) = self.confirm.as_mut() {
                    dialog.highlighted = 1 - dialog.highlighted;
                }
            }
            KeyCode::Enter => {
                let index = self.confirm.as_ref().map_or(1, |dialog| dialog.highlighted);
                self.answer_confirm(index);
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => self.answer_confirm(0),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.answer_confirm(1),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if matches!(self.mode, Mode::ConfirmDelete | Mode::ContextMenu) {
            return;
        }
        if !self.list_area.contains(Position::new(mouse.column, mouse.row)) {
            return;
        }

        let row = usize::from(mouse.row - self.list_area.y);
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.note_list.scroll_by(WHEEL_ROWS);
            }
            MouseEventKind::ScrollUp => {
                self.note_list.scroll_by(-WHEEL_ROWS);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = self.note_list.item_at_row(row).cloned() {
                    self.note_list.click(&id, &mut self.router);
                    self.mode = Mode::List;
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(id) = self.note_list.item_at_row(row).cloned() {
                    self.menu_target = Some(id);
                    self.mode = Mode::ContextMenu;
                }
            }
            _ => {}
        }
    }

    // ── MVU: View ────────────────────────────────────────────────

    pub fn view(&mut self, frame: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        let mut constraints = Vec::with_capacity(3);
        if self.sidebar_visible {
            constraints.push(Constraint::Length(self.config.list.sidebar_width));
        }
        constraints.push(Constraint::Percentage(45));
        constraints.push(Constraint::Min(20));

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(outer[0]);

        let mut next_pane = 0;
        if self.sidebar_visible {
            self.render_sidebar(frame, panes[0]);
            next_pane = 1;
        }
        self.render_note_list(frame, panes[next_pane]);
        self.render_detail(frame, panes[next_pane + 1]);
        self.render_status_bar(frame, outer[1]);

        match self.mode {
            Mode::ContextMenu => self.render_context_menu(frame),
            Mode::ConfirmDelete => self.render_confirm_dialog(frame),
            _ => {}
        }
    }

    fn pane_block(&self, title: String, focused: bool) -> Block<'static> {
        let border = if focused { Color::Cyan } else { Color::DarkGray };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(Color::Rgb(12, 12, 18)))
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let current = NavigationContext::from_path(&self.router.location().pathname);
        let lines: Vec<Line> = self
            .sidebar
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let indent = "  ".repeat(node.depth);
                let is_current = current.as_ref() == Some(&node.context);
                let marker = if is_current { "● " } else { "  " };
                let label = format!("{indent}{marker}{}", node.name);

                if self.mode == Mode::Sidebar && idx == self.sidebar.selected {
                    Line::from(Span::styled(
                        label,
                        Style::default().fg(Color::Black).bg(Color::Cyan),
                    ))
                } else if is_current {
                    Line::from(Span::styled(label, Style::default().fg(Color::Cyan)))
                } else {
                    Line::from(Span::styled(label, Style::default().fg(Color::Gray)))
                }
            })
            .collect();

        let block = self.pane_block(" Library ".to_string(), self.mode == Mode::Sidebar);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn context_title(&self) -> String {
        match NavigationContext::from_path(&self.router.location().pathname) {
            Some(NavigationContext::Home) => "All Notes".to_string(),
            Some(NavigationContext::Starred) => "Starred".to_string(),
            Some(NavigationContext::Storage { storage_key }) => self
                .library
                .storage(&storage_key)
                .map_or(storage_key, |storage| storage.name.clone()),
            Some(NavigationContext::Folder {
                storage_key,
                folder_key,
            }) => self
                .library
                .storage(&storage_key)
                .and_then(|storage| storage.folder(&folder_key))
                .map_or(folder_key, |folder| folder.name.clone()),
            None => "Notes".to_string(),
        }
    }

    fn render_note_list(&mut self, frame: &mut Frame, area: Rect) {
        let block = self.pane_block(format!(" {} ", self.context_title()), self.mode == Mode::List);
        let inner = block.inner(area);
        self.list_area = inner;
        if self.note_list.set_viewport_height(usize::from(inner.height)) {
            self.layout_dirty = true;
        }

        let item_height = self.note_list.geometry().item_height;
        let selected = self.router.location().key.clone();
        let mut lines: Vec<Line> = Vec::new();
        for id in self.note_list.visible() {
            let active = selected.as_deref() == Some(id.to_string().as_str());
            let mut item = self.note_item_lines(id, active);
            item.resize(item_height, Line::default());
            lines.extend(item);
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                " No notes",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let scroll = u16::try_from(self.note_list.window().scroll_top()).unwrap_or(u16::MAX);
        let list = Paragraph::new(lines).block(block).scroll((scroll, 0));
        frame.render_widget(list, area);
    }

    fn note_item_lines(&self, id: &NoteId, active: bool) -> Vec<Line<'static>> {
        let Some(note) = self.library.note(id) else {
            return Vec::new();
        };

        let base = if self.note_list.is_deleting(id) {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        } else if active {
            Style::default().fg(Color::White).bg(Color::Rgb(30, 40, 60))
        } else {
            Style::default().fg(Color::Gray)
        };
        let edge = if active { "▌" } else { " " };

        let (place, color) = self.note_place(note);
        let info = Line::from(vec![
            Span::styled(edge, base.fg(Color::Cyan)),
            Span::styled(place, base.fg(color)),
            Span::styled(format!("  {}", HumanTime::from(note.updated_at)), base.fg(Color::DarkGray)),
        ]);

        let icon = match note.kind {
            NoteKind::Snippet => "</> ",
            NoteKind::Markdown => " ≡  ",
        };
        let title = match note.display_title() {
            Some(title) => Span::styled(title.to_string(), base.add_modifier(Modifier::BOLD)),
            None => Span::styled(
                "Empty",
                base.fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        };
        let title = Line::from(vec![
            Span::styled(edge, base.fg(Color::Cyan)),
            Span::styled(icon, base),
            title,
        ]);

        let tags = if note.tags.is_empty() {
            Span::styled(
                "Not tagged yet",
                base.fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::styled(note.tags.join(", "), base.fg(Color::Magenta))
        };
        let tags = Line::from(vec![
            Span::styled(edge, base.fg(Color::Cyan)),
            Span::styled(" #  ", base.fg(Color::DarkGray)),
            tags,
        ]);

        vec![info, title, tags]
    }

    /// "<folder> in <storage>" label and the folder's color.
    fn note_place(&self, note: &Note) -> (String, Color) {
        let storage = self.library.storage(&note.storage);
        let storage_name = storage.map_or(note.storage.as_str(), |s| s.name.as_str());
        let folder = note
            .folder
            .as_deref()
            .and_then(|key| storage.and_then(|s| s.folder(key)));

        match folder {
            Some(folder) => (
                format!("{} in {storage_name}", folder.name),
                parse_hex_color(&folder.color).unwrap_or(Color::Gray),
            ),
            None => (format!("Unfiled in {storage_name}"), Color::Gray),
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = self.pane_block(" Note ".to_string(), self.mode == Mode::Detail);
        let selected = self.note_list.selected(&self.router);
        let Some(note) = selected.and_then(|id| self.library.note(id)) else {
            let empty = Paragraph::new(Span::styled(
                "No note selected",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        };

        let label = Style::default().fg(Color::DarkGray);
        let (place, _) = self.note_place(note);
        let lines = vec![
            Line::from(Span::styled(
                note.display_title().unwrap_or("Empty").to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("type     ", label),
                Span::raw(note.kind.label()),
            ]),
            Line::from(vec![Span::styled("where    ", label), Span::raw(place)]),
            Line::from(vec![
                Span::styled("tags     ", label),
                Span::raw(if note.tags.is_empty() {
                    "-".to_string()
                } else {
                    note.tags.join(", ")
                }),
            ]),
            Line::from(vec![
                Span::styled("updated  ", label),
                Span::raw(format!(
                    "{} ({})",
                    note.updated_at.format("%Y-%m-%d %H:%M"),
                    HumanTime::from(note.updated_at)
                )),
            ]),
            Line::from(vec![
                Span::styled("starred  ", label),
                Span::raw(if note.starred { "yes" } else { "no" }),
            ]),
            Line::default(),
            Line::from(Span::styled(
                " e: focus  d: delete  Esc: back to list ",
                label,
            )),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let total = self.note_list.notes().len();
        let shown = self.note_list.visible().len();
        let location = self.router.location();

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode.label()),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", location.pathname),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!(" {shown}/{total} "),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        let deleting = self.note_list.pending_deletes();
        if deleting > 0 {
            spans.push(Span::styled(
                format!(" deleting {deleting} "),
                Style::default().fg(Color::Red),
            ));
        }

        if let Some(note) = self.notifications.back() {
            spans.push(Span::styled(
                format!(" {note}"),
                Style::default().fg(Color::Yellow),
            ));
        }

        let bar = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(Color::Rgb(20, 20, 30)));
        frame.render_widget(bar, area);
    }

    fn render_context_menu(&self, frame: &mut Frame) {
        let area = centered_rect(30, 15, frame.area());
        frame.render_widget(Clear, area);

        let menu = Paragraph::new(vec![
            Line::from(Span::styled(
                "> Delete Note",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            )),
            Line::from(Span::styled(
                "  Enter: choose  Esc: close",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Rgb(15, 15, 24))),
        );
        frame.render_widget(menu, area);
    }

    fn render_confirm_dialog(&self, frame: &mut Frame) {
        let Some(dialog) = self.confirm.as_ref() else {
            return;
        };

        let area = centered_rect(50, 25, frame.area());
        frame.render_widget(Clear, area);

        let buttons: Vec<Span> = DialogChoice::BUTTONS
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                if idx == dialog.highlighted {
                    Span::styled(
                        format!(" [{label}] "),
                        Style::default().fg(Color::Black).bg(Color::Yellow),
                    )
                } else {
                    Span::styled(format!("  {label}  "), Style::default().fg(Color::Gray))
                }
            })
            .collect();

        let title = self
            .library
            .note(&dialog.target)
            .and_then(Note::display_title)
            .unwrap_or("Empty")
            .to_string();

        let body = Paragraph::new(vec![
            Line::from(Span::styled(
                title,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from("This work cannot be undone."),
            Line::default(),
            Line::from(buttons),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Delete a note ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().bg(Color::Rgb(15, 15, 24))),
        );
        frame.render_widget(body, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn parse_hex_color(raw: &str) -> Option<Color> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
