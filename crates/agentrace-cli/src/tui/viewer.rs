//! Viewer view - scrollable timeline with a navigation sidebar.
//!
//! The sidebar lists the navigation index (one entry per primary message);
//! the entry whose block currently intersects the viewport band is
//! highlighted, so the sidebar tracks the reader's position without any
//! selection state of its own.

use agentrace_timeline::{
    active_block, PermalinkIndex, Role, Timeline, ViewportBand, VisibleBlock,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::common::{render_block_lines, truncate_str};

/// Action returned by the viewer to the top-level loop.
pub enum ViewerAction {
    Quit,
    None,
}

/// Vertical extent of one rendered top-level block, in content lines.
struct BlockExtent {
    id: String,
    start: usize,
    end: usize,
}

/// Viewer state for one compiled session.
pub struct ViewerState {
    timeline: Timeline,
    title: String,
    scroll_offset: usize,
    /// Fragment to jump to once extents exist (from `--goto`).
    pending_goto: Option<String>,
    status_message: Option<String>,

    // Rebuilt whenever the content width changes.
    lines: Vec<Line<'static>>,
    extents: Vec<BlockExtent>,
    layout_width: usize,
}

impl ViewerState {
    pub fn new(timeline: Timeline, title: String, goto: Option<String>) -> Self {
        Self {
            timeline,
            title,
            scroll_offset: 0,
            pending_goto: goto,
            status_message: None,
            lines: Vec::new(),
            extents: Vec::new(),
            layout_width: 0,
        }
    }

    /// Render every top-level block at the given width, recording each
    /// block's line extent for scroll targets and the active-band check.
    fn reflow(&mut self, width: usize) {
        if width == self.layout_width && !self.lines.is_empty() {
            return;
        }
        self.layout_width = width;
        self.lines.clear();
        self.extents.clear();

        for block in &self.timeline.blocks {
            let start = self.lines.len();
            render_block_lines(block, &mut self.lines, width);
            self.extents.push(BlockExtent {
                id: block.id.clone(),
                start,
                end: self.lines.len(),
            });
        }
    }

    fn resolve_pending_goto(&mut self) {
        let Some(fragment) = self.pending_goto.take() else {
            return;
        };
        let index = PermalinkIndex::build(&self.timeline.blocks);
        match index.resolve(&fragment) {
            Some(block_ref) => {
                self.scroll_offset = self.extents[block_ref.index].start;
            }
            None => {
                self.status_message = Some(format!("no block for {}", fragment));
            }
        }
    }

    /// Id of the block intersecting the viewport band, if any.
    fn active_block_id(&self, viewport_height: usize) -> Option<&str> {
        let band = ViewportBand::for_height(viewport_height as i64);
        let visible: Vec<VisibleBlock> = self
            .extents
            .iter()
            .map(|e| VisibleBlock {
                id: &e.id,
                top: e.start as i64 - self.scroll_offset as i64,
                bottom: e.end as i64 - self.scroll_offset as i64,
            })
            .collect();
        active_block(band, &visible)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewerAction {
        if key.kind != KeyEventKind::Press {
            return ViewerAction::None;
        }
        let page = 20;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewerAction::Quit,
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_offset = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll_offset = self.max_scroll(),
            KeyCode::Char('n') => self.jump_message(1),
            KeyCode::Char('p') => self.jump_message(-1),
            _ => {}
        }
        ViewerAction::None
    }

    fn scroll_by(&mut self, delta: i64) {
        let next = self.scroll_offset as i64 + delta;
        self.scroll_offset = next.clamp(0, self.max_scroll() as i64) as usize;
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    /// Jump to the next/previous navigation-index message relative to the
    /// current scroll position.
    fn jump_message(&mut self, direction: i64) {
        let message_starts: Vec<usize> = self
            .timeline
            .messages
            .iter()
            .filter_map(|m| {
                self.extents
                    .iter()
                    .find(|e| e.id == m.id)
                    .map(|e| e.start)
            })
            .collect();
        let target = if direction > 0 {
            message_starts
                .iter()
                .find(|&&start| start > self.scroll_offset)
        } else {
            message_starts
                .iter()
                .rev()
                .find(|&&start| start < self.scroll_offset)
        };
        if let Some(&start) = target {
            self.scroll_offset = start.min(self.max_scroll());
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(f.area());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(10)])
            .split(chunks[0]);

        let content_width = body[1].width.saturating_sub(2) as usize;
        self.reflow(content_width);
        self.resolve_pending_goto();

        let viewport_height = body[1].height.saturating_sub(2) as usize;
        let active_id = self.active_block_id(viewport_height).map(str::to_string);

        // Sidebar: navigation index with the active entry highlighted
        let items: Vec<ListItem> = self
            .timeline
            .messages
            .iter()
            .map(|m| {
                let marker = match m.role {
                    Role::User => "> ",
                    Role::Assistant => "< ",
                };
                let style = if Some(&m.id) == active_id.as_ref() {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(truncate_str(&m.preview, 28).to_string(), style),
                ]))
            })
            .collect();
        let sidebar = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} messages ", self.timeline.messages.len())),
        );
        f.render_widget(sidebar, body[0]);

        // Main pane: rendered blocks from the scroll offset down
        let visible: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll_offset)
            .take(viewport_height)
            .cloned()
            .collect();
        let main = Paragraph::new(visible).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", self.title)),
        );
        f.render_widget(main, body[1]);

        // Status bar
        let status = match &self.status_message {
            Some(msg) => msg.clone(),
            None => format!(
                "line {}/{}  [j/k scroll  n/p message  g/G ends  q quit]",
                self.scroll_offset.min(self.max_scroll()) + 1,
                self.lines.len().max(1)
            ),
        };
        f.render_widget(
            Paragraph::new(Span::styled(status, Style::default().fg(Color::DarkGray))),
            chunks[1],
        );
    }
}
