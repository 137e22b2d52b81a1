use std::io::stdout;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use artview_client::Artwork;
use artview_core::fetch::dispatch;
use artview_core::{
    DisplayState, LoadOutcome, PageLoader, PageRequest, PageResponse, SelectionError,
    SelectionReconciler,
};

use crate::source::Source;
use crate::util;

/// Checkbox + rank gutter: "[x] 123456 "
const GUTTER: usize = 11;
const CELL_WEIGHTS: [usize; 6] = [5, 2, 5, 3, 1, 1];

struct TuiApp {
    rec: SelectionReconciler<Artwork>,
    loader: Arc<dyn PageLoader<Artwork>>,
    tx: Sender<PageResponse<Artwork>>,
    rx: Receiver<PageResponse<Artwork>>,
    /// Row offset within the current page
    cursor_row: usize,
    label: String,
    should_quit: bool,
    show_help: bool,
    /// Message for the status bar, cleared on the next key
    status: Option<String>,
    /// Validation message shown inside the count prompt
    prompt_error: Option<String>,
}

impl TuiApp {
    fn new(source: Source) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rec: SelectionReconciler::new(source.page_size),
            loader: source.loader,
            tx,
            rx,
            cursor_row: 0,
            label: source.label,
            should_quit: false,
            show_help: false,
            status: None,
            prompt_error: None,
        }
    }

    fn request(&mut self, request: Option<PageRequest>) {
        if let Some(request) = request {
            dispatch(Arc::clone(&self.loader), request, self.tx.clone());
        }
    }

    fn go_to(&mut self, page: usize) {
        let request = self.rec.on_page_change(page).ok();
        self.request(request);
    }

    /// Apply every response that has arrived since the last frame.
    fn drain_responses(&mut self) {
        while let Ok(response) = self.rx.try_recv() {
            self.apply(response);
        }
    }

    fn apply(&mut self, response: PageResponse<Artwork>) {
        let shown = self.rec.window().map(|w| w.page());
        match self.rec.on_page_loaded(response) {
            LoadOutcome::Committed { page } => {
                // A new page starts at its first row; a reload keeps the cursor.
                if shown == Some(page) {
                    let len = self.rec.window().map(|w| w.len()).unwrap_or(0);
                    self.cursor_row = self.cursor_row.min(len.saturating_sub(1));
                } else {
                    self.cursor_row = 0;
                }
            }
            LoadOutcome::Failed(err) => {
                self.status = Some(format!("load failed: {} (r to retry)", err));
            }
            LoadOutcome::Stale { .. } => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // Any key dismisses help
            self.show_help = false;
            return;
        }
        if self.rec.prompt().open {
            self.handle_prompt_key(key);
            return;
        }
        self.status = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => self.cursor_row = self.cursor_row.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.rec.window().map(|w| w.len()).unwrap_or(0);
                if self.cursor_row + 1 < len {
                    self.cursor_row += 1;
                }
            }
            KeyCode::Char(' ') => {
                let result = self.rec.toggle_at(self.cursor_row).map(|_| ());
                self.report_edit(result);
            }
            KeyCode::Char('a') => {
                let result = self.rec.check_page();
                self.report_edit(result);
            }
            KeyCode::Char('A') => {
                let result = self.rec.uncheck_page();
                self.report_edit(result);
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => {
                let request = self.rec.next_page();
                self.request(request);
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => {
                let request = self.rec.prev_page();
                self.request(request);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                let request = self.rec.first_page();
                self.request(Some(request));
            }
            KeyCode::End | KeyCode::Char('G') => {
                let request = self.rec.last_page();
                self.request(Some(request));
            }
            KeyCode::Char('r') => {
                let request = self.rec.retry();
                self.request(request);
            }
            KeyCode::Char('#') | KeyCode::Char('s') => {
                self.prompt_error = None;
                self.rec.open_prompt();
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.rec.close_prompt(),
            KeyCode::Backspace => self.rec.pop_draft(),
            KeyCode::Char(c) => self.rec.push_draft(c),
            KeyCode::Enter => match self.rec.submit_prompt() {
                Ok(()) => {
                    self.prompt_error = None;
                    self.status = Some(format!("selected first {} rows", self.rec.virtual_count()));
                }
                Err(err) => self.prompt_error = Some(err.to_string()),
            },
            _ => {}
        }
    }

    fn report_edit(&mut self, result: Result<(), SelectionError>) {
        if let Err(SelectionError::NotLoaded) = result {
            self.status = Some("page is still loading".to_string());
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let state = self.rec.display_state();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0], &state);
        self.draw_banner(frame, chunks[1], &state);
        self.draw_table(frame, chunks[2], &state);
        self.draw_footer(frame, chunks[3], &state);
        self.draw_status(frame, chunks[4], &state);

        if self.rec.prompt().open {
            self.draw_prompt(frame, area);
        }
        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect, state: &DisplayState<'_, Artwork>) {
        let loading = if state.loading { " | loading..." } else { "" };
        let title = format!(
            " artview: {} | page {}/{}{} ",
            self.label, state.page, state.page_count, loading
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_banner(&self, frame: &mut Frame, area: Rect, state: &DisplayState<'_, Artwork>) {
        let para = Paragraph::new(Line::from(Span::styled(
            format!(" {}", state.banner()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(para, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, state: &DisplayState<'_, Artwork>) {
        if state.rows.is_empty() {
            let msg = match (state.loading, state.error) {
                (true, _) => "(loading)".to_string(),
                (false, Some(err)) => format!("(failed: {})", err),
                (false, None) => "(empty)".to_string(),
            };
            let para = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(para, area);
            return;
        }

        let cells_width = (area.width as usize).saturating_sub(GUTTER + CELL_WEIGHTS.len());
        let widths = util::split_widths(cells_width, &CELL_WEIGHTS, 4);

        let mut header_spans = vec![Span::styled(
            " ".repeat(GUTTER),
            Style::default().fg(Color::DarkGray),
        )];
        for (name, w) in Artwork::COLUMNS.iter().zip(&widths) {
            header_spans.push(Span::styled(
                format!("{} ", util::fit(name, *w)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }

        let visible_rows = (area.height as usize).saturating_sub(1);
        let mut lines: Vec<Line> = Vec::with_capacity(visible_rows + 1);
        lines.push(Line::from(header_spans));

        // Pages are small; scroll just enough to keep the cursor in view.
        let scroll = (self.cursor_row + 1).saturating_sub(visible_rows);
        for (offset, row) in state.rows.iter().enumerate().skip(scroll).take(visible_rows) {
            let is_cursor = offset == self.cursor_row;
            let check = if row.selected { "[x]" } else { "[ ]" };
            let check_style = match (row.selected, row.overridden) {
                (true, true) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Green),
                (false, true) => Style::default().fg(Color::Red),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            let text_style = if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let mut spans = vec![
                Span::styled(format!("{} ", check), check_style),
                Span::styled(format!("{:>6} ", row.rank), Style::default().fg(Color::DarkGray)),
            ];
            for (cell, w) in row.record.cells().iter().zip(&widths) {
                spans.push(Span::styled(format!("{} ", util::fit(cell, *w)), text_style));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, state: &DisplayState<'_, Artwork>) {
        let left = format!(" {}", state.footer);
        let right = format!("{} ", state.selected_summary());
        let padding = (area.width as usize)
            .saturating_sub(util::display_width(&left) + util::display_width(&right));
        let para = Paragraph::new(Line::from(vec![
            Span::raw(left),
            Span::raw(" ".repeat(padding)),
            Span::styled(right, Style::default().add_modifier(Modifier::BOLD)),
        ]));
        frame.render_widget(para, area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, state: &DisplayState<'_, Artwork>) {
        let left = match (&self.status, state.error) {
            (Some(msg), _) => format!(" {}", msg),
            (None, Some(err)) => format!(" load failed: {} (r to retry)", err),
            (None, None) => format!(" virtual count: {}", self.rec.virtual_count()),
        };
        let right = "space: toggle  #: select N  ?: help ";
        let padding = (area.width as usize)
            .saturating_sub(left.chars().count() + right.chars().count());
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);

        let para = Paragraph::new(Line::from(vec![Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        )]))
        .style(Style::default().bg(Color::DarkGray));
        frame.render_widget(para, area);
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect) {
        let popup = centered(area, 36, 6);
        let prompt = self.rec.prompt();
        let draft = if prompt.draft.is_empty() {
            Span::styled("Enter row count...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(prompt.draft.clone(), Style::default().fg(Color::White))
        };
        let error = self.prompt_error.clone().unwrap_or_default();
        let lines = vec![
            Line::from(vec![Span::raw(" > "), draft]),
            Line::from(""),
            Line::from(Span::styled(format!(" {}", error), Style::default().fg(Color::Red))),
            Line::from(Span::styled(
                " enter: select  esc: close",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Select Multiple Rows ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Rows",
            "  ----",
            "  up / k, down / j  Move cursor",
            "  space             Toggle row",
            "  a                 Check whole page",
            "  A                 Clear whole page",
            "  # / s             Select first N rows",
            "",
            "  Pages",
            "  -----",
            "  n / right / PgDn  Next page",
            "  p / left / PgUp   Previous page",
            "  g / Home          First page",
            "  G / End           Last page",
            "  r                 Retry failed load",
            "",
            "  General",
            "  -------",
            "  q / Esc           Quit",
            "  ?                 Toggle this help",
            "",
        ];
        let popup = centered(area, 44, help_lines.len() as u16 + 2);

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(
        area.x + x,
        area.y + y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Run the interactive table, opening `first_page`.
pub fn run(source: Source, first_page: usize) -> Result<(), String> {
    let mut app = TuiApp::new(source);
    app.go_to(first_page);
    run_app(app)
}

fn run_app(mut app: TuiApp) -> Result<(), String> {
    terminal::enable_raw_mode()
        .map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        app.drain_responses();

        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100))
            .map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) =
                event::read().map_err(|e| format!("event read error: {}", e))?
            {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
