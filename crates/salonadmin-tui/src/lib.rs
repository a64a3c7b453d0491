// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use salonadmin_app::{
    AppCommand, AppEvent, AppMode, AppState, DashboardMetrics, DeleteOutcome, ImpersonateOutcome,
    PendingAction, PresetAnswer, SessionListener, Tenant, TenantList, TenantStore,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(4);

/// Host-side capabilities the dashboard needs.
pub trait AppRuntime {
    type Store: TenantStore;

    fn store(&self) -> &Self::Store;
    fn store_mut(&mut self) -> &mut Self::Store;
    /// Ends the super-admin view; the host decides what signing out means.
    fn logout(&mut self) -> Result<()>;
}

/// Why the dashboard stopped running.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardExit {
    Quit,
    LoggedOut,
    /// An impersonation session was written; the host must re-read it.
    SessionChanged(Tenant),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    pub status_timeout: Duration,
    pub initial_search: String,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            initial_search: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Default)]
struct ReloadSignal {
    tenant: Option<Tenant>,
}

impl SessionListener for ReloadSignal {
    fn on_session_change(&mut self, tenant: &Tenant) {
        self.tenant = Some(tenant.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewData {
    pub list: TenantList,
    pub cursor: usize,
    pub status_token: u64,
    pub status_timeout: Duration,
    pub exit: Option<DashboardExit>,
}

impl ViewData {
    pub fn new(mut list: TenantList, options: &DashboardOptions) -> Self {
        if !options.initial_search.is_empty() {
            list.set_search(options.initial_search.clone());
        }
        Self {
            list,
            cursor: 0,
            status_token: 0,
            status_timeout: options.status_timeout,
            exit: None,
        }
    }

    pub fn selected(&self) -> Option<&Tenant> {
        self.list.filtered_view().get(self.cursor).copied()
    }

    fn visible_len(&self) -> usize {
        self.list.filtered_view().len()
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let max = (len - 1) as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: DashboardOptions,
) -> Result<DashboardExit> {
    let list = TenantList::mount(runtime.store()).context("load tenants")?;
    let mut view_data = ViewData::new(list, &options);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result?;
    Ok(view_data.exit.unwrap_or(DashboardExit::Quit))
}

fn process_internal_events(state: &mut AppState, view_data: &ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token, view_data.status_timeout);
}

/// Applies one key press. Returns `true` when the dashboard should stop; the
/// reason is left in `view_data.exit`.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        view_data.exit = Some(DashboardExit::Quit);
        return true;
    }

    match state.mode {
        AppMode::Confirm(_) => handle_confirm_key(state, runtime, view_data, internal_tx, key),
        AppMode::Search => {
            handle_search_key(state, view_data, key);
            false
        }
        AppMode::Browse => handle_browse_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.dispatch(AppCommand::BlurSearch);
        }
        KeyCode::Backspace => {
            view_data.list.pop_search_char();
            view_data.clamp_cursor();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.list.push_search_char(ch);
            view_data.clamp_cursor();
        }
        _ => {}
    }
}

fn handle_browse_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            view_data.exit = Some(DashboardExit::Quit);
            return true;
        }
        KeyCode::Char('/') => {
            state.dispatch(AppCommand::FocusSearch);
        }
        KeyCode::Char('j') | KeyCode::Down => view_data.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => view_data.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => view_data.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => view_data.move_cursor(isize::MAX / 2),
        KeyCode::Char('d') => match view_data.selected() {
            Some(tenant) => {
                let email = tenant.email.clone();
                state.dispatch(AppCommand::RequestConfirm(PendingAction::Delete { email }));
            }
            None => emit_status(state, view_data, internal_tx, "no salon selected"),
        },
        KeyCode::Char('i') => match view_data.selected() {
            Some(tenant) => {
                let tenant = tenant.clone();
                state.dispatch(AppCommand::RequestConfirm(PendingAction::Impersonate {
                    tenant,
                }));
            }
            None => emit_status(state, view_data, internal_tx, "no salon selected"),
        },
        KeyCode::Char('L') => match runtime.logout() {
            Ok(()) => {
                info!("super admin logged out");
                view_data.exit = Some(DashboardExit::LoggedOut);
                return true;
            }
            Err(error) => {
                warn!(error = %format!("{error:#}"), "logout failed");
                emit_status(state, view_data, internal_tx, format!("logout failed: {error:#}"));
            }
        },
        _ => {}
    }
    false
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let answer = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return false,
    };

    let Some(action) = state
        .dispatch(AppCommand::ResolveConfirm)
        .into_iter()
        .find_map(|event| match event {
            AppEvent::ConfirmResolved(action) => Some(action),
            _ => None,
        })
    else {
        return false;
    };

    // Both answers go through the action so a decline is handled by the same gate.
    let mut gate = PresetAnswer(answer);
    match action {
        PendingAction::Delete { email } => {
            let outcome = view_data
                .list
                .delete_tenant(runtime.store_mut(), &mut gate, &email);
            let message = match outcome {
                Ok(DeleteOutcome::Declined) => "delete canceled".to_owned(),
                Ok(DeleteOutcome::Deleted { removed: 0, .. }) => {
                    format!("no salon with email {email}")
                }
                Ok(DeleteOutcome::Deleted { .. }) => {
                    view_data.clamp_cursor();
                    format!("deleted {email}")
                }
                Err(error) => {
                    warn!(email = %email, error = %format!("{error:#}"), "delete failed");
                    format!("delete failed: {error:#}")
                }
            };
            emit_status(state, view_data, internal_tx, message);
            false
        }
        PendingAction::Impersonate { tenant } => {
            let mut signal = ReloadSignal::default();
            let outcome =
                view_data
                    .list
                    .impersonate(runtime.store_mut(), &mut gate, &mut signal, &tenant);
            match outcome {
                Ok(ImpersonateOutcome::SessionWritten) => {
                    if let Some(tenant) = signal.tenant {
                        view_data.exit = Some(DashboardExit::SessionChanged(tenant));
                        return true;
                    }
                    false
                }
                Ok(ImpersonateOutcome::Declined) => {
                    emit_status(state, view_data, internal_tx, "impersonation canceled");
                    false
                }
                Err(error) => {
                    warn!(email = %tenant.email, error = %format!("{error:#}"), "impersonation failed");
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("impersonation failed: {error:#}"),
                    );
                    false
                }
            }
        }
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(metrics_line(&view_data.list.metrics())).block(
        Block::default()
            .title("salonadmin · super admin")
            .borders(Borders::ALL),
    );
    frame.render_widget(header, layout[0]);

    let search_focused = state.mode == AppMode::Search;
    let search_style = if search_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_bar_text(view_data.list.search(), search_focused))
        .style(search_style)
        .block(Block::default().title("search").borders(Borders::ALL));
    frame.render_widget(search, layout[1]);

    render_table(frame, layout[2], view_data);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);

    if let Some(action) = state.pending_action() {
        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(vec![
            Line::from(action.prompt()),
            Line::from(""),
            Line::from(Span::styled(
                "[y] confirm   [n] cancel",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(action.label())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(modal, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let visible = view_data.list.filtered_view();
    let title = table_title(visible.len(), view_data.list.tenants().len());

    if visible.is_empty() {
        let empty = Paragraph::new(empty_table_message(&view_data.list))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let rows = visible.iter().map(|tenant| {
        Row::new(
            tenant_row_cells(tenant)
                .into_iter()
                .map(Cell::from)
                .collect::<Vec<_>>(),
        )
    });
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["email", "salon", "joined"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::REVERSED),
    )
    .block(Block::default().title(title).borders(Borders::ALL));

    let mut table_state = TableState::default().with_selected(Some(view_data.cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

pub fn metrics_line(metrics: &DashboardMetrics) -> String {
    format!(
        "tenants {}  ·  est. revenue {}/mo  ·  uptime {}  ·  growth {}",
        metrics.tenant_count,
        format_revenue(metrics.revenue_estimate),
        metrics.uptime,
        metrics.growth,
    )
}

pub fn format_revenue(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₹{grouped}")
}

fn search_bar_text(search: &str, focused: bool) -> String {
    if focused {
        format!("{search}_")
    } else if search.is_empty() {
        "press / to search by email or salon name".to_owned()
    } else {
        search.to_owned()
    }
}

fn tenant_row_cells(tenant: &Tenant) -> [String; 3] {
    [
        tenant.email.clone(),
        tenant.display_name().to_owned(),
        tenant.joined_display(),
    ]
}

fn table_title(visible: usize, total: usize) -> String {
    if visible == total {
        format!("salons ({total})")
    } else {
        format!("salons ({visible} of {total})")
    }
}

fn empty_table_message(list: &TenantList) -> String {
    if list.tenants().is_empty() {
        "no salons registered yet".to_owned()
    } else {
        format!("no salons match {:?}", list.search())
    }
}

fn status_text(state: &AppState) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    match state.mode {
        AppMode::Browse => {
            "j/k move · / search · d delete · i impersonate · L logout · q quit".to_owned()
        }
        AppMode::Search => "type to filter · enter/esc done · backspace erase".to_owned(),
        AppMode::Confirm(_) => "y confirm · n cancel".to_owned(),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, DashboardExit, DashboardOptions, InternalEvent, ViewData, empty_table_message,
        format_revenue, handle_key_event, metrics_line, process_internal_events, render,
        search_bar_text, status_text, table_title, tenant_row_cells,
    };
    use anyhow::{Result, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use salonadmin_app::{
        AppMode, AppState, PendingAction, Tenant, TenantList, TenantStore,
    };
    use salonadmin_testkit::{MemoryStore, alpha_beta};
    use std::sync::mpsc;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct TestRuntime {
        store: MemoryStore,
        logout_count: usize,
        fail_logout: bool,
    }

    impl TestRuntime {
        fn with_tenants(tenants: &[Tenant]) -> Result<Self> {
            Ok(Self {
                store: MemoryStore::with_tenants(tenants)?,
                ..Self::default()
            })
        }
    }

    impl AppRuntime for TestRuntime {
        type Store = MemoryStore;

        fn store(&self) -> &MemoryStore {
            &self.store
        }

        fn store_mut(&mut self) -> &mut MemoryStore {
            &mut self.store
        }

        fn logout(&mut self) -> Result<()> {
            if self.fail_logout {
                bail!("session store locked");
            }
            self.logout_count += 1;
            Ok(())
        }
    }

    fn view_data_for(runtime: &TestRuntime) -> Result<ViewData> {
        let list = TenantList::mount(runtime.store())?;
        Ok(ViewData::new(list, &DashboardOptions::default()))
    }

    fn internal_tx() -> mpsc::Sender<InternalEvent> {
        let (tx, _rx) = mpsc::channel();
        tx
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run_keys(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        keys: &[KeyCode],
    ) -> bool {
        let tx = internal_tx();
        let mut stopped = false;
        for code in keys {
            stopped = handle_key_event(state, runtime, view_data, &tx, key(*code));
            if stopped {
                break;
            }
        }
        stopped
    }

    fn type_text(text: &str) -> Vec<KeyCode> {
        text.chars().map(KeyCode::Char).collect()
    }

    #[test]
    fn search_keys_filter_the_table() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        let mut keys = vec![KeyCode::Char('/')];
        keys.extend(type_text("BETA"));
        keys.push(KeyCode::Enter);
        run_keys(&mut state, &mut runtime, &mut view_data, &keys);

        assert_eq!(state.mode, AppMode::Browse);
        assert_eq!(view_data.list.search(), "BETA");
        assert_eq!(
            view_data.selected().map(|tenant| tenant.email.as_str()),
            Some("b@y.com")
        );
        Ok(())
    }

    #[test]
    fn backspace_widens_the_filter() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        let mut keys = vec![KeyCode::Char('/')];
        keys.extend(type_text("zz"));
        run_keys(&mut state, &mut runtime, &mut view_data, &keys);
        assert!(view_data.list.filtered_view().is_empty());
        assert!(view_data.selected().is_none());

        run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Backspace, KeyCode::Backspace, KeyCode::Esc],
        );
        assert_eq!(view_data.list.filtered_view().len(), 2);
        Ok(())
    }

    #[test]
    fn letters_typed_while_searching_are_not_commands() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        let stopped = run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('/'), KeyCode::Char('q'), KeyCode::Char('d')],
        );
        assert!(!stopped);
        assert_eq!(state.mode, AppMode::Search);
        assert_eq!(view_data.list.search(), "qd");
        Ok(())
    }

    #[test]
    fn delete_then_accept_removes_selected_row() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        run_keys(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('d')]);
        assert_eq!(
            state.pending_action(),
            Some(&PendingAction::Delete {
                email: "a@x.com".to_owned(),
            })
        );

        run_keys(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('y')]);
        assert_eq!(state.mode, AppMode::Browse);
        assert_eq!(state.status_line.as_deref(), Some("deleted a@x.com"));
        assert_eq!(view_data.list.tenants().len(), 1);
        assert_eq!(runtime.store.load_tenants()?.len(), 1);
        Ok(())
    }

    #[test]
    fn delete_then_decline_keeps_everything() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('j'), KeyCode::Char('d'), KeyCode::Esc],
        );
        assert_eq!(state.status_line.as_deref(), Some("delete canceled"));
        assert_eq!(view_data.list.tenants().len(), 2);
        assert_eq!(runtime.store.write_count(), 0);
        Ok(())
    }

    #[test]
    fn unrelated_keys_keep_modal_open() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('d'), KeyCode::Char('x'), KeyCode::Enter],
        );
        assert!(state.pending_action().is_some());
        Ok(())
    }

    #[test]
    fn failed_delete_write_is_shown_in_status() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();
        runtime.store.set_fail_writes(true);

        run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('d'), KeyCode::Char('y')],
        );
        let status = state.status_line.clone().unwrap_or_default();
        assert!(status.starts_with("delete failed"), "got {status}");
        assert!(status.contains("quota"));
        assert_eq!(view_data.list.tenants().len(), 2);
        Ok(())
    }

    #[test]
    fn cursor_stays_in_bounds_after_deleting_last_row() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[
                KeyCode::Char('G'),
                KeyCode::Char('d'),
                KeyCode::Char('y'),
            ],
        );
        assert_eq!(view_data.cursor, 0);
        assert_eq!(
            view_data.selected().map(|tenant| tenant.email.as_str()),
            Some("a@x.com")
        );
        Ok(())
    }

    #[test]
    fn accepted_impersonation_stops_with_session_change() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        let stopped = run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Down, KeyCode::Char('i'), KeyCode::Char('y')],
        );
        assert!(stopped);

        let beta = Tenant::new("b@y.com").with_salon_name("Beta");
        assert_eq!(view_data.exit, Some(DashboardExit::SessionChanged(beta.clone())));
        assert_eq!(runtime.store.current_session()?, Some(beta));
        Ok(())
    }

    #[test]
    fn declined_impersonation_keeps_running() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        let stopped = run_keys(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[KeyCode::Char('i'), KeyCode::Char('n')],
        );
        assert!(!stopped);
        assert_eq!(view_data.exit, None);
        assert_eq!(runtime.store.current_session()?, None);
        assert_eq!(state.status_line.as_deref(), Some("impersonation canceled"));
        Ok(())
    }

    #[test]
    fn actions_on_empty_list_report_no_selection() -> Result<()> {
        let mut runtime = TestRuntime::default();
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        run_keys(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('d')]);
        assert_eq!(state.mode, AppMode::Browse);
        assert_eq!(state.status_line.as_deref(), Some("no salon selected"));
        Ok(())
    }

    #[test]
    fn logout_invokes_host_callback() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        let stopped = run_keys(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('L')]);
        assert!(stopped);
        assert_eq!(runtime.logout_count, 1);
        assert_eq!(view_data.exit, Some(DashboardExit::LoggedOut));
        Ok(())
    }

    #[test]
    fn failed_logout_keeps_dashboard_open() -> Result<()> {
        let mut runtime = TestRuntime {
            fail_logout: true,
            ..TestRuntime::default()
        };
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();

        let stopped = run_keys(&mut state, &mut runtime, &mut view_data, &[KeyCode::Char('L')]);
        assert!(!stopped);
        assert!(
            state
                .status_line
                .as_deref()
                .is_some_and(|status| status.contains("session store locked"))
        );
        Ok(())
    }

    #[test]
    fn ctrl_q_quits_from_any_mode() -> Result<()> {
        let mut runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let mut view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();
        state.dispatch(salonadmin_app::AppCommand::FocusSearch);

        let stopped = handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &internal_tx(),
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        assert!(stopped);
        assert_eq!(view_data.exit, Some(DashboardExit::Quit));
        Ok(())
    }

    #[test]
    fn stale_status_clear_is_ignored() -> Result<()> {
        let runtime = TestRuntime::default();
        let mut view_data = view_data_for(&runtime)?;
        view_data.status_token = 2;
        let mut state = AppState::default();
        state.dispatch(salonadmin_app::AppCommand::SetStatus("deleted".to_owned()));

        let (tx, rx) = mpsc::channel();
        tx.send(InternalEvent::ClearStatus { token: 1 })?;
        process_internal_events(&mut state, &view_data, &rx);
        assert_eq!(state.status_line.as_deref(), Some("deleted"));

        tx.send(InternalEvent::ClearStatus { token: 2 })?;
        process_internal_events(&mut state, &view_data, &rx);
        assert_eq!(state.status_line, None);
        Ok(())
    }

    #[test]
    fn status_clear_is_scheduled_after_timeout() -> Result<()> {
        let mut runtime = TestRuntime::default();
        let list = TenantList::mount(runtime.store())?;
        let mut view_data = ViewData::new(
            list,
            &DashboardOptions {
                status_timeout: Duration::from_millis(10),
                ..DashboardOptions::default()
            },
        );
        let mut state = AppState::default();
        let (tx, rx) = mpsc::channel();

        handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE),
        );
        assert!(state.status_line.is_some());

        let event = rx.recv_timeout(Duration::from_secs(2))?;
        assert_eq!(event, InternalEvent::ClearStatus { token: 1 });
        Ok(())
    }

    #[test]
    fn initial_search_is_applied_on_open() -> Result<()> {
        let runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let list = TenantList::mount(runtime.store())?;
        let view_data = ViewData::new(
            list,
            &DashboardOptions {
                initial_search: "alpha".to_owned(),
                ..DashboardOptions::default()
            },
        );
        assert_eq!(view_data.list.filtered_view().len(), 1);
        Ok(())
    }

    #[test]
    fn revenue_is_grouped_by_thousands() {
        assert_eq!(format_revenue(0), "₹0");
        assert_eq!(format_revenue(1_499), "₹1,499");
        assert_eq!(format_revenue(2_998_000), "₹2,998,000");
    }

    #[test]
    fn metrics_line_shows_all_badges() -> Result<()> {
        let store = MemoryStore::with_tenants(&alpha_beta())?;
        let list = TenantList::mount(&store)?;
        let line = metrics_line(&list.metrics());
        assert!(line.contains("tenants 2"));
        assert!(line.contains("₹2,998/mo"));
        assert!(line.contains("99.9%"));
        assert!(line.contains("+12%"));
        Ok(())
    }

    #[test]
    fn row_cells_use_fallbacks() {
        let cells = tenant_row_cells(&Tenant::new("bare@example.com"));
        assert_eq!(cells, ["bare@example.com", "Unknown Salon", "N/A"].map(String::from));
    }

    #[test]
    fn helper_texts() {
        assert_eq!(table_title(2, 2), "salons (2)");
        assert_eq!(table_title(1, 2), "salons (1 of 2)");
        assert_eq!(search_bar_text("be", true), "be_");
        assert!(search_bar_text("", false).contains("press /"));
        assert!(empty_table_message(&TenantList::new()).contains("no salons registered"));

        let state = AppState::default();
        assert!(status_text(&state).contains("d delete"));
    }

    #[test]
    fn render_draws_rows_and_modal() -> Result<()> {
        let runtime = TestRuntime::with_tenants(&alpha_beta())?;
        let view_data = view_data_for(&runtime)?;
        let mut state = AppState::default();
        state.dispatch(salonadmin_app::AppCommand::RequestConfirm(
            PendingAction::Delete {
                email: "a@x.com".to_owned(),
            },
        ));

        let mut terminal = Terminal::new(TestBackend::new(100, 30))?;
        terminal.draw(|frame| render(frame, &state, &view_data))?;

        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("b@y.com"));
        assert!(screen.contains("[y] confirm"));
        Ok(())
    }
}
