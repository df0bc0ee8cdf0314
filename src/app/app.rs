use std::{io, path::PathBuf, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use crate::{
    api::MarketDataSource,
    app::{
        Dashboard, LoginForm,
        ui::{self, PollView, View},
    },
    services::{ExportFormat, PollService, SessionService, StockFilter, export_service},
};

const TICK: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    Login,
    Dashboard,
}

pub struct App<S> {
    dashboard: Dashboard<S>,
    session: SessionService,
    polls: PollService,
    login_form: LoginForm,
    screen: Screen,
    popup_message: Option<String>,
    error_popup: Option<String>,
    status_message: Option<String>,
    stock_query: String,
    stock_filter: StockFilter,
    searching: bool,
    export_dir: PathBuf,
    refresh_interval: Duration,
}

impl<S: MarketDataSource> App<S> {
    pub fn new(
        dashboard: Dashboard<S>,
        session: SessionService,
        polls: PollService,
        export_dir: PathBuf,
        refresh_interval: Duration,
    ) -> Self {
        let screen = if session.is_authenticated() {
            Screen::Dashboard
        } else {
            Screen::Login
        };

        Self {
            dashboard,
            session,
            polls,
            login_form: LoginForm::default(),
            screen,
            popup_message: None,
            error_popup: None,
            status_message: None,
            stock_query: String::new(),
            stock_filter: StockFilter::default(),
            searching: false,
            export_dir,
            refresh_interval,
        }
    }

    fn show_popup(&mut self, message: &str) {
        self.popup_message = Some(message.to_string());
    }

    fn clear_popup(&mut self) {
        self.popup_message = None;
    }

    fn show_error_popup(&mut self, message: &str) {
        self.error_popup = Some(message.to_string());
    }

    fn clear_error_popup(&mut self) {
        self.error_popup = None;
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            if self.screen == Screen::Dashboard
                && self.dashboard.is_refresh_due(self.refresh_interval)
            {
                self.refresh(terminal).await?;
            }

            self.draw(terminal)?;

            if !event::poll(TICK)? {
                continue;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if self.error_popup.is_some() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                        self.clear_error_popup();
                    }
                    continue;
                }

                let keep_running = match self.screen {
                    Screen::Login => self.handle_login_key(key.code),
                    Screen::Dashboard => self.handle_dashboard_key(key.code, terminal).await?,
                };

                if !keep_running {
                    return Ok(());
                }
            }
        }
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        let poll = self.poll_view();
        let view = View {
            screen: self.screen,
            login_form: &self.login_form,
            user: self.session.current_user(),
            snapshot: self.dashboard.current(),
            banner: self.dashboard.banner(),
            poll: poll.as_ref(),
            popup_message: self.popup_message.as_deref(),
            error_popup: self.error_popup.as_deref(),
            status_message: self.status_message.as_deref(),
            stock_query: &self.stock_query,
            stock_filter: self.stock_filter,
            searching: self.searching,
        };

        terminal.draw(|frame| ui::render(frame, &view))?;
        Ok(())
    }

    fn poll_view(&self) -> Option<PollView> {
        let poll = self.polls.get_all_polls().into_iter().next()?;
        let results = self.polls.get_poll_results(poll.id())?;
        let voted_option = self
            .session
            .current_user()
            .and_then(|user| self.polls.get_user_vote_for_poll(poll.id(), user.id()));

        Some(PollView {
            results,
            total_votes: *poll.total_votes(),
            voted_option,
        })
    }

    async fn refresh<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.show_popup("Fetching market data...");
        self.draw(terminal)?;

        self.dashboard.refresh().await;

        self.clear_popup();
        Ok(())
    }

    fn handle_login_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => return false,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login_form.toggle_focus()
            }
            KeyCode::Backspace => self.login_form.pop(),
            KeyCode::Enter => match self.session.login(&self.login_form.credentials()) {
                Ok(user) => {
                    info!("Signed in as {}", user.email());
                    self.login_form.clear();
                    self.status_message = None;
                    self.screen = Screen::Dashboard;
                }
                Err(errors) => self.login_form.errors = errors,
            },
            KeyCode::Char(c) => self.login_form.push(c),
            _ => {}
        }
        true
    }

    async fn handle_dashboard_key<B: Backend>(
        &mut self,
        code: KeyCode,
        terminal: &mut Terminal<B>,
    ) -> Result<bool> {
        if self.searching {
            self.handle_search_key(code);
            return Ok(true);
        }

        match code {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('a') => self.stock_filter = StockFilter::All,
            KeyCode::Char('g') => self.stock_filter = StockFilter::Gainers,
            KeyCode::Char('l') => self.stock_filter = StockFilter::Losers,
            KeyCode::F(5) => {
                self.refresh(terminal).await?;
                self.status_message = None;
            }
            KeyCode::F(4) => self.export(ExportFormat::Csv),
            KeyCode::F(6) => self.export(ExportFormat::Pdf),
            KeyCode::F(9) => {
                self.session.logout();
                self.status_message = None;
                self.screen = Screen::Login;
            }
            KeyCode::Char(c @ '1'..='9') => self.vote(c),
            _ => {}
        }
        Ok(true)
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.searching = false,
            KeyCode::Esc => {
                self.stock_query.clear();
                self.searching = false;
            }
            KeyCode::Backspace => {
                self.stock_query.pop();
            }
            KeyCode::Char(c) => self.stock_query.push(c),
            _ => {}
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(snapshot) = self.dashboard.snapshot() else {
            self.show_error_popup("Nothing to export yet.");
            return;
        };

        match export_service::export_report(
            format,
            snapshot.indices(),
            snapshot.stocks(),
            &self.export_dir,
        ) {
            Ok(path) => {
                self.status_message = Some(format!("Exported {} to {}", format, path.display()))
            }
            Err(e) => self.show_error_popup(&format!("Error exporting report: {:?}", e)),
        }
    }

    fn vote(&mut self, digit: char) {
        let Some(user_id) = self.session.current_user().map(|user| user.id().clone()) else {
            return;
        };
        let Some(poll) = self.polls.get_all_polls().into_iter().next() else {
            return;
        };

        let index = digit as usize - '1' as usize;
        let Some(option_id) = poll.options().get(index).map(|option| option.id().clone()) else {
            return;
        };
        let poll_id = poll.id().clone();

        match self.polls.vote(&poll_id, &option_id, &user_id) {
            Ok(()) => self.status_message = Some("Vote recorded.".to_string()),
            Err(e) => {
                warn!("Vote on poll {} rejected: {}", poll_id, e);
                self.show_error_popup(&e.to_string());
            }
        }
    }
}
