use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use rust_decimal::Decimal;

use crate::{
    app::{
        Screen,
        login::{LoginField, LoginForm},
        utils::{centered_rect, change_color, mood_color, sentiment_color, source_color},
    },
    format::{
        format_currency, format_date_time, format_optional_percentage, format_percentage,
        format_published, truncate,
    },
    models::{MarketSnapshot, NewsItem, PollResults, Quote, SectorPerformance, User},
    services::{SnapshotChoice, StockFilter, filter_stocks, market_mood, top_movers},
};

const MOVERS: usize = 5;
const NEWS_ITEMS: usize = 6;
const HEADLINE_WIDTH: usize = 80;
const HELP: &str = "F5 Refresh | F4 CSV | F6 PDF | 1-9 Vote | / Search | a/g/l Filter | F9 Logout | q Quit";
const SEARCH_HELP: &str = "Type to search | Enter keep | Esc clear";

pub struct PollView {
    pub results: PollResults,
    pub total_votes: u32,
    pub voted_option: Option<String>,
}

/// Everything a single frame needs, borrowed from the app.
pub struct View<'a> {
    pub screen: Screen,
    pub login_form: &'a LoginForm,
    pub user: Option<&'a User>,
    pub snapshot: Option<&'a SnapshotChoice>,
    pub banner: Option<&'a str>,
    pub poll: Option<&'a PollView>,
    pub popup_message: Option<&'a str>,
    pub error_popup: Option<&'a str>,
    pub status_message: Option<&'a str>,
    pub stock_query: &'a str,
    pub stock_filter: StockFilter,
    pub searching: bool,
}

pub fn render(frame: &mut Frame, view: &View) {
    match view.screen {
        Screen::Login => render_login(frame, view.login_form),
        Screen::Dashboard => render_dashboard(frame, view),
    }

    if let Some(message) = view.popup_message {
        render_popup(frame, "Please wait", message, Color::Cyan);
    }

    if let Some(message) = view.error_popup {
        render_popup(frame, "Error (Enter to dismiss)", message, Color::Red);
    }
}

fn render_login(frame: &mut Frame, form: &LoginForm) {
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, area);

    let field_style = |field: LoginField| {
        if form.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "ORION Dashboard Access",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Email:    ", field_style(LoginField::Email)),
            Span::raw(form.email.clone()),
        ]),
    ];
    if let Some(error) = &form.errors.email {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("Password: ", field_style(LoginField::Password)),
        Span::raw(form.masked_password()),
    ]));
    if let Some(error) = &form.errors.password {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab switch field | Enter sign in | Esc quit",
        Style::default().fg(Color::DarkGray),
    )));

    let login = Paragraph::new(lines)
        .block(Block::default().title("Sign in").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(login, area);
}

fn render_dashboard(frame: &mut Frame, view: &View) {
    let banner_height = if view.banner.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], view);

    if let Some(banner) = view.banner {
        let banner = Paragraph::new(banner)
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(banner, chunks[1]);
    }

    let help = if view.searching { SEARCH_HELP } else { HELP };
    let footer_text = match view.status_message {
        Some(status) => format!("{}  |  {}", status, help),
        None => help.to_string(),
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[3]);

    let Some(choice) = view.snapshot else {
        let loading = Paragraph::new("Loading market data...")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, chunks[2]);
        return;
    };
    let snapshot = choice.snapshot();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(snapshot.indices().len() as u16 + 3),
            Constraint::Length(snapshot.stocks().len() as u16 + 3),
            Constraint::Length(MOVERS as u16 + 2),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    frame.render_widget(quote_table("Global Indices", snapshot.indices()), left[0]);
    frame.render_widget(quote_table("Stocks", snapshot.stocks()), left[1]);
    render_movers(frame, left[2], snapshot.stocks());
    frame.render_widget(performers_panel(snapshot.stocks(), view), left[3]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(snapshot.sectors().len() as u16 + 3),
            Constraint::Min(0),
            Constraint::Length(poll_height(view.poll)),
        ])
        .split(columns[1]);

    frame.render_widget(mood_panel(snapshot), right[0]);
    frame.render_widget(sector_table(snapshot.sectors()), right[1]);
    frame.render_widget(news_list(snapshot.news()), right[2]);
    if let Some(poll) = view.poll {
        frame.render_widget(poll_panel(poll), right[3]);
    }
}

fn render_header(frame: &mut Frame, area: Rect, view: &View) {
    let mut spans = vec![Span::styled(
        "ORION Market Intelligence",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if let Some(user) = view.user {
        spans.push(Span::raw(format!("  |  {}", user.email())));
    }

    if let Some(choice) = view.snapshot {
        let updated = choice.snapshot().last_updated().with_timezone(&Local);
        spans.push(Span::raw(format!("  |  Updated {}  |  ", format_date_time(&updated))));
        spans.push(Span::styled(
            choice.source().to_string(),
            Style::default()
                .fg(source_color(choice.source()))
                .add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn quote_table<'a>(title: &'a str, quotes: &'a [Quote]) -> Table<'a> {
    let header_cells = ["Name", "Symbol", "Price", "Change", "% Change"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = quotes.iter().map(|quote| {
        let color = change_color(quote.change_percent());
        Row::new([
            Cell::from(quote.label().to_string()),
            Cell::from(quote.symbol().clone()),
            Cell::from(format_currency(*quote.price())),
            Cell::from(format_currency(*quote.change())).style(Style::default().fg(color)),
            Cell::from(format_percentage(*quote.change_percent()))
                .style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let widths = [
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(10),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
}

fn render_movers(frame: &mut Frame, area: Rect, stocks: &[Quote]) {
    let (gainers, losers) = top_movers(stocks, MOVERS);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    frame.render_widget(movers_list("Top Gainers", &gainers), halves[0]);
    frame.render_widget(movers_list("Top Losers", &losers), halves[1]);
}

fn movers_list<'a>(title: &'a str, movers: &[Quote]) -> Paragraph<'a> {
    let lines: Vec<Line> = movers
        .iter()
        .map(|quote| {
            Line::from(vec![
                Span::raw(format!("{:<12}", quote.label())),
                Span::styled(
                    format_percentage(*quote.change_percent()),
                    Style::default().fg(change_color(quote.change_percent())),
                ),
            ])
        })
        .collect();

    Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL))
}

fn performers_panel<'a>(stocks: &[Quote], view: &View) -> Paragraph<'a> {
    let performers = filter_stocks(stocks, view.stock_query, view.stock_filter);

    let mut lines: Vec<Line> = performers
        .iter()
        .map(|quote| {
            Line::from(vec![
                Span::raw(format!("{:<14}", quote.label())),
                Span::raw(format!("{:>14}  ", format_currency(*quote.price()))),
                Span::styled(
                    format_percentage(*quote.change_percent()),
                    Style::default().fg(change_color(quote.change_percent())),
                ),
            ])
        })
        .collect();

    if lines.is_empty() && !view.stock_query.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("No stocks found matching \"{}\"", view.stock_query),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let cursor = if view.searching { "_" } else { "" };
    let title = format!(
        "Top Performers [{}] search: {}{}",
        view.stock_filter, view.stock_query, cursor
    );

    Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL))
}

fn mood_panel(snapshot: &MarketSnapshot) -> Paragraph<'_> {
    let mood = market_mood(snapshot);
    let change = |value: Option<Decimal>| {
        value.map_or_else(|| String::from("n/a"), format_percentage)
    };
    let balance_color = if mood.gainers() > mood.losers() {
        Color::Green
    } else {
        Color::Red
    };

    let lines = vec![
        Line::from(Span::styled(
            mood.mood().to_string(),
            Style::default()
                .fg(mood_color(mood.mood()))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Gainers/Losers "),
            Span::styled(
                format!("{} / {}", mood.gainers(), mood.losers()),
                Style::default().fg(balance_color),
            ),
            Span::raw(format!(
                "  |  Sensex {}  |  Nifty {}",
                change(*mood.sensex_change()),
                change(*mood.nifty_change())
            )),
        ]),
    ];

    Paragraph::new(lines).block(Block::default().title("Market Mood").borders(Borders::ALL))
}

fn sector_table(sectors: &[SectorPerformance]) -> Table<'_> {
    let header_cells = ["Sector", "1D", "5D", "1M"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = sectors.iter().map(|sector| {
        Row::new([
            Cell::from(sector.name().clone()),
            Cell::from(format_percentage(*sector.one_day()))
                .style(Style::default().fg(change_color(sector.one_day()))),
            Cell::from(format_optional_percentage(*sector.five_day())),
            Cell::from(format_optional_percentage(*sector.one_month())),
        ])
        .height(1)
    });

    let widths = [
        Constraint::Length(24),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().title("Sector Performance").borders(Borders::ALL))
}

fn news_list(news: &[NewsItem]) -> Paragraph<'_> {
    let mut lines = Vec::new();
    for item in news.iter().take(NEWS_ITEMS) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", item.sentiment()),
                Style::default().fg(sentiment_color(item.sentiment())),
            ),
            Span::raw(truncate(item.title(), HEADLINE_WIDTH)),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "    {} | {}",
                item.source(),
                format_published(item.published_at())
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    Paragraph::new(lines).block(Block::default().title("Market News").borders(Borders::ALL))
}

fn poll_height(poll: Option<&PollView>) -> u16 {
    poll.map_or(0, |poll| poll.results.results().len() as u16 + 5)
}

fn poll_panel(poll: &PollView) -> Paragraph<'_> {
    let mut lines = vec![Line::from(Span::styled(
        poll.results.question().clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for (i, option) in poll.results.results().iter().enumerate() {
        let chosen = poll.voted_option.as_deref() == Some(option.id().as_str());
        let style = if chosen {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{}. {:<28} {:>5.1}% ({})",
                i + 1,
                option.text(),
                option.percentage(),
                option.votes()
            ),
            style,
        )));
    }

    let footer = match &poll.voted_option {
        Some(_) => format!("You voted | {} votes", poll.total_votes),
        None => format!(
            "Press 1-{} to vote | {} votes",
            poll.results.results().len(),
            poll.total_votes
        ),
    };
    lines.push(Line::from(Span::styled(
        footer,
        Style::default().fg(Color::DarkGray),
    )));

    Paragraph::new(lines).block(Block::default().title("Community Poll").borders(Borders::ALL))
}

fn render_popup(frame: &mut Frame, title: &str, message: &str, color: Color) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let popup = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(popup, area);
}
