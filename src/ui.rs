//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  This makes it easy to change the
//! visual layout without touching the sync pipeline.
//!
//! ## For contributors
//!
//! * The layout is three rows: the filter tab bar, the feed list (or the
//!   detail pane when an item is open), and a one-line status bar.
//! * Colours and styles are defined inline.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::filter::FilterSelection;
use crate::source::FeedKind;
use crate::sync::SyncState;
use crate::view_model::FeedViewModel;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [tabs_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_filter_tabs(app, frame, tabs_area);
    match &app.detail {
        Some(detail) => draw_detail(detail, frame, main_area),
        None => draw_feed_list(app, frame, main_area),
    }
    draw_status_bar(app, frame, status_area);
}

fn draw_filter_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles = FilterSelection::ALL
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{} {}", i + 1, f.label()));

    let tabs = Tabs::new(titles)
        .select(app.sync.filter().index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn kind_badge(kind: &FeedKind) -> Span<'static> {
    match kind {
        FeedKind::Text(_) => Span::styled("[text] ", Style::default().fg(Color::Cyan)),
        FeedKind::Image(_) => Span::styled("[img]  ", Style::default().fg(Color::Magenta)),
        FeedKind::Other(_) => Span::styled("[other]", Style::default().fg(Color::Gray)),
    }
}

/// Render the scrollable feed list.
fn draw_feed_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .sync
        .filtered()
        .iter()
        .map(|vm| {
            let line = Line::from(vec![
                kind_badge(&vm.kind),
                Span::raw(" "),
                Span::styled(&vm.title, Style::default().fg(Color::White)),
                Span::raw("  "),
                Span::styled(&vm.subtitle, Style::default().fg(Color::DarkGray)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(" User Feeds ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the detail pane for one item.
fn draw_detail(vm: &FeedViewModel, frame: &mut Frame, area: Rect) {
    let body = match &vm.kind {
        FeedKind::Image(url) => format!("Image: {}", url.as_deref().unwrap_or("(no url)")),
        kind => kind.payload().unwrap_or("(no content)").to_string(),
    };

    let text = vec![
        Line::from(Span::styled(
            vm.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            vm.subtitle.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
        Line::raw(body),
    ];

    let detail = Paragraph::new(text)
        .block(Block::default().title(" Feed Detail ").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

fn status_text(app: &App) -> String {
    let updated = app
        .sync
        .last_published()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".into());

    match app.sync.state() {
        SyncState::Idle => "Starting…".into(),
        SyncState::Loading => "Loading…".into(),
        SyncState::Loaded => format!("Updated {updated}"),
        SyncState::LoadedFromCache => format!("Offline: showing cached feed ({updated})"),
    }
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(status_text(app), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{}/{} items", app.sync.filtered().len(), app.sync.all().len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  r: refresh  Tab: filter  Enter: open"),
    ]));
    frame.render_widget(status, area);
}
