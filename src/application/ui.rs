use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::FileType;
use crate::domain::models::Loading;
use crate::domain::models::NotificationLevel;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::UploadStatus;
use crate::infrastructure::knowledge_bases::KnowledgeBaseManager;

const EMPTY_CHAT: &str = "Ask me anything about your documents!";

fn render_upload<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let colour = match app_state.upload.status() {
        UploadStatus::Idle => Color::Reset,
        UploadStatus::Uploading(_) => Color::Yellow,
        UploadStatus::Success(_) => Color::Green,
        UploadStatus::Error(_) => Color::Red,
    };

    let lines = vec![
        Line::from(Span::styled(
            app_state.upload.describe(),
            Style::default().fg(colour),
        )),
        Line::from(Span::styled(
            FileType::accepted(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(if app_state.upload.is_uploading() {
                    "Upload (in progress)"
                } else {
                    "Upload"
                })
                .padding(Padding::new(1, 1, 0, 0)),
        ),
        rect,
    );
}

fn render_documents<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let documents = app_state.documents.documents();
    let mut lines: Vec<Line> = vec![];

    if documents.is_empty() {
        let placeholder = if app_state.documents.is_loading() {
            "Loading documents..."
        } else {
            "No documents uploaded yet"
        };
        lines.push(Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (idx, document) in documents.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("({}) ", idx + 1), Style::default().fg(Color::Cyan)),
            Span::styled(
                document.filename.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", document.summary()),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(format!("Documents ({})", documents.len()))
                .padding(Padding::new(1, 1, 0, 0)),
        ),
        rect,
    );
}

fn render_notifications<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let notifications = app_state.notifications.visible();
    if notifications.is_empty() {
        return;
    }

    let width = (rect.width / 2).max(30).min(rect.width);
    let mut y = rect.y;
    for notification in notifications.iter() {
        if y + 3 > rect.y + rect.height {
            break;
        }

        let colour = match notification.level {
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Error => Color::Red,
        };
        let toast_rect = Rect::new(rect.x + rect.width - width, y, width, 3);

        frame.render_widget(Clear, toast_rect);
        frame.render_widget(
            Paragraph::new(notification.text.as_str())
                .style(Style::default().fg(colour))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(colour))
                        .padding(Padding::new(1, 1, 0, 0)),
                ),
            toast_rect,
        );

        y += 3;
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::default();
    let loading = Loading::new("Thinking...");

    loop {
        terminal.draw(|frame| {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(frame.size());

            let sidebar = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Length(4), Constraint::Min(1)])
                .split(columns[0]);

            let chat = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
                .split(columns[1]);

            if chat[0].width != app_state.last_known_width
                || chat[0].height != app_state.last_known_height
            {
                app_state.set_rect(chat[0]);
            }

            render_upload(frame, sidebar[0], app_state);
            render_documents(frame, sidebar[1], app_state);

            if app_state.bubble_list.is_empty() {
                frame.render_widget(
                    Paragraph::new(EMPTY_CHAT)
                        .style(Style::default().fg(Color::DarkGray))
                        .alignment(Alignment::Center)
                        .block(Block::default().padding(Padding::new(0, 0, chat[0].height / 2, 0))),
                    chat[0],
                );
            } else {
                app_state
                    .bubble_list
                    .render(frame, chat[0], app_state.scroll.position);
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    chat[0].inner(&Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    &mut app_state.scroll.scrollbar_state,
                );
            }

            render_notifications(frame, chat[0], app_state);

            if app_state.conversation.is_loading() {
                loading.render(frame, chat[1]);
            } else {
                frame.render_widget(textarea.widget(), chat[1]);
            }
        })?;

        match events.next().await? {
            Event::KeyboardCharInput(input) => {
                if !app_state.conversation.is_loading() {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if !app_state.conversation.is_loading() {
                    for char in text.chars() {
                        if char == '\n' {
                            textarea.insert_newline();
                        } else if char != '\r' {
                            textarea.insert_char(char);
                        }
                    }
                }
            }
            Event::KeyboardCTRLC() => {
                if !app_state.abort(&tx)? {
                    break;
                }
            }
            Event::KeyboardCTRLL() => {
                app_state.clear();
            }
            Event::KeyboardEnter() => {
                if app_state.conversation.is_loading() {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    continue;
                }
                textarea = TextArea::default();

                let (should_break, should_continue) =
                    app_state.handle_slash_commands(&input_str, &tx)?;
                if should_break {
                    break;
                }
                if should_continue {
                    continue;
                }

                app_state.submit_question(&input_str, &tx)?;
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                app_state.tick(Instant::now());
            }
            event => {
                app_state.handle_event(event, &tx)?;
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(
        &Config::get(ConfigKey::Theme),
        &Config::get(ConfigKey::ThemeFile),
        Config::get_number(ConfigKey::NumSources)?,
        Config::get_number(ConfigKey::HistoryLimit)?,
    )?;

    let api_url = Config::get(ConfigKey::ApiURL);
    app_state
        .health_check(&KnowledgeBaseManager::get(), &api_url)
        .await;
    app_state.refresh_documents(&tx)?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
