use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
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
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Alert;
use crate::domain::models::AuthenticatedUser;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::ThemeName;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::HistoryDirection;
use crate::domain::services::LongPress;
use crate::domain::services::Preferences;
use crate::domain::services::Themes;
use crate::infrastructure::storage::StorageManager;

struct ChatLayout {
    chat: Rect,
    pinned: Option<Rect>,
    status: Rect,
    input: Rect,
}

fn chat_layout(area: Rect, has_pins: bool) -> ChatLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);

    if !has_pins {
        return ChatLayout {
            chat: rows[0],
            pinned: None,
            status: rows[1],
            input: rows[2],
        };
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[0]);

    return ChatLayout {
        chat: columns[0],
        pinned: Some(columns[1]),
        status: rows[1],
        input: rows[2],
    };
}

fn pinned_lines(messages: &[Message], max_width: usize) -> Vec<Line<'static>> {
    return messages
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            let first_line = message.content().lines().next().unwrap_or_default();
            let mut text = format!("{}. {}", idx + 1, first_line);
            if text.chars().count() > max_width {
                text = text
                    .chars()
                    .take(max_width.saturating_sub(3))
                    .collect::<String>();
                text = format!("{text}...");
            }
            return Line::from(text);
        })
        .collect();
}

fn status_text(user: &AuthenticatedUser, theme: ThemeName, speech_supported: bool) -> String {
    let mut hints = vec![
        "Enter send",
        "Up/Down history",
        "Ctrl+P pin",
        "/help commands",
    ];
    if speech_supported {
        hints.push("/voice speak");
    }
    hints.push("Ctrl+C quit");

    return format!(
        " {} | {theme} theme | {}",
        user.name,
        hints.join(" | ")
    );
}

fn draw(
    frame: &mut Frame,
    app_state: &mut AppState<'_>,
    loading: &Loading,
    user: &AuthenticatedUser,
) {
    let palette = Themes::get(app_state.theme);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        frame.size(),
    );

    let layout = chat_layout(frame.size(), !app_state.pinned_messages.is_empty());
    if layout.chat != app_state.chat_rect || layout.pinned != app_state.pinned_rect {
        app_state.set_rect(layout.chat, layout.pinned);
    }

    app_state
        .bubble_list
        .render(frame, layout.chat, app_state.scroll.position);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        layout.chat.inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app_state.scroll.scrollbar_state,
    );

    if let Some(pinned_rect) = layout.pinned {
        let lines = pinned_lines(
            &app_state.pinned_messages,
            usize::from(pinned_rect.width.saturating_sub(2)),
        );
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().fg(palette.pinned)).block(
                Block::default()
                    .title("Pinned")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            ),
            pinned_rect,
        );
    }

    if app_state.is_loading() {
        loading.render(frame, layout.status, "Waiting for response...");
    } else if app_state.listening {
        loading.render(frame, layout.status, "Listening...");
    } else {
        frame.render_widget(
            Paragraph::new(status_text(
                user,
                app_state.theme,
                app_state.speech_supported,
            ))
            .style(Style::default().add_modifier(Modifier::DIM)),
            layout.status,
        );
    }

    frame.render_widget(app_state.textarea.widget(), layout.input);

    if let Some(alert) = &app_state.alert {
        let area = frame.size();
        Alert::render(frame, area, alert);
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    user: &AuthenticatedUser,
    tx: mpsc::UnboundedSender<Action>,
    event_tx: mpsc::UnboundedSender<Event>,
    event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(event_rx);
    let mut loading = Loading::default();
    let mut long_press = LongPress::default();

    loop {
        terminal.draw(|frame| {
            draw(frame, app_state, &loading, user);
        })?;

        let event = events.next().await?;
        let alert_open = app_state.alert.is_some();

        match event {
            Event::ActionMessage(message) => {
                app_state.add_message(message);
            }
            Event::BackendResponse(response) => {
                app_state.handle_backend_response(response);
            }
            Event::KeyboardCharInput(input) => {
                if !alert_open {
                    app_state.textarea.input(input);
                }
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLP() => {
                if !alert_open {
                    app_state.toggle_pin_last();
                }
            }
            Event::KeyboardEnter() => {
                if alert_open {
                    app_state.dismiss_alert();
                } else {
                    let text = app_state.input();
                    app_state.submit(&text, &tx)?;
                }
            }
            Event::KeyboardEsc() => {
                app_state.dismiss_alert();
            }
            Event::KeyboardHistoryNext() => {
                if !alert_open {
                    app_state.navigate_history(HistoryDirection::Next);
                }
            }
            Event::KeyboardHistoryPrevious() => {
                if !alert_open {
                    app_state.navigate_history(HistoryDirection::Previous);
                }
            }
            Event::KeyboardPaste(text) => {
                if !alert_open {
                    app_state.textarea.insert_str(text);
                }
            }
            Event::LongPress(press, message_id) => {
                if long_press.accept(press, &message_id) {
                    app_state.toggle_pin(Some(&message_id));
                }
            }
            Event::MouseDown(column, row) => {
                long_press.cancel();
                if let Some(message_id) = app_state.message_id_at(column, row) {
                    long_press.arm(&message_id, &event_tx);
                }
            }
            Event::MouseDrag() | Event::MouseUp() => {
                long_press.cancel();
            }
            Event::SpeechError(reason) => {
                app_state.handle_speech_error(&reason);
            }
            Event::SpeechResult(outcome) => {
                app_state.handle_speech_result(outcome);
            }
            Event::UIResize() => {}
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
                loading.tick();
            }
        }

        if app_state.should_quit {
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    if let Err(err) = disable_raw_mode() {
        eprintln!("Failed to disable raw mode: {err}");
    }
    if let Err(err) = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    ) {
        eprintln!("Failed to restore the terminal: {err}");
    }
}

pub async fn start(
    user: AuthenticatedUser,
    tx: mpsc::UnboundedSender<Action>,
    event_tx: mpsc::UnboundedSender<Event>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    speech_supported: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app_state = AppState::new(
        Preferences::new(StorageManager::get()),
        ThemeName::parse(&Config::get(ConfigKey::Theme)),
        speech_supported,
    );
    app_state.add_message(Message::new(
        Role::System,
        &format!(
            "Welcome, {}! Type a message to start chatting, or /help to see available commands.",
            user.name
        ),
    ));

    start_loop(
        &mut terminal,
        &mut app_state,
        &user,
        tx,
        event_tx,
        event_rx,
    )
    .await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
