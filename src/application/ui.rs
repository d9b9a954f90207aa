use std::io;
use std::time::Duration;

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
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;
#[cfg(feature = "dev")]
use tui_textarea::Input;
#[cfg(feature = "dev")]
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::BackendArc;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::ModelName;
use crate::domain::models::SlashCommand;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::poller::StatusPoller;
use crate::domain::services::AppState;
use crate::domain::services::Inspector;

fn status_line(app_state: &AppState) -> Line<'static> {
    if let Some(alert) = &app_state.alert {
        return Line::from(Span::styled(
            alert.to_string(),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(file_name) = &app_state.upload_in_flight {
        return Line::from(Span::styled(
            format!("Uploading {file_name}..."),
            Style::default().fg(Color::Yellow),
        ));
    }

    return Line::from(Span::styled(
        format!(
            "{} | /help for commands, CTRL+C to quit",
            app_state.model.display_name()
        ),
        Style::default().fg(Color::DarkGray),
    ));
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    let mut textarea = TextArea::default();
    let mut confirmation = TextArea::confirmation();
    let mut loading = Loading::default();

    #[cfg(feature = "dev")]
    {
        let test_str = "What is the notice period for terminating this agreement?";
        for char in test_str.chars() {
            textarea.input(Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
            });
        }
    }

    tx.send(Action::BackendHealthCheck())?;

    loop {
        terminal.draw(|frame| {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(frame.size());

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Min(1),
                    Constraint::Max(4),
                    Constraint::Length(1),
                ])
                .split(columns[0]);

            if layout[0].width != app_state.last_known_width
                || layout[0].height != app_state.last_known_height
            {
                app_state.set_rect(layout[0]);
            }

            app_state
                .bubble_list
                .render(frame, layout[0], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            if app_state.waiting_for_backend {
                loading.render(frame, layout[1], "Searching your documents...");
            } else if app_state.awaiting_reset_confirmation {
                frame.render_widget(confirmation.widget(), layout[1]);
            } else {
                frame.render_widget(textarea.widget(), layout[1]);
            }

            frame.render_widget(Paragraph::new(status_line(app_state)), layout[2]);
            Inspector::render(frame, columns[1], app_state);
        })?;

        match events.next().await? {
            Event::Backend(event) => {
                if let Some(action) = app_state.handle_backend_event(event) {
                    tx.send(action)?;
                }
            }
            Event::KeyboardCTRLC() => {
                break;
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
                loading.tick();
            }
            Event::KeyboardEscape() => {
                app_state.alert = None;
                if app_state.awaiting_reset_confirmation {
                    confirmation = TextArea::confirmation();
                    app_state.awaiting_reset_confirmation = false;
                }
            }
            Event::KeyboardPaste(text) => {
                app_state.alert = None;
                if app_state.awaiting_reset_confirmation {
                    confirmation.insert_str(text);
                } else if !app_state.waiting_for_backend {
                    textarea.insert_str(text);
                }
            }
            Event::KeyboardCharInput(input) => {
                app_state.alert = None;
                if app_state.awaiting_reset_confirmation {
                    confirmation.input(input);
                } else if !app_state.waiting_for_backend {
                    textarea.input(input);
                }
            }
            Event::KeyboardEnter() => {
                app_state.alert = None;
                if app_state.awaiting_reset_confirmation {
                    let answer = confirmation.lines().join("\n");
                    confirmation = TextArea::confirmation();
                    if let Some(action) = app_state.confirm_reset(&answer) {
                        tx.send(action)?;
                    }
                    continue;
                }

                if app_state.waiting_for_backend {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                if SlashCommand::parse(&input_str).is_some() {
                    textarea = TextArea::default();
                    let (should_break, action) = app_state.handle_slash_commands(&input_str);
                    if should_break {
                        break;
                    }
                    if let Some(action) = action {
                        tx.send(action)?;
                    }
                    continue;
                }

                if let Some(action) = app_state.submit_question(&input_str) {
                    textarea = TextArea::default();
                    tx.send(action)?;
                }
            }
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
        DisableBracketedPaste,
        cursor::Show
    ) {
        eprintln!("Failed to restore the terminal: {err}");
    }
}

pub async fn start(
    backend: BackendArc,
    action_tx: mpsc::UnboundedSender<Action>,
    event_tx: mpsc::UnboundedSender<Event>,
    event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let model = ModelName::parse(&Config::get(ConfigKey::Model)).unwrap_or_default();
    let mut app_state = AppState::new(model);
    let poller = StatusPoller::start(
        backend,
        event_tx,
        Duration::from_secs(Config::get_u64(ConfigKey::PollInterval)),
    );

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

    let res = start_loop(&mut terminal, &mut app_state, action_tx, event_rx).await;
    poller.stop().await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
