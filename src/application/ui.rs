use std::io;

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
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::TextArea;
use crate::domain::models::APP_SUBTITLE;
use crate::domain::models::APP_TITLE;
use crate::domain::models::DISCLAIMER;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;

const BRAND_COLOR: Color = Color::Rgb(255, 153, 0);

fn render_header<B: Backend>(frame: &mut Frame<B>, rect: Rect) {
    let title = Line::from(vec![
        Span::styled(
            APP_TITLE,
            Style::default().fg(BRAND_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(APP_SUBTITLE, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(title), rect);
    frame.render_widget(
        Paragraph::new("CTRL+N 新对话").alignment(Alignment::Right),
        rect,
    );
}

fn render_footer<B: Backend>(frame: &mut Frame<B>, rect: Rect) {
    frame.render_widget(
        Paragraph::new(DISCLAIMER)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        rect,
    );
}

fn paste(textarea: &mut tui_textarea::TextArea, text: &str) {
    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\n' => textarea.insert_newline(),
            _ => textarea.insert_char(ch),
        }
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
    let mut loading = Loading::default();

    #[cfg(feature = "dev")]
    {
        use tui_textarea::Input;
        use tui_textarea::Key;

        let test_str = "销量下降原因";
        for char in test_str.chars() {
            textarea.input(Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
            });
        }
    }

    loop {
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Max(4),
                    Constraint::Length(1),
                ])
                .split(frame.size());

            if layout[1].width != app_state.last_known_width
                || layout[1].height != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            render_header(frame, layout[0]);
            app_state
                .bubble_list
                .render(frame, layout[1], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[1].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            if app_state.is_pending() {
                loading.render(frame, layout[2]);
            } else {
                frame.render_widget(textarea.widget(), layout[2]);
            }
            render_footer(frame, layout[3]);
        })?;

        match events.next().await? {
            Event::BackendTurn(turn_event) => {
                app_state.handle_turn_event(turn_event);
            }
            Event::KeyboardCharInput(input) => {
                if !app_state.is_pending() {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if !app_state.is_pending() {
                    paste(&mut textarea, &text);
                }
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLN() => {
                if app_state.reset_conversation() {
                    tx.send(Action::ResetSession())?;
                }
            }
            Event::KeyboardEnter() => {
                if app_state.is_pending() {
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

                if let Some(text) = app_state.submit(&input_str) {
                    tx.send(Action::Submit(text))?;
                }
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
        }
    }

    return Ok(());
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste,
        cursor::Show
    )?;

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    if let Err(err) = restore_terminal() {
        eprintln!("Failed to restore the terminal: {err}");
    }
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
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
    let mut app_state = AppState::default();

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
