use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fintrack_client::ApiClient;
use fintrack_core::{ChatTranscript, Role};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::sync::mpsc::TryRecvError;
use tokio::sync::mpsc;

use crate::chat_worker::{self, ChatEvent, ChatRequest};
use crate::config::ChatSection;

/// Daily transcript under ~/.fintrack/chat/YYYY-MM-DD.md
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    pub fn open_today() -> Result<Self> {
        let dir = crate::state::chat_dir()?;
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        Ok(Self {
            path: dir.join(format!("{today}.md")),
        })
    }

    pub fn append(&mut self, role: &str, msg: &str) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        writeln!(
            f,
            "- {} [{}] {}",
            chrono::Utc::now().to_rfc3339(),
            role,
            msg.replace('\n', " ")
        )?;
        Ok(())
    }
}

pub fn run_chat(api: ApiClient, cfg: &ChatSection) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chat_loop(&mut terminal, api, cfg);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn chat_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    api: ApiClient,
    cfg: &ChatSection,
) -> Result<()> {
    let (req_tx, req_rx) = mpsc::unbounded_channel::<ChatRequest>();
    let (ev_tx, ev_rx) = std::sync::mpsc::channel::<ChatEvent>();
    let worker = tokio::spawn(chat_worker::run_worker(api, req_rx, ev_tx));

    let mut transcript = ChatTranscript::new(cfg.max_messages);
    let mut input = String::new();
    let mut next_id: u64 = 0;

    let mut log = if cfg.log_transcripts {
        let mut log = ChatLog::open_today()?;
        log.append("system", "session_start")?;
        Some(log)
    } else {
        None
    };

    loop {
        // replies that arrived since the last frame
        loop {
            match ev_rx.try_recv() {
                Ok(ev) if ev.request_id() == next_id => match ev {
                    ChatEvent::Reply { text, .. } => {
                        if let Some(log) = log.as_mut() {
                            log.append("assistant", &text)?;
                        }
                        transcript.receive(text);
                    }
                    ChatEvent::Error { message, .. } => {
                        if let Some(log) = log.as_mut() {
                            log.append("error", &message)?;
                        }
                        transcript.fail();
                    }
                },
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if transcript.is_pending() {
                        transcript.fail();
                    }
                    break;
                }
            }
        }

        terminal.draw(|f| {
            let size = f.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(3),
                ])
                .split(size);

            let header = Paragraph::new(Text::from(vec![Line::from(vec![
                Span::styled(
                    "Financial Assistant",
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  Enter=send  Esc=quit", Style::default().fg(Color::Gray)),
            ])]))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(header, chunks[0]);

            let mut lines: Vec<Line> = Vec::new();
            for m in transcript.messages() {
                let (tag, color) = match m.role {
                    Role::User => ("you", Color::Cyan),
                    Role::Assistant => ("assistant", Color::Magenta),
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", tag), Style::default().fg(color)),
                    Span::raw(m.content.clone()),
                ]));
                lines.push(Line::raw(""));
            }
            if transcript.is_pending() {
                lines.push(Line::from(Span::styled(
                    "assistant is thinking...",
                    Style::default().fg(Color::Gray),
                )));
            }

            // keep the newest lines in view (wrapping is not accounted for)
            let visible = chunks[1].height.saturating_sub(2) as usize;
            let scroll = lines.len().saturating_sub(visible) as u16;
            let history = Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).title("conversation"))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0));
            f.render_widget(history, chunks[1]);

            let (placeholder, style) = if transcript.is_pending() {
                ("waiting for reply...", Style::default().fg(Color::DarkGray))
            } else if input.is_empty() {
                ("Ask about your spending...", Style::default().fg(Color::DarkGray))
            } else {
                (input.as_str(), Style::default().fg(Color::White))
            };
            let input_widget = Paragraph::new(placeholder)
                .block(Block::default().borders(Borders::ALL).title("message"))
                .style(style);
            f.render_widget(input_widget, chunks[2]);
        })?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Enter => {
                        if let Some(text) = transcript.submit(&input) {
                            if let Some(log) = log.as_mut() {
                                log.append("user", &text)?;
                            }
                            next_id += 1;
                            if req_tx
                                .send(ChatRequest {
                                    request_id: next_id,
                                    message: text,
                                })
                                .is_err()
                            {
                                transcript.fail();
                            }
                            input.clear();
                        }
                    }
                    code @ (KeyCode::Backspace | KeyCode::Char(_)) => {
                        edit_input(&mut input, code, transcript.is_pending());
                    }
                    _ => {}
                }
            }
        }
    }

    worker.abort();
    Ok(())
}

/// Typing is disabled while a reply is pending
fn edit_input(input: &mut String, code: KeyCode, pending: bool) {
    if pending {
        return;
    }
    match code {
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(c) => input.push(c),
        _ => {}
    }
}
