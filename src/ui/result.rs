use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::quiz::QuizSession;

const WORD_PREVIEW_LENGTH: usize = 40;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.controller().session() else {
        return;
    };

    let correct = session.correct_count();
    let total = session.questions().len();
    let percentage = calculate_percentage(correct, total);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_summary(frame, chunks[1], session, correct, total, percentage);
    render_breakdown(frame, chunks[2], session, app.result_scroll());
    super::render_controls(frame, chunks[3], "j/k scroll  ·  r new quiz  ·  q quit");
}

fn calculate_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_summary(
    frame: &mut Frame,
    area: Rect,
    session: &QuizSession,
    correct: usize,
    total: usize,
    percentage: f64,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} points", session.score()),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(Span::styled(
            format!(
                "{} / {} correct  ({:.0}%)  ·  best combo {}",
                correct,
                total,
                percentage,
                session.combo().best()
            ),
            Style::default().fg(grade_color(percentage)),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_breakdown(frame: &mut Frame, area: Rect, session: &QuizSession, scroll: usize) {
    let lines: Vec<Line> = session
        .history()
        .iter()
        .map(|outcome| {
            let question = &session.questions()[outcome.question_index];
            let (symbol, color) = if outcome.correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            let detail = match (&outcome.given, outcome.correct) {
                (_, true) => format!("+{}", outcome.points),
                (None, false) => "timed out".to_string(),
                (Some(given), false) => format!("you said {}", truncate(given)),
            };

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", outcome.question_index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{} = {}", truncate(&question.word.word), truncate(&question.word.native)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(format!("  {}", detail), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate(text: &str) -> String {
    if text.chars().count() > WORD_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(WORD_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
