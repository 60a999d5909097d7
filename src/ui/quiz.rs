use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{AnswerState, QuizType};
use crate::quiz::QuizSession;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.controller().session() else {
        return;
    };
    let Some(question) = session.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], session);
    render_countdown(frame, chunks[1], session);
    render_prompt(frame, chunks[2], question.quiz_type, question.prompt());

    if question.is_spelling() {
        render_spelling(frame, chunks[3], session, question.word.word.chars().count());
    } else {
        render_options(frame, chunks[3], session, &question.options, app.selected_option());
    }

    render_feedback(frame, chunks[4], session, question.expected());

    let controls = match (question.is_spelling(), session.is_awaiting_answer()) {
        (_, false) => "enter next  ·  esc leave",
        (true, true) => "type answer  ·  tab hint  ·  enter submit  ·  esc leave",
        (false, true) if question.quiz_type == QuizType::AudioToNative => {
            "j/k navigate  ·  enter select  ·  ctrl-p replay  ·  esc leave"
        }
        (false, true) => "j/k navigate  ·  enter select  ·  esc leave",
    };
    super::render_controls(frame, chunks[5], controls);
}

fn render_header(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let combo = session.combo();
    let mut spans = vec![Span::styled(
        format!("{} pts", session.score()),
        Style::default().fg(Color::White).bold(),
    )];
    if combo.count() > 1 {
        spans.push(Span::styled(
            format!("  combo x{:.1}", combo.multiplier()),
            Style::default().fg(Color::Magenta).bold(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let progress = format!(
        "{}/{}",
        session.current_index() + 1,
        session.questions().len()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, chunks[1]);
}

fn render_countdown(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let limit = session.time_limit_tenths().max(1) as f64;
    let ratio = (session.time_remaining_tenths() as f64 / limit).clamp(0.0, 1.0);
    let color = match ratio {
        r if r > 0.5 => Color::Green,
        r if r > 0.2 => Color::Yellow,
        _ => Color::Red,
    };

    let widget = Gauge::default()
        .ratio(ratio)
        .label(format!("{:.1}", session.time_remaining()))
        .gauge_style(Style::default().fg(color));
    frame.render_widget(widget, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, quiz_type: QuizType, prompt: &str) {
    let text = if quiz_type == QuizType::AudioToNative {
        Line::from("♪ listen and pick the meaning".fg(Color::Cyan))
    } else {
        Line::from(Span::styled(prompt, Style::default().fg(Color::White).bold()))
    };

    let widget = Paragraph::new(vec![
        Line::from(quiz_type.label().fg(Color::DarkGray)),
        Line::from(""),
        text,
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    session: &QuizSession,
    options: &[String],
    selected: usize,
) {
    let answered = session.answer_state().is_answered();
    let expected = session.current_question().map(|q| q.expected());
    let picked = session.selected();

    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);
    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selected;
        let style = if answered && Some(option.as_str()) == expected {
            Style::default().fg(Color::Green).bold()
        } else if answered && Some(option.as_str()) == picked {
            Style::default().fg(Color::Red).bold()
        } else if is_selected && !answered {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected && !answered { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('·');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_spelling(frame: &mut Frame, area: Rect, session: &QuizSession, target_len: usize) {
    let spelling = session.spelling();
    let typed = spelling.input().chars().count();
    let border = if spelling.has_error() {
        Color::Red
    } else {
        Color::DarkGray
    };

    let content = vec![
        Line::from(vec![
            Span::styled(spelling.input(), Style::default().fg(Color::Yellow).bold()),
            Span::styled(
                "_".repeat(target_len.saturating_sub(typed)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} letters  ·  {} hints used", target_len, spelling.hints_used()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_feedback(frame: &mut Frame, area: Rect, session: &QuizSession, expected: &str) {
    let line = match session.answer_state() {
        AnswerState::Unanswered => return,
        AnswerState::Correct => {
            let points = session.history().last().map_or(0, |o| o.points);
            Line::from(Span::styled(
                format!("Correct! +{}", points),
                Style::default().fg(Color::Green).bold(),
            ))
        }
        AnswerState::Incorrect => {
            let timed_out = session.history().last().is_some_and(|o| o.timed_out);
            let reason = if timed_out { "Time's up" } else { "Wrong" };
            Line::from(vec![
                Span::styled(format!("{}: ", reason), Style::default().fg(Color::Red).bold()),
                Span::styled(expected, Style::default().fg(Color::White)),
            ])
        }
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
