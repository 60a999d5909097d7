use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(deck) = app.deck() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    let (known, total) = deck.progress();
    let ratio = if total > 0 {
        known as f64 / total as f64
    } else {
        1.0
    };
    let gauge = Gauge::default()
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{}/{} learned  ·  {} misses", known, total, deck.misses()))
        .gauge_style(Style::default().fg(Color::Cyan));
    frame.render_widget(gauge, chunks[0]);

    let Some(word) = deck.current() else {
        let done = Paragraph::new(vec![
            Line::from(Span::styled(
                "DECK COMPLETE",
                Style::default().fg(Color::Green).bold(),
            )),
            Line::from(""),
            Line::from("esc to save and go back".fg(Color::DarkGray)),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(done, chunks[2]);
        super::render_controls(frame, chunks[4], "esc back");
        return;
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            word.word.as_str(),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
    ];
    if deck.is_revealed() {
        content.push(Line::from(Span::styled(
            word.native.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        content.push(Line::from("space to reveal".fg(Color::DarkGray)));
    }
    if word.favorite {
        content.push(Line::from(""));
        content.push(Line::from("★ favorite".fg(Color::Magenta)));
    }

    let card = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(card, chunks[2]);

    super::render_controls(
        frame,
        chunks[4],
        "space reveal  ·  y know it  ·  n don't know  ·  s favorite  ·  ctrl-p listen  ·  esc back",
    );
}
