use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::QuizMode;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "VOCAB QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("pick a book and a mode".fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    render_books(frame, chunks[1], app);
    render_modes(frame, chunks[2], app.selected_mode());

    if let Some(status) = app.status() {
        let widget = Paragraph::new(status)
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, chunks[3]);
    }

    super::render_controls(
        frame,
        chunks[4],
        "j/k book  ·  h/l mode  ·  enter quiz  ·  f flashcards  ·  F all cards  ·  q quit",
    );
}

fn render_books(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .title(" Books ")
        .padding(Padding::horizontal(1));

    if app.books().is_empty() {
        let widget = Paragraph::new("No books found. Put <id>.json files in the books directory.")
            .fg(Color::DarkGray)
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let lines: Vec<Line> = app
        .books()
        .iter()
        .enumerate()
        .map(|(index, book)| {
            let is_selected = index == app.selected_book();
            let style = if is_selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_selected { ">" } else { " " };

            Line::from(vec![
                Span::styled(format!("{} ", marker), style),
                Span::styled(book.name.as_str(), style),
                Span::styled(
                    format!("  {}/{} learned", book.learned_count, book.word_count),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_modes(frame: &mut Frame, area: Rect, selected: QuizMode) {
    let mut spans = Vec::with_capacity(QuizMode::ALL.len() * 2);
    for mode in QuizMode::ALL {
        let style = if mode == selected {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
        spans.push(Span::raw("  "));
    }

    let widget = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Color::DarkGray)
                .title(" Mode "),
        );
    frame.render_widget(widget, area);
}
