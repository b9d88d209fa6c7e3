use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    score::Score,
    session::{LetterMark, WordMark},
    view::{LetterView, SessionView, WordView},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match (self.state, self.score.as_ref()) {
            (AppState::Results, Some(score)) => render_results(score, area, buf),
            _ => render_typing(&SessionView::from(&self.session), area, buf),
        }
    }
}

fn letter_style(letter: &LetterView, word_mark: WordMark) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let style = match (letter.mark, word_mark) {
        (LetterMark::Correct, _) => bold.fg(Color::Green),
        (LetterMark::Incorrect, _) => bold.fg(Color::Red),
        // skipped letters of a word already passed
        (LetterMark::Unmarked, WordMark::Marked) => {
            bold.fg(Color::Red).add_modifier(Modifier::DIM)
        }
        (LetterMark::Unmarked, _) => bold.add_modifier(Modifier::DIM),
    };

    if letter.active && !letter.is_last {
        style.add_modifier(Modifier::UNDERLINED)
    } else {
        style
    }
}

fn word_spans(word: &WordView) -> Vec<Span<'static>> {
    let mut spans: Vec<Span> = word
        .letters
        .iter()
        .map(|l| Span::styled(l.letter.to_string(), letter_style(l, word.mark)))
        .collect();

    // a full buffer puts the cursor on the gap after the word
    let gap = if word.letters.last().is_some_and(|l| l.is_last) {
        Style::default().add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
    };
    spans.push(Span::styled(" ", gap));
    spans
}

fn render_typing(view: &SessionView, area: Rect, buf: &mut Buffer) {
    let prompt = view.words.iter().map(WordView::text).join(" ");
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);

    let prompt_occupied_lines = if prompt.width() <= max_chars_per_line as usize {
        1
    } else {
        ((prompt.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };
    let padding = area.height.saturating_sub(prompt_occupied_lines + 2) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(2),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Length(padding),
        ])
        .split(area);

    let timer = Paragraph::new(Span::styled(
        view.remaining_secs.to_string(),
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    timer.render(chunks[1], buf);

    let spans: Vec<Span> = view.words.iter().flat_map(word_spans).collect();
    let words = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    words.render(chunks[2], buf);
}

fn render_results(score: &Score, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    let stats = Paragraph::new(Span::styled(
        format!("{:.2} wpm   {:.2}% acc", score.wpm, score.accuracy),
        bold_style,
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[1], buf);

    let details = Paragraph::new(Span::styled(
        format!(
            "{} correct words in {}s   {}/{} letters",
            score.correct_words,
            score.duration_secs,
            score.correct_letters,
            score.correct_letters + score.incorrect_letters
        ),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    details.render(chunks[2], buf);

    let legend = Paragraph::new(Span::styled("(r)etry / (n)ew / (esc)ape", italic_style))
        .alignment(Alignment::Center);
    legend.render(chunks[4], buf);
}
