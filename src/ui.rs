use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use twistr::{
    drill::{DrillSession, DrillStep},
    language::{DifficultyBand, ScoredItem},
    session::{AdaptiveSession, SessionSummary},
};
use unicode_width::UnicodeWidthStr;

use crate::{Activity, AdaptiveState, App};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

fn band_color(band: DifficultyBand) -> Color {
    match band {
        DifficultyBand::Easy => Color::Green,
        DifficultyBand::Medium => Color::Yellow,
        DifficultyBand::Hard => Color::LightRed,
        DifficultyBand::Expert => Color::Magenta,
    }
}

/// Lines the twister needs at the given width
fn text_lines(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.width().div_ceil(width).max(1) as u16
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // padding
                Constraint::Min(1),    // body
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_header(self, chunks[0], buf);

        let legend = match &self.activity {
            Activity::Drill(drill) => {
                render_drill(drill, chunks[2], buf);
                if drill.is_finished() {
                    "(esc)ape"
                } else {
                    "(enter) next / (esc)ape"
                }
            }
            Activity::Adaptive(session, state) => {
                render_adaptive(session, state, chunks[2], buf);
                match (&state.summary, &state.feedback) {
                    (Some(_), _) => "(esc)ape",
                    (None, Some(_)) => "(enter) next round / (esc)ape",
                    (None, None) => "(1-5) rate yourself / (esc)ape",
                }
            }
        };

        Paragraph::new(Span::styled(legend, italic())).render(chunks[3], buf);
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![
        Span::styled("twistr", bold().fg(Color::Cyan)),
        Span::raw(format!("  {}  ", app.config.mode)),
    ];
    let counts = DifficultyBand::ALL.iter().map(|&band| {
        Span::styled(
            format!("{} {}", band.name(), app.band_counts[band.index()]),
            Style::default().fg(band_color(band)),
        )
    });
    spans.extend(Itertools::intersperse(counts, Span::raw(" · ")));

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Item caption and text, centred in `area`; returns the rows left below it
fn render_item(caption: Line<'_>, item: &ScoredItem, area: Rect, buf: &mut Buffer) -> Rect {
    let lines = text_lines(item.text(), area.width);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(lines),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(caption)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        item.text(),
        bold().fg(band_color(item.band())),
    ))
    .alignment(if lines == 1 {
        Alignment::Center
    } else {
        Alignment::Left
    })
    .wrap(Wrap { trim: true })
    .render(chunks[2], buf);

    chunks[4]
}

fn band_span(item: &ScoredItem) -> Span<'static> {
    let band = item.band();
    Span::styled(
        format!("{band} ({:.1})", item.score),
        Style::default().fg(band_color(band)),
    )
}

fn render_drill(drill: &DrillSession, area: Rect, buf: &mut Buffer) {
    let Some(item) = drill.current() else {
        Paragraph::new(vec![
            Line::from(Span::styled("Training complete", bold().fg(Color::Green))),
            Line::from(Span::styled(
                format!("{} tongue twisters practised", drill.items().len()),
                dim(),
            )),
        ])
        .alignment(Alignment::Center)
        .render(area, buf);
        return;
    };

    let (position, total) = drill.position();
    let caption = Line::from(vec![
        Span::styled(format!("{position}/{total}"), bold()),
        Span::raw(format!("  #{}  ", item.item.number)),
        band_span(item),
    ]);
    let rest = render_item(caption, item, area, buf);

    let stats = &item.stats;
    let step = match drill.step() {
        DrillStep::Reading => "Say it clearly, then press enter".to_string(),
        DrillStep::Ready => format!("{}: press enter to begin", drill.mode()),
        DrillStep::Countdown { remaining } => {
            format!("Repeat it until time runs out: {remaining:.1}s")
        }
        DrillStep::Repetition { done, total } => {
            format!("Repetition {} of {total}", done + 1)
        }
        DrillStep::Speed(speed) => format!("{speed}: {}", speed.instruction()),
    };

    Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "words {} · letters {} · vowels {} · consonants {}",
                stats.word_count, stats.char_count, stats.vowel_count, stats.consonant_count
            ),
            dim(),
        )),
        Line::default(),
        Line::from(Span::styled(step, bold())),
    ])
    .alignment(Alignment::Center)
    .render(rest, buf);
}

fn render_adaptive(
    session: &AdaptiveSession,
    state: &AdaptiveState,
    area: Rect,
    buf: &mut Buffer,
) {
    if let Some(summary) = &state.summary {
        render_summary(summary, area, buf);
        return;
    }
    let Some(prompt) = &state.prompt else {
        return;
    };

    let caption = Line::from(vec![
        Span::styled(
            format!("Round {}/{}", prompt.round, prompt.total_rounds),
            bold(),
        ),
        Span::raw(format!(
            "  {} · {} · target {:.1}  ",
            session.focus(),
            prompt.category,
            prompt.target_difficulty
        )),
        band_span(&prompt.item),
    ]);
    let rest = render_item(caption, &prompt.item, area, buf);

    let mut lines: Vec<Line> = prompt
        .fields
        .iter()
        .map(|field| {
            Line::from(vec![
                Span::styled(format!("{}: ", field.label), dim()),
                Span::raw(field.value.clone()),
            ])
        })
        .collect();
    lines.push(Line::default());
    lines.extend(
        prompt
            .advice
            .iter()
            .map(|tip| Line::from(Span::styled(format!("• {tip}"), italic()))),
    );
    lines.push(Line::default());

    match &state.feedback {
        Some(feedback) => {
            lines.push(Line::from(Span::styled(
                format!("{}/5  {}", feedback.rating, feedback.message),
                bold().fg(Color::Cyan),
            )));
            if let Some(tip) = feedback.tip {
                lines.push(Line::from(Span::styled(tip, italic())));
            }
            lines.push(Line::from(Span::styled(
                format!("average so far {:.2}", feedback.average),
                dim(),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "How did it go? 1 = hard going, 5 = flawless",
            bold(),
        ))),
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(rest, buf);
}

fn render_summary(summary: &SessionSummary, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(Span::styled("Session complete", bold().fg(Color::Green))),
        Line::default(),
        Line::from(format!(
            "{} rounds of {} · average {:.2} · sd {:.2} · {}",
            summary.rounds, summary.focus, summary.average, summary.std_dev, summary.status
        )),
        Line::from(Span::styled(
            summary
                .category_ratings
                .iter()
                .map(|(category, rating)| format!("{category} {rating:.1}"))
                .join("  "),
            dim(),
        )),
    ];

    if let Some((category, rating)) = summary.weakest {
        lines.push(Line::from(Span::styled(
            format!("Needs work: {category} ({rating:.1})"),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(summary.closing_tip, italic())));
    lines.push(Line::from(format!(
        "Next time try focusing on {}",
        summary.next_focus
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
