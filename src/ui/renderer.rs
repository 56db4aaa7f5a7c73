use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::chat_loop::ChatApp;

pub fn ui(f: &mut Frame, app: &ChatApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let lines = app.build_display_lines();

    // Clamp the scroll offset so resizes never leave us past the end.
    let available_height = chunks[0].height.saturating_sub(1); // Account for title
    let total_lines = lines.len() as u16;
    let max_offset = total_lines.saturating_sub(available_height);
    let scroll_offset = app.scroll_offset.min(max_offset);

    let snapshot = app.snapshot();

    let title = format!(
        "Gemchat v{} - {}",
        env!("CARGO_PKG_VERSION"),
        app.endpoint()
    );

    let messages_paragraph = Paragraph::new(lines)
        .block(Block::default().title(title))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));

    f.render_widget(messages_paragraph, chunks[0]);

    let input_title = if snapshot.pending {
        "Waiting for reply (Ctrl+C to quit)"
    } else {
        "Type your message (Press Enter to send, Ctrl+C to quit)"
    };

    // While a submission is in flight, show a pulsing indicator at the right
    // edge of the input box.
    let input_text = if snapshot.pending {
        let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
        let pulse_phase = (elapsed * 2.0) % 2.0; // 2 cycles per second
        let pulse_intensity = if pulse_phase < 1.0 {
            pulse_phase
        } else {
            2.0 - pulse_phase
        };
        let symbol = if pulse_intensity < 0.33 {
            "○"
        } else if pulse_intensity < 0.66 {
            "◐"
        } else {
            "●"
        };

        let inner_width = chunks[1].width.saturating_sub(2) as usize;
        let draft_width = UnicodeWidthStr::width(snapshot.draft);
        let padding = inner_width
            .saturating_sub(draft_width)
            .saturating_sub(2)
            .max(1);
        format!("{}{}{}", snapshot.draft, " ".repeat(padding), symbol)
    } else {
        snapshot.draft.to_string()
    };

    let input_style = if snapshot.pending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let input = Paragraph::new(input_text.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(input_title))
        .wrap(Wrap { trim: false });

    f.render_widget(input, chunks[1]);

    if !snapshot.pending {
        let cursor_x = UnicodeWidthStr::width(snapshot.draft) as u16 + 1;
        let max_x = chunks[1].width.saturating_sub(2);
        f.set_cursor_position((chunks[1].x + cursor_x.min(max_x), chunks[1].y + 1));
    }
}

/// User messages: cyan with a bold "You:" prefix on the first line.
pub fn user_message_lines(content: &str) -> Vec<Line<'static>> {
    let prefix = Span::styled(
        "You: ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let mut lines = Vec::new();
    for (i, content_line) in content.lines().enumerate() {
        let body = Span::styled(content_line.to_string(), Style::default().fg(Color::Cyan));
        if i == 0 {
            lines.push(Line::from(vec![prefix.clone(), body]));
        } else {
            lines.push(Line::from(body));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(prefix));
    }
    lines
}
