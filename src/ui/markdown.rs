//! Markdown rendering for transcript messages.
//!
//! Converts message content into styled ratatui lines: headings, emphasis,
//! inline code, fenced code blocks, and lists. Anything fancier falls back
//! to plain text.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    let mut renderer = LineBuilder::default();
    for event in Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH) {
        renderer.push_event(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    bold_depth: usize,
    italic_depth: usize,
    heading_depth: usize,
    in_code_block: bool,
    // One entry per open list; Some(n) carries the next ordered-item number.
    list_stack: Vec<Option<u64>>,
    in_item: bool,
}

impl LineBuilder {
    fn push_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => {
                if !self.in_item {
                    self.start_block();
                }
            }
            Event::End(TagEnd::Paragraph) => self.flush_line(),
            Event::Start(Tag::Heading { .. }) => {
                self.start_block();
                self.heading_depth += 1;
            }
            Event::End(TagEnd::Heading(_)) => {
                self.heading_depth = self.heading_depth.saturating_sub(1);
                self.flush_line();
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.start_block();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                if !self.current.is_empty() {
                    self.flush_line();
                }
                self.in_code_block = false;
            }
            Event::Start(Tag::List(start)) => {
                if self.list_stack.is_empty() {
                    self.start_block();
                }
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
            }
            Event::Start(Tag::Item) => {
                if !self.current.is_empty() {
                    self.flush_line();
                }
                self.in_item = true;
                let marker = match self.list_stack.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.current.push(Span::raw(marker));
            }
            Event::End(TagEnd::Item) => {
                self.in_item = false;
                if !self.current.is_empty() {
                    self.flush_line();
                }
            }
            Event::Start(Tag::Strong) => self.bold_depth += 1,
            Event::End(TagEnd::Strong) => self.bold_depth = self.bold_depth.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.italic_depth += 1,
            Event::End(TagEnd::Emphasis) => {
                self.italic_depth = self.italic_depth.saturating_sub(1)
            }
            Event::Text(text) => {
                if self.in_code_block {
                    self.push_code_text(&text);
                } else {
                    let style = self.inline_style();
                    self.current.push(Span::styled(text.into_string(), style));
                }
            }
            Event::Code(code) => {
                self.current.push(Span::styled(
                    code.into_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak => self.current.push(Span::raw(" ")),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.start_block();
                self.lines.push(Line::from(Span::styled(
                    "───",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }

    fn inline_style(&self) -> Style {
        let mut style = Style::default();
        if self.bold_depth > 0 || self.heading_depth > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic_depth > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }

    fn push_code_text(&mut self, text: &str) {
        let style = Style::default().fg(Color::Green);
        let mut first = true;
        for segment in text.split('\n') {
            if !first {
                self.flush_line();
            }
            if !segment.is_empty() {
                self.current.push(Span::styled(segment.to_string(), style));
            }
            first = false;
        }
    }

    fn flush_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    /// Inserts the blank separator line between top-level blocks.
    fn start_block(&mut self) {
        if !self.current.is_empty() {
            self.flush_line();
        }
        if !self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() {
            self.flush_line();
        }
        self.lines
    }
}
