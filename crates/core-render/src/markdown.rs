//! Markdown to ANSI formatting for streamed responses.
//!
//! A formatter is a pure function of the whole accumulated text. It is run
//! again on every chunk, so it must be deterministic; the stream renderer
//! works out what changed.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::style;

pub trait MarkdownFormatter {
    fn format(&self, text: &str) -> String;
}

impl<F: Fn(&str) -> String> MarkdownFormatter for F {
    fn format(&self, text: &str) -> String {
        self(text)
    }
}

/// Output equals input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl MarkdownFormatter for PlainFormatter {
    fn format(&self, text: &str) -> String {
        text.to_string()
    }
}

/// CommonMark (plus tables and strikethrough) rendered with SGR styling.
///
/// Block-level styles (headings, code blocks) are closed with a full reset on
/// every line so a line can be repainted on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiMarkdownFormatter;

impl MarkdownFormatter for AnsiMarkdownFormatter {
    fn format(&self, text: &str) -> String {
        let mut out = Output::default();
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        for event in Parser::new_ext(text, options) {
            out.event(event);
        }
        let trimmed = out.buf.trim_end_matches('\n').len();
        out.buf.truncate(trimmed);
        out.buf
    }
}

#[derive(Default)]
struct Output {
    buf: String,
    in_code_block: bool,
    /// Next number of each open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    cell_in_row: usize,
}

impl Output {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(t) => {
                if self.in_code_block {
                    self.code_text(&t);
                } else {
                    self.text(&t);
                }
            }
            Event::Code(t) => {
                self.buf.push_str(style::INLINE_CODE);
                self.buf.push_str(&t);
                self.buf.push_str(style::DEFAULT_FG);
            }
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Rule => {
                self.block_gap();
                self.buf.push_str(&"─".repeat(24));
                self.buf.push('\n');
            }
            Event::TaskListMarker(done) => self.buf.push_str(if done { "[x] " } else { "[ ] " }),
            Event::Html(t) | Event::InlineHtml(t) => self.text(&t),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.block_gap();
                }
                self.quote_prefix();
            }
            Tag::Heading { level, .. } => {
                self.block_gap();
                let marker = if level == HeadingLevel::H1 {
                    style::UNDERLINE_BOLD
                } else {
                    style::BOLD
                };
                self.buf.push_str(marker);
            }
            Tag::CodeBlock(kind) => {
                self.block_gap();
                if let CodeBlockKind::Fenced(lang) = kind
                    && !lang.is_empty()
                {
                    self.buf.push_str(style::DIM);
                    self.buf.push_str(&lang);
                    self.buf.push_str(style::RESET);
                    self.buf.push('\n');
                }
                self.in_code_block = true;
            }
            Tag::BlockQuote(_) => {
                self.block_gap();
                self.quote_depth += 1;
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.block_gap();
                } else if !self.buf.ends_with('\n') {
                    self.buf.push('\n');
                }
                self.lists.push(first);
            }
            Tag::Item => {
                let depth = self.lists.len().saturating_sub(1);
                self.buf.push_str(&"  ".repeat(depth));
                match self.lists.last_mut() {
                    Some(Some(n)) => {
                        self.buf.push_str(&format!("{n}. "));
                        *n += 1;
                    }
                    _ => self.buf.push_str("• "),
                }
            }
            Tag::Emphasis => self.buf.push_str(style::ITALIC),
            Tag::Strong => self.buf.push_str(style::BOLD),
            Tag::Strikethrough => self.buf.push_str(style::STRIKE),
            Tag::Link { dest_url, .. } => self.buf.push_str(&style::link_start(&dest_url)),
            Tag::Table(_) => {
                self.block_gap();
            }
            Tag::TableHead => self.buf.push_str(style::BOLD),
            Tag::TableRow => self.cell_in_row = 0,
            Tag::TableCell => {
                if self.cell_in_row > 0 {
                    self.buf.push_str(" | ");
                }
                self.cell_in_row += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.newline(),
            TagEnd::Heading(_) => {
                self.buf.push_str(style::RESET);
                self.buf.push('\n');
            }
            TagEnd::CodeBlock => self.in_code_block = false,
            TagEnd::BlockQuote(_) => self.quote_depth = self.quote_depth.saturating_sub(1),
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Item => self.newline(),
            TagEnd::Emphasis => self.buf.push_str(style::NO_ITALIC),
            TagEnd::Strong => self.buf.push_str(style::NO_BOLD),
            TagEnd::Strikethrough => self.buf.push_str(style::NO_STRIKE),
            TagEnd::Link => self.buf.push_str(style::LINK_END),
            TagEnd::TableHead => {
                self.buf.push_str(style::RESET);
                self.buf.push('\n');
                self.cell_in_row = 0;
            }
            TagEnd::TableRow => self.buf.push('\n'),
            _ => {}
        }
    }

    fn text(&mut self, t: &str) {
        let mut first = true;
        for line in t.split('\n') {
            if !first {
                self.newline();
                self.quote_prefix();
            }
            self.buf.push_str(line);
            first = false;
        }
    }

    fn code_text(&mut self, t: &str) {
        for line in t.split_inclusive('\n') {
            let (body, nl) = match line.strip_suffix('\n') {
                Some(body) => (body, true),
                None => (line, false),
            };
            self.buf.push_str(style::CODE_BLOCK);
            self.buf.push_str(body);
            self.buf.push_str(style::RESET);
            if nl {
                self.buf.push('\n');
            }
        }
    }

    fn quote_prefix(&mut self) {
        for _ in 0..self.quote_depth {
            self.buf.push_str("│ ");
        }
    }

    fn newline(&mut self) {
        if !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    /// One blank line between blocks.
    fn block_gap(&mut self) {
        if self.buf.is_empty() || self.buf.ends_with("\n\n") {
            return;
        }
        self.newline();
        self.buf.push('\n');
    }
}
