//! Minimal markdown-to-terminal rendering for command help documents.

use crossterm::style::Stylize;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Render markdown as terminal text.
///
/// Headings are bold, inline and block code dimmed, list items bulleted.
/// Everything else is passed through as plain text.
pub fn render(markdown: &str, color: bool) -> String {
    let mut out = String::new();
    let mut heading: Option<HeadingLevel> = None;
    let mut in_code_block = false;
    let mut list_depth: usize = 0;
    let mut buffer = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(level);
                buffer.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                let text = std::mem::take(&mut buffer);
                let text =
                    if heading == Some(HeadingLevel::H1) { text.to_uppercase() } else { text };
                out.push_str(&paint(&text, color, |s| s.bold().to_string()));
                out.push_str("\n\n");
                heading = None;
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push('\n');
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                out.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                out.push_str("• ");
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if list_depth == 0 {
                    out.push_str("\n\n");
                } else {
                    out.push('\n');
                }
            }
            Event::Text(text) => {
                if heading.is_some() {
                    buffer.push_str(&text);
                } else if in_code_block {
                    for line in text.lines() {
                        out.push_str("    ");
                        out.push_str(&paint(line, color, |s| s.dark_grey().to_string()));
                        out.push('\n');
                    }
                } else {
                    out.push_str(&text);
                }
            }
            Event::Code(code) => {
                if heading.is_some() {
                    buffer.push_str(&code);
                } else {
                    out.push_str(&paint(&code, color, |s| s.dark_grey().to_string()));
                }
            }
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str("----\n\n"),
            _ => {}
        }
    }

    let trimmed = out.trim_end();
    format!("{trimmed}\n")
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}
