//! Terminal rendering of the generator's markdown replies

use colored::*;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

#[derive(Default)]
struct Style {
    strong: usize,
    emphasis: usize,
    heading: bool,
}

impl Style {
    fn paint(&self, text: &str) -> String {
        let mut styled = text.normal();
        if self.heading {
            styled = styled.bold().yellow();
        }
        if self.strong > 0 {
            styled = styled.bold();
        }
        if self.emphasis > 0 {
            styled = styled.italic();
        }
        styled.to_string()
    }
}

/// Render markdown as plain terminal text with ANSI styling.
///
/// Headings are bold, emphasis italic, list items bulleted and code dimmed.
/// Links keep only their text.
pub fn render_markdown(input: &str) -> String {
    let mut out = String::new();
    let mut style = Style::default();
    let mut list_depth = 0usize;

    for event in Parser::new(input) {
        match event {
            Event::Start(Tag::Heading { .. }) => style.heading = true,
            Event::End(TagEnd::Heading(_)) => {
                style.heading = false;
                out.push_str("\n\n");
            }
            Event::End(TagEnd::Paragraph) => out.push_str("\n\n"),
            Event::Start(Tag::Strong) => style.strong += 1,
            Event::End(TagEnd::Strong) => style.strong = style.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => style.emphasis += 1,
            Event::End(TagEnd::Emphasis) => style.emphasis = style.emphasis.saturating_sub(1),
            Event::Start(Tag::List(_)) => {
                if list_depth > 0 && !out.ends_with('\n') {
                    out.push('\n');
                }
                list_depth += 1;
            }
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
            Event::End(TagEnd::CodeBlock) => out.push('\n'),
            Event::Text(text) => out.push_str(&style.paint(&text)),
            Event::Code(code) => out.push_str(&code.dimmed().to_string()),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str("──────────\n\n"),
            _ => {}
        }
    }

    out.trim_end().to_string()
}
