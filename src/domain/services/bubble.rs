#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::Theme;

use super::Syntaxes;
use super::SYNTAX_SET;
use crate::domain::models::Author;
use crate::domain::models::Message;

// "│ " and " │" around every line.
const BORDER_WIDTH: usize = 4;
const SCROLLBAR_WIDTH: usize = 1;
const OUTER_PADDING_PERCENTAGE: f32 = 0.04;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

fn width(text: &str) -> usize {
    return text.chars().count();
}

fn spans_width(spans: &[Span]) -> usize {
    return spans.iter().map(|span| return width(&span.content)).sum();
}

/// Hard breaks a word that can't fit on a line by itself, such as a URL.
fn split_long_word(word: &str, max_width: usize) -> Vec<String> {
    if width(word) <= max_width {
        return vec![word.to_string()];
    }

    return word
        .chars()
        .collect::<Vec<char>>()
        .chunks(max_width.max(1))
        .map(|chunk| return chunk.iter().collect::<String>())
        .collect();
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn as_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut content = self.text_spans(theme);
        content.extend(self.source_spans());

        let max_line_length = self.get_max_line_length(&content);
        let mut lines: Vec<Line<'static>> = vec![];

        for spans in content {
            let mut split_spans: Vec<Span<'static>> = vec![];
            let mut line_char_count = 0;

            for span in spans {
                let span_width = width(&span.content);
                if span_width + line_char_count <= max_line_length {
                    line_char_count += span_width;
                    split_spans.push(span);
                    continue;
                }

                let mut word_set: Vec<String> = vec![];
                let words = span
                    .content
                    .split(' ')
                    .flat_map(|word| return split_long_word(word, max_line_length));
                for word in words {
                    let word_width = width(&word);
                    let mut separator = usize::from(!word_set.is_empty());
                    if line_char_count > 0
                        && line_char_count + separator + word_width > max_line_length
                    {
                        split_spans.push(Span::styled(word_set.join(" "), span.style));
                        lines.push(self.spans_to_line(split_spans, max_line_length));

                        split_spans = vec![];
                        word_set = vec![];
                        line_char_count = 0;
                        separator = 0;
                    }

                    word_set.push(word);
                    line_char_count += separator + word_width;
                }

                split_spans.push(Span::styled(word_set.join(" "), span.style));
            }

            lines.push(self.spans_to_line(split_spans, max_line_length));
        }

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    /// Message text with fenced code blocks highlighted and headings in bold.
    fn text_spans(&self, theme: &Theme) -> Vec<Vec<Span<'static>>> {
        // Lazy default
        let mut highlight = HighlightLines::new(Syntaxes::get("text"), theme);
        let mut in_codeblock = false;
        let mut res = vec![];

        for line in self.message.text.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("```") {
                if !in_codeblock {
                    let lang = trimmed.replace("```", "");
                    highlight = HighlightLines::new(Syntaxes::get(&lang), theme);
                }
                in_codeblock = !in_codeblock;
                res.push(vec![Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::DarkGray),
                )]);
                continue;
            }

            if in_codeblock {
                // Highlighting is only accurate when each line is postfixed with '\n',
                // especially for multi-line comments.
                let line_nl = format!("{line}\n");
                if let Ok(highlighted) = highlight.highlight_line(&line_nl, &SYNTAX_SET) {
                    let spans = highlighted
                        .iter()
                        .map(|(style, content)| {
                            return Span::styled(
                                content.trim_end_matches('\n').to_string(),
                                Style {
                                    fg: Syntaxes::translate_colour(style.foreground),
                                    ..Style::default()
                                },
                            );
                        })
                        .collect::<Vec<Span>>();
                    res.push(spans);
                    continue;
                }
            }

            if !in_codeblock && trimmed.starts_with('#') {
                let heading = trimmed.trim_start_matches('#').trim();
                res.push(vec![Span::styled(
                    heading.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )]);
                continue;
            }

            res.push(vec![Span::styled(line.to_string(), Style::default())]);
        }

        if res.is_empty() {
            res.push(vec![Span::from(" ")]);
        }

        return res;
    }

    /// Source cards listed beneath an answer.
    fn source_spans(&self) -> Vec<Vec<Span<'static>>> {
        if self.message.sources.is_empty() {
            return vec![];
        }

        let mut res = vec![
            vec![Span::from(" ")],
            vec![Span::styled(
                "Sources:".to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )],
        ];

        for source in self.message.sources.iter() {
            res.push(vec![Span::styled(
                source.title(),
                Style::default().fg(Color::Cyan),
            )]);

            for preview in source.content_preview.lines() {
                if preview.trim().is_empty() {
                    continue;
                }
                res.push(vec![Span::styled(
                    format!("  {}", preview.trim()),
                    Style::default().fg(Color::DarkGray),
                )]);
            }
        }

        return res;
    }

    fn title(&self) -> String {
        return format!(
            "{} {}",
            self.message.author.to_string(),
            self.message.timestamp.format("%H:%M")
        );
    }

    fn get_max_line_length(&self, content: &[Vec<Span>]) -> usize {
        // Keep a minimum 4% of padding on the side.
        let min_bubble_padding_length =
            (self.window_max_width as f32 * OUTER_PADDING_PERCENTAGE).ceil() as usize;
        let limit = self
            .window_max_width
            .saturating_sub(BORDER_WIDTH + SCROLLBAR_WIDTH + min_bubble_padding_length)
            .max(1);

        let mut max_line_length = content
            .iter()
            .map(|spans| return spans_width(spans))
            .max()
            .unwrap_or(0)
            .min(limit);

        let title_length = width(&self.title());
        if max_line_length + 2 < title_length {
            max_line_length = title_length - 2;
        }

        return max_line_length;
    }

    fn outer_padding(&self, max_line_length: usize) -> String {
        return " ".repeat(
            self.window_max_width
                .saturating_sub(max_line_length + BORDER_WIDTH + SCROLLBAR_WIDTH),
        );
    }

    fn spans_to_line(&self, mut spans: Vec<Span<'static>>, max_line_length: usize) -> Line<'static> {
        let fill = " ".repeat(max_line_length.saturating_sub(spans_width(&spans)));

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(self.highlight_span(format!("{fill} │")));

        let outer_bubble_padding = Span::from(self.outer_padding(max_line_length));
        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(outer_bubble_padding);
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![outer_bubble_padding];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let title = self.title();
        // Add 2 for the inner padding next to the vertical bars.
        let top_fill = "─".repeat((max_line_length + 2).saturating_sub(width(&title)));
        let top_bar = format!("╭{title}{top_fill}╮");
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));
        let padding = self.outer_padding(max_line_length);

        let (top, bottom) = if self.alignment == BubbleAlignment::Left {
            (format!("{top_bar}{padding}"), format!("{bottom_bar}{padding}"))
        } else {
            (format!("{padding}{top_bar}"), format!("{padding}{bottom_bar}"))
        };

        let mut res = vec![self.highlight_line(top)];
        res.extend(lines);
        res.push(self.highlight_line(bottom));

        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'static> {
        if self.message.is_error() {
            return Span::styled(text, Style::default().fg(Color::Red));
        }

        if self.message.author == Author::KBChat {
            return Span::styled(text, Style::default().fg(Color::Rgb(138, 85, 63)));
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'static> {
        return Line::from(self.highlight_span(text));
    }
}
