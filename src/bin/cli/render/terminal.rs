use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const CYAN: &'static str = "\x1b[36m";
}

pub fn bold(text: &str, use_color: bool) -> String {
    paint(text, Color::BOLD, use_color)
}

pub fn dim(text: &str, use_color: bool) -> String {
    paint(text, Color::DIM, use_color)
}

pub fn green(text: &str, use_color: bool) -> String {
    paint(text, Color::GREEN, use_color)
}

fn paint(text: &str, code: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", code, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render note markdown for the terminal
pub fn render_markdown(markdown: &str, use_color: bool) -> String {
    let mut renderer = Renderer::new(use_color);
    for event in Parser::new(markdown) {
        renderer.handle(event);
    }
    renderer.finish()
}

struct Renderer {
    use_color: bool,
    lines: Vec<String>,
    current: String,
    quote_depth: usize,
    // One entry per open list: the next number for ordered lists
    lists: Vec<Option<u64>>,
    code: Option<String>,
}

impl Renderer {
    fn new(use_color: bool) -> Self {
        Self {
            use_color,
            lines: Vec::new(),
            current: String::new(),
            quote_depth: 0,
            lists: Vec::new(),
            code: None,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.end_block();
                self.current.push_str(&"#".repeat(heading_level_to_int(level)));
                self.current.push(' ');
                self.style(Color::BOLD);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.style(Color::RESET);
                self.end_block();
            }
            Event::End(TagEnd::Paragraph) => {
                if self.lists.is_empty() {
                    self.end_block();
                } else {
                    self.flush_line();
                }
            }
            Event::Start(Tag::BlockQuote) => {
                self.end_block();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank_line();
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                self.end_block();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or("").to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.push_code_line(&format!("```{}", lang));
                self.code = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                let code = self.code.take().unwrap_or_default();
                for line in code.lines() {
                    self.push_code_line(line);
                }
                self.push_code_line("```");
                self.blank_line();
            }
            Event::Start(Tag::List(start)) => {
                self.flush_line();
                if self.lists.is_empty() {
                    self.end_block();
                }
                self.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}.", n);
                        *n += 1;
                        marker
                    }
                    _ => "-".to_string(),
                };
                self.current.push_str(&format!("{}{} ", indent, marker));
            }
            Event::End(TagEnd::Item) => self.flush_line(),
            Event::Start(Tag::Strong) => self.style(Color::BOLD),
            Event::End(TagEnd::Strong) => self.style(Color::RESET),
            Event::TaskListMarker(done) => {
                self.current.push_str(if done { "[x] " } else { "[ ] " });
            }
            Event::Text(text) => match self.code.as_mut() {
                Some(code) => code.push_str(&text),
                None => self.current.push_str(&text),
            },
            Event::Code(code) => {
                let code = format!("`{}`", code);
                let painted = paint(&code, Color::CYAN, self.use_color);
                self.current.push_str(&painted);
            }
            Event::SoftBreak => self.current.push(' '),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.end_block();
                self.lines.push(dim(&"\u{2500}".repeat(40), self.use_color));
                self.blank_line();
            }
            _ => {}
        }
    }

    fn style(&mut self, code: &str) {
        if self.use_color {
            self.current.push_str(code);
        }
    }

    fn quote_prefix(&self) -> String {
        if self.quote_depth == 0 {
            String::new()
        } else if self.use_color {
            format!("{}{}{}", Color::DIM, "\u{2502} ".repeat(self.quote_depth), Color::RESET)
        } else {
            "> ".repeat(self.quote_depth)
        }
    }

    fn push_code_line(&mut self, line: &str) {
        let prefix = self.quote_prefix();
        let line = paint(line, Color::CYAN, self.use_color);
        self.lines.push(format!("{}{}", prefix, line));
    }

    /// Move the pending text into the output, wrapped at 80 columns
    fn flush_line(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.current);
        let prefix = self.quote_prefix();
        for line in wrap_line(&text, 80) {
            self.lines.push(format!("{}{}", prefix, line));
        }
    }

    fn end_block(&mut self) {
        self.flush_line();
        self.blank_line();
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

fn heading_level_to_int(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Simple word-wrapping for terminal output
fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    if line.chars().count() <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    for word in line.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let rendered = render_markdown("# Sorting\n\nQuicksort is **fast**.", false);
        assert_eq!(rendered, "# Sorting\n\nQuicksort is fast.");
    }

    #[test]
    fn test_lists() {
        assert_eq!(render_markdown("- one\n- two", false), "- one\n- two");
        assert_eq!(render_markdown("3. a\n4. b", false), "3. a\n4. b");
        assert_eq!(render_markdown("- outer\n  - inner", false), "- outer\n  - inner");
    }

    #[test]
    fn test_code_block_is_kept_verbatim() {
        let markdown = "```rust\nfn main() {\n    let x = 1;\n}\n```";
        assert_eq!(render_markdown(markdown, false), markdown);
    }

    #[test]
    fn test_quote_gets_prefix() {
        assert_eq!(render_markdown("> quoted text", false), "> quoted text");
    }

    #[test]
    fn test_strong_is_bolded_with_color() {
        let rendered = render_markdown("a **key** term", true);
        assert_eq!(rendered, format!("a {}key{} term", Color::BOLD, Color::RESET));
    }

    #[test]
    fn test_long_lines_wrap() {
        let line = "word ".repeat(30);
        let wrapped = wrap_line(line.trim(), 20);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 20));
    }
}
