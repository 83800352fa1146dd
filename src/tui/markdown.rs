//! Markdown → ratatui `Text` for bot replies.
//!
//! The search backend answers in markdown: candidate names in bold, skill
//! lists, the occasional heading or code snippet. This walks the
//! `pulldown_cmark` event stream and emits styled `Line`/`Span` values.
//! Fenced code with a known language is highlighted by syntect.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const BULLET: &str = "• ";
const RULE_WIDTH: usize = 32;

fn frame_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

/// Parse `content` into owned styled text. Unstyled text uses `base_fg`.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut r = Renderer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        r.handle(event);
    }
    r.text
}

enum CodeMode {
    Off,
    Plain,
    Highlighted(Box<HighlightLines<'static>>),
}

struct Renderer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline styles; each entry is already patched onto its parent.
    styles: Vec<Style>,
    /// Spans prepended to every new line (blockquote and code gutters).
    gutters: Vec<Span<'static>>,
    /// One entry per open list: `None` for bullets, `Some(n)` for the next number.
    lists: Vec<Option<u64>>,
    code: CodeMode,
    pending_link: Option<String>,
    /// Next block element gets a blank line before it.
    separate: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: Vec::new(),
            gutters: Vec::new(),
            lists: Vec::new(),
            code: CodeMode::Off,
            pending_link: None,
            separate: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn new_line(&mut self, spans: Vec<Span<'static>>) {
        let mut all = self.gutters.clone();
        all.extend(spans);
        self.text.lines.push(Line::from(all));
    }

    fn append(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(vec![span]),
        }
    }

    fn start_block(&mut self) {
        if self.separate {
            self.new_line(Vec::new());
            self.separate = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.append(Span::styled(
                c.to_string(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            Event::SoftBreak => self.append(Span::raw(" ")),
            Event::HardBreak => self.new_line(Vec::new()),
            Event::Rule => {
                self.start_block();
                self.new_line(vec![Span::styled("─".repeat(RULE_WIDTH), frame_style())]);
                self.separate = true;
            }
            Event::TaskListMarker(done) => {
                self.append(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // A list item's first paragraph continues the marker line
                if self.lists.is_empty() || self.separate {
                    self.start_block();
                    self.new_line(Vec::new());
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.new_line(Vec::new());
                self.push_style(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.gutters.push(Span::styled("│ ", frame_style()));
                self.push_style(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.split_whitespace().next().unwrap_or(""),
                    CodeBlockKind::Indented => "",
                };
                let mut top = vec![Span::styled("╭─", frame_style())];
                if !lang.is_empty() {
                    top.push(Span::styled(
                        format!(" {lang} "),
                        frame_style().add_modifier(Modifier::BOLD),
                    ));
                }
                self.new_line(top);
                self.gutters.push(Span::styled("│ ", frame_style()));

                self.code = SYNTAX_SET
                    .find_syntax_by_token(lang)
                    .filter(|_| !lang.is_empty())
                    .and_then(|syntax| {
                        THEME_SET
                            .themes
                            .get(CODE_THEME)
                            .map(|theme| HighlightLines::new(syntax, theme))
                    })
                    .map_or(CodeMode::Plain, |h| CodeMode::Highlighted(Box::new(h)));
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.separate = false;
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}{BULLET}"),
                };
                self.new_line(vec![Span::styled(marker, frame_style())]);
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.pending_link = Some(dest_url.to_string());
                self.push_style(link_style());
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.separate = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.separate = true;
            }
            TagEnd::BlockQuote(_) => {
                self.gutters.pop();
                self.pop_style();
                self.separate = true;
            }
            TagEnd::CodeBlock => {
                self.code = CodeMode::Off;
                self.gutters.pop();
                self.new_line(vec![Span::styled("╰─", frame_style())]);
                self.separate = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.separate = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.pending_link.take() {
                    self.append(Span::styled(format!(" ({url})"), frame_style()));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui draws '\t' as zero-width
        let text = cow.replace('\t', "    ");

        match &mut self.code {
            CodeMode::Highlighted(hl) => {
                let mut lines = Vec::new();
                for line in LinesWithEndings::from(&text) {
                    let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) else {
                        lines.push(vec![Span::raw(line.trim_end_matches('\n').to_owned())]);
                        continue;
                    };
                    let spans = ranges
                        .into_iter()
                        .filter_map(|(s, frag)| {
                            let frag = frag.trim_end_matches('\n');
                            (!frag.is_empty()).then(|| {
                                let fg = Color::Rgb(s.foreground.r, s.foreground.g, s.foreground.b);
                                Span::styled(frag.to_owned(), Style::default().fg(fg))
                            })
                        })
                        .collect();
                    lines.push(spans);
                }
                for spans in lines {
                    self.new_line(spans);
                }
            }
            CodeMode::Plain => {
                for line in text.lines() {
                    self.new_line(vec![Span::styled(
                        line.to_owned(),
                        Style::default().fg(Color::White),
                    )]);
                }
            }
            CodeMode::Off => {
                let style = self.style();
                self.append(Span::styled(text, style));
            }
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => bold.add_modifier(Modifier::UNDERLINED),
        _ => bold,
    }
}
