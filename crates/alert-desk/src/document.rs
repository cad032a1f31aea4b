//! Structured rich-text document for alert bodies.
//!
//! A [`Document`] is an ordered list of blocks (headings and paragraphs),
//! each made of styled text runs. It is the source of truth for the alert
//! body; markup is produced from it only on demand via
//! [`Document::to_markup`] and read back with [`Document::from_markup`].
//!
//! The accepted markup is a small HTML subset:
//!
//! - block tags `h1`..`h6` and `p`
//! - inline tags `strong`/`b`, `em`/`i`, `u`, `a href="..."` and `br`
//! - entities `&amp; &lt; &gt; &quot; &#39; &nbsp;` plus numeric references
//!
//! Whitespace between blocks is ignored, runs of whitespace inside text
//! collapse to a single space, and bare text outside any block becomes a
//! paragraph.

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

/// Errors produced while reading markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A `<` with no matching `>`.
    #[error("unterminated tag at byte {0}")]
    UnterminatedTag(usize),

    /// A tag outside the supported subset.
    #[error("unsupported tag <{0}>")]
    UnsupportedTag(String),

    /// A closing tag that does not match the innermost open tag.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),

    /// Input ended with tags still open.
    #[error("unclosed tag <{0}>")]
    Unclosed(String),

    /// A block tag inside another block or inline element.
    #[error("block tag <{0}> cannot be nested")]
    NestedBlock(String),

    /// A heading level outside 1..=6.
    #[error("invalid heading level {0}")]
    InvalidHeading(u8),
}

/// Kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    /// Heading of level 1..=6.
    Heading(u8),
    /// Plain paragraph.
    Paragraph,
}

impl BlockKind {
    fn tag(self) -> String {
        match self {
            BlockKind::Heading(level) => format!("h{}", level),
            BlockKind::Paragraph => "p".to_string(),
        }
    }

    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "p" => Some(BlockKind::Paragraph),
            "h1" => Some(BlockKind::Heading(1)),
            "h2" => Some(BlockKind::Heading(2)),
            "h3" => Some(BlockKind::Heading(3)),
            "h4" => Some(BlockKind::Heading(4)),
            "h5" => Some(BlockKind::Heading(5)),
            "h6" => Some(BlockKind::Heading(6)),
            _ => None,
        }
    }

    /// Validate a kind before it enters a document.
    pub fn validate(self) -> Result<Self, MarkupError> {
        match self {
            BlockKind::Heading(level) if !(1..=6).contains(&level) => {
                Err(MarkupError::InvalidHeading(level))
            }
            kind => Ok(kind),
        }
    }
}

/// An inline formatting mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

/// Set of marks applied to a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Marks {
    /// Whether `mark` is set.
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    /// Set or clear `mark`.
    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
        }
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    pub marks: Marks,
    pub link: Option<String>,
}

impl Run {
    /// Unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
            link: None,
        }
    }

    fn same_style(&self, other: &Run) -> bool {
        self.marks == other.marks && self.link == other.link
    }
}

/// A heading or paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub runs: Vec<Run>,
}

impl Block {
    /// Block with a single unstyled run.
    pub fn plain(kind: BlockKind, text: impl Into<String>) -> Self {
        let mut block = Self {
            kind,
            runs: vec![Run::plain(text)],
        };
        block.normalize();
        block
    }

    /// Paragraph with a single unstyled run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::plain(BlockKind::Paragraph, text)
    }

    /// Heading with a single unstyled run.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::plain(BlockKind::Heading(level), text)
    }

    /// Concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Toggle `mark` across the whole block.
    ///
    /// If every run already carries the mark it is removed, otherwise it is
    /// applied everywhere.
    pub fn toggle_mark(&mut self, mark: Mark) {
        let all = !self.runs.is_empty() && self.runs.iter().all(|run| run.marks.has(mark));
        for run in &mut self.runs {
            run.marks.set(mark, !all);
        }
        self.normalize();
    }

    /// Drop empty runs and merge neighbours with identical style.
    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.same_style(&run) => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

/// A structured rich-text document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Build a document from blocks.
    pub fn new(blocks: Vec<Block>) -> Result<Self, MarkupError> {
        let mut blocks = blocks;
        for block in &mut blocks {
            block.kind = block.kind.validate()?;
            block.normalize();
        }
        Ok(Self { blocks })
    }

    /// Blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Mutable access for editor operations inside this crate.
    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Read a document from markup.
    pub fn from_markup(markup: &str) -> Result<Self, MarkupError> {
        Parser::new(markup).parse()
    }

    /// Serialize to transport markup.
    ///
    /// Pure function of the document: two calls without an intervening
    /// edit return identical strings.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let tag = block.kind.tag();
            let _ = write!(out, "<{}>", tag);
            for run in &block.runs {
                write_run(&mut out, run);
            }
            let _ = writeln!(out, "</{}>", tag);
        }
        out
    }
}

fn write_run(out: &mut String, run: &Run) {
    if let Some(href) = &run.link {
        let _ = write!(out, "<a href=\"{}\">", escape_attr(href));
    }
    if run.marks.bold {
        out.push_str("<strong>");
    }
    if run.marks.italic {
        out.push_str("<em>");
    }
    if run.marks.underline {
        out.push_str("<u>");
    }
    out.push_str(&escape_text(&run.text));
    if run.marks.underline {
        out.push_str("</u>");
    }
    if run.marks.italic {
        out.push_str("</em>");
    }
    if run.marks.bold {
        out.push_str("</strong>");
    }
    if run.link.is_some() {
        out.push_str("</a>");
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Replace character references with their characters.
///
/// Unknown references are kept literally.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Collapse runs of ASCII whitespace to one space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// A lexed tag.
struct Tag {
    name: String,
    closing: bool,
    attrs: String,
    /// Byte offset just past `>`.
    end: usize,
}

/// Open inline element.
struct OpenInline {
    name: String,
    mark: Option<Mark>,
    link: Option<String>,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(mut self) -> Result<Document, MarkupError> {
        let mut blocks = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                break;
            }

            if self.input[self.pos..].starts_with('<') {
                let tag = self.lex_tag()?;
                if tag.closing {
                    return Err(MarkupError::UnexpectedClose(tag.name));
                }
                if let Some(kind) = BlockKind::from_tag(&tag.name) {
                    self.pos = tag.end;
                    let runs = self.parse_inline(Some(tag.name.as_str()))?;
                    blocks.push(Block { kind, runs });
                    continue;
                }
                // Inline tag at top level opens an implicit paragraph.
                Self::check_inline(&tag)?;
            }

            let runs = self.parse_inline(None)?;
            if runs.iter().any(|run| !run.text.trim().is_empty()) {
                blocks.push(Block {
                    kind: BlockKind::Paragraph,
                    runs,
                });
            }
        }
        Document::new(blocks)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn check_inline(tag: &Tag) -> Result<(), MarkupError> {
        match tag.name.as_str() {
            "strong" | "b" | "em" | "i" | "u" | "a" | "br" => Ok(()),
            name if BlockKind::from_tag(name).is_some() => {
                Err(MarkupError::NestedBlock(name.to_string()))
            }
            name => Err(MarkupError::UnsupportedTag(name.to_string())),
        }
    }

    /// Parse inline content.
    ///
    /// With `close = Some(tag)` parsing ends after the matching `</tag>`.
    /// With `None` (implicit paragraph) it ends before the next block tag or
    /// at end of input.
    fn parse_inline(&mut self, close: Option<&str>) -> Result<Vec<Run>, MarkupError> {
        let mut runs = Vec::new();
        let mut stack: Vec<OpenInline> = Vec::new();

        loop {
            if self.pos >= self.input.len() {
                if let Some(open) = stack.last() {
                    return Err(MarkupError::Unclosed(open.name.clone()));
                }
                if let Some(name) = close {
                    return Err(MarkupError::Unclosed(name.to_string()));
                }
                return Ok(runs);
            }

            let rest = &self.input[self.pos..];
            if !rest.starts_with('<') {
                let len = rest.find('<').unwrap_or(rest.len());
                let text = collapse_whitespace(&decode_entities(&rest[..len]));
                runs.push(Self::styled_run(text, &stack));
                self.pos += len;
                continue;
            }

            let tag = self.lex_tag()?;
            if tag.closing {
                if stack.last().is_some_and(|open| open.name == tag.name) {
                    stack.pop();
                    self.pos = tag.end;
                    continue;
                }
                if stack.is_empty() && close == Some(tag.name.as_str()) {
                    self.pos = tag.end;
                    return Ok(runs);
                }
                return Err(MarkupError::UnexpectedClose(tag.name));
            }

            if BlockKind::from_tag(&tag.name).is_some() {
                if close.is_none() && stack.is_empty() {
                    // End of the implicit paragraph; leave the tag unread.
                    return Ok(runs);
                }
                return Err(MarkupError::NestedBlock(tag.name));
            }

            Self::check_inline(&tag)?;
            self.pos = tag.end;
            let (mark, link) = match tag.name.as_str() {
                "br" => {
                    runs.push(Self::styled_run("\n".to_string(), &stack));
                    continue;
                }
                "strong" | "b" => (Some(Mark::Bold), None),
                "em" | "i" => (Some(Mark::Italic), None),
                "u" => (Some(Mark::Underline), None),
                _ => (
                    None,
                    attr_value(&tag.attrs, "href").map(|v| decode_entities(&v)),
                ),
            };
            stack.push(OpenInline {
                name: tag.name,
                mark,
                link,
            });
        }
    }

    fn styled_run(text: String, stack: &[OpenInline]) -> Run {
        let mut run = Run::plain(text);
        for open in stack {
            if let Some(mark) = open.mark {
                run.marks.set(mark, true);
            }
            if open.link.is_some() {
                run.link = open.link.clone();
            }
        }
        run
    }

    /// Lex the tag starting at the current position without consuming it.
    fn lex_tag(&self) -> Result<Tag, MarkupError> {
        let rest = &self.input[self.pos..];
        let gt = rest
            .find('>')
            .ok_or(MarkupError::UnterminatedTag(self.pos))?;
        let inner = rest[1..gt].trim();

        let (closing, inner) = match inner.strip_prefix('/') {
            Some(stripped) => (true, stripped.trim_start()),
            None => (false, inner),
        };
        let inner = inner.strip_suffix('/').unwrap_or(inner).trim_end();
        let split = inner
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(inner.len());

        Ok(Tag {
            name: inner[..split].to_ascii_lowercase(),
            closing,
            attrs: inner[split..].trim().to_string(),
            end: self.pos + gt + 1,
        })
    }
}

/// Find the value of attribute `name` in a tag's attribute text.
fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs;
    while !rest.is_empty() {
        rest = rest.trim_start();
        let key_end = rest
            .find(|c: char| c == '=' || c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let Some(after_eq) = rest.strip_prefix('=') else {
            if key.is_empty() {
                return None;
            }
            continue;
        };
        let after_eq = after_eq.trim_start();

        let (value, remaining) = match after_eq.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &after_eq[1..];
                let end = body.find(quote)?;
                (&body[..end], &body[end + 1..])
            }
            _ => {
                let end = after_eq
                    .find(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(after_eq.len());
                (&after_eq[..end], &after_eq[end..])
            }
        };

        if key == name {
            return Some(value.to_string());
        }
        rest = remaining;
    }
    None
}
