//! Markup-to-HTML conversion.
//!
//! The renderer's output is pandoc Markdown, so the default converter hands
//! it to an external `pandoc` process. [`BuiltinConverter`] covers the subset
//! of pandoc Markdown the renderer emits, for machines without pandoc; it is
//! only used when configured and never as an automatic fallback.
//!
//! ## Pandoc Invocation
//!
//! ```text
//! pandoc --table-of-contents --toc-depth=6 --from=markdown --to=html5 \
//!        --include-in-header=style.css
//! ```
//!
//! Markup goes in on stdin, HTML comes out on stdout. stdin is fed from a
//! scoped thread while stdout and stderr are drained, so a program that
//! writes before it has consumed its input cannot stall on a full pipe.
//!
//! ## Builtin Output
//!
//! A standalone HTML5 document shaped like pandoc's:
//!
//! ```text
//! <head>  ... stylesheet file contents, verbatim ...
//! <body>
//!   header#title-block-header   h1.title, p.author, p.date
//!   nav#TOC                     one link per heading up to toc_depth
//!   ...                         body, headings carry auto identifiers
//! ```

use crate::config::{ConvertConfig, ConverterKind};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{
    CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream, html as md_html,
};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("Failed to read stylesheet {}: {source}", path.display())]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Converter output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Turns the report markup into an HTML document.
pub trait DocumentConverter {
    fn convert(&self, markup: &str) -> Result<String, ConvertError>;
}

/// Build the configured converter. The stylesheet path is resolved against
/// `base_dir` unless it is already absolute.
pub fn converter_from_config(config: &ConvertConfig, base_dir: &Path) -> Box<dyn DocumentConverter> {
    let stylesheet = base_dir.join(&config.stylesheet);
    match config.converter {
        ConverterKind::Pandoc => Box::new(Pandoc::new(&config.program, stylesheet, config.toc_depth)),
        ConverterKind::Builtin => Box::new(BuiltinConverter::new(stylesheet, config.toc_depth)),
    }
}

// ============================================================================
// Pandoc
// ============================================================================

/// Converter backed by an external pandoc process.
#[derive(Debug, Clone, PartialEq)]
pub struct Pandoc {
    program: String,
    stylesheet: PathBuf,
    toc_depth: u8,
}

impl Pandoc {
    pub fn new(program: impl Into<String>, stylesheet: impl Into<PathBuf>, toc_depth: u8) -> Self {
        Self {
            program: program.into(),
            stylesheet: stylesheet.into(),
            toc_depth,
        }
    }

    /// Command-line arguments passed to the program.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--table-of-contents".to_string(),
            format!("--toc-depth={}", self.toc_depth),
            "--from=markdown".to_string(),
            "--to=html5".to_string(),
            format!("--include-in-header={}", self.stylesheet.display()),
        ]
    }
}

impl DocumentConverter for Pandoc {
    fn convert(&self, markup: &str) -> Result<String, ConvertError> {
        let args = self.args();
        log::debug!("running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            // stdin is dropped when the writer returns, which closes the pipe
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(markup.as_bytes()),
                None => Err(io::Error::other("child stdin was not captured")),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output?;
        if !output.status.success() {
            return Err(ConvertError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(String::from_utf8(output.stdout)?)
    }
}

// ============================================================================
// Builtin
// ============================================================================

/// In-process converter for the Markdown subset the renderer produces.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinConverter {
    stylesheet: PathBuf,
    toc_depth: u8,
}

/// The `%` lines at the top of the document.
#[derive(Debug, Default, PartialEq)]
struct TitleBlock {
    title: String,
    author: String,
    date: String,
}

#[derive(Debug, PartialEq)]
struct Heading {
    level: u8,
    id: String,
    text: String,
}

impl BuiltinConverter {
    pub fn new(stylesheet: impl Into<PathBuf>, toc_depth: u8) -> Self {
        Self {
            stylesheet: stylesheet.into(),
            toc_depth,
        }
    }
}

impl DocumentConverter for BuiltinConverter {
    fn convert(&self, markup: &str) -> Result<String, ConvertError> {
        let stylesheet =
            std::fs::read_to_string(&self.stylesheet).map_err(|source| ConvertError::Stylesheet {
                path: self.stylesheet.clone(),
                source,
            })?;

        let (title, body) = split_title_block(markup);

        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let mut events: Vec<Event> = TextMergeStream::new(Parser::new_ext(body, options)).collect();
        let headings = assign_heading_ids(&mut events);
        let events = attach_image_attributes(events);

        let mut body_html = String::new();
        md_html::push_html(&mut body_html, events.into_iter());

        let toc: Vec<&Heading> = headings
            .iter()
            .filter(|h| h.level <= self.toc_depth)
            .collect();
        log::debug!("builtin conversion: {} headings, {} in toc", headings.len(), toc.len());

        Ok(standalone_document(&title, &stylesheet, &toc, body_html).into_string())
    }
}

/// Split off up to three leading `%` lines (title, author, date).
fn split_title_block(markup: &str) -> (TitleBlock, &str) {
    let mut fields: Vec<String> = Vec::new();
    let mut offset = 0;
    for line in markup.split_inclusive('\n') {
        if fields.len() == 3 {
            break;
        }
        let Some(value) = line.strip_prefix('%') else {
            break;
        };
        fields.push(value.trim().to_string());
        offset += line.len();
    }

    let mut fields = fields.into_iter();
    let title = TitleBlock {
        title: fields.next().unwrap_or_default(),
        author: fields.next().unwrap_or_default(),
        date: fields.next().unwrap_or_default(),
    };
    (title, &markup[offset..])
}

/// Give every heading a unique pandoc-style identifier and collect the
/// headings in document order.
fn assign_heading_ids(events: &mut [Event]) -> Vec<Heading> {
    let mut used = HashSet::new();
    let mut headings = Vec::new();

    let mut i = 0;
    while i < events.len() {
        let level = match &events[i] {
            Event::Start(Tag::Heading { level, .. }) => *level as u8,
            _ => {
                i += 1;
                continue;
            }
        };

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() && !matches!(events[end], Event::End(TagEnd::Heading(_))) {
            if let Event::Text(t) | Event::Code(t) = &events[end] {
                text.push_str(t);
            }
            end += 1;
        }

        let id = unique_identifier(&text, &mut used);
        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[i] {
            *slot = Some(CowStr::from(id.clone()));
        }
        headings.push(Heading { level, id, text });
        i = end + 1;
    }
    headings
}

/// Pandoc's auto identifier: keep alphanumerics, `_`, `-` and `.`, turn
/// whitespace into `-`, lowercase, then drop everything before the first
/// letter.
fn auto_identifier(text: &str) -> String {
    let id: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.'))
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .flat_map(char::to_lowercase)
        .collect();
    let id = id.trim_start_matches(|c: char| !c.is_alphabetic());
    if id.is_empty() {
        "section".to_string()
    } else {
        id.to_string()
    }
}

/// Duplicates get `-1`, `-2`, ... appended.
fn unique_identifier(text: &str, used: &mut HashSet<String>) -> String {
    let base = auto_identifier(text);
    let mut id = base.clone();
    let mut n = 0;
    while used.contains(&id) {
        n += 1;
        id = format!("{base}-{n}");
    }
    used.insert(id.clone());
    id
}

/// Replace each image with an `<img>` tag, consuming a directly following
/// `{width=.. height=..}` attribute block into its `style`.
fn attach_image_attributes(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut iter = events.into_iter().peekable();

    while let Some(event) = iter.next() {
        let (dest_url, title) = match event {
            Event::Start(Tag::Image { dest_url, title, .. }) => (dest_url, title),
            other => {
                out.push(other);
                continue;
            }
        };

        let mut alt = String::new();
        for inner in iter.by_ref() {
            match inner {
                Event::End(TagEnd::Image) => break,
                Event::Text(t) | Event::Code(t) => alt.push_str(&t),
                _ => {}
            }
        }

        let attributes = match iter.peek() {
            Some(Event::Text(next)) => split_attribute_block(next)
                .map(|(attrs, rest)| (image_style(attrs), rest.to_string())),
            _ => None,
        };
        let mut trailing = None;
        let mut style = None;
        if let Some((parsed_style, rest)) = attributes {
            iter.next();
            style = parsed_style;
            if !rest.is_empty() {
                trailing = Some(Event::Text(CowStr::from(rest)));
            }
        }

        out.push(Event::InlineHtml(CowStr::from(
            image_tag(&dest_url, &alt, &title, style.as_deref()).into_string(),
        )));
        out.extend(trailing);
    }
    out
}

/// `{...}` at the start of `text`: returns the inside and what follows.
fn split_attribute_block(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix('{')?;
    let end = inner.find('}')?;
    Some((&inner[..end], &inner[end + 1..]))
}

/// `width=90% height=2in` → `width:90%;height:2in`. Other attributes are ignored.
fn image_style(attributes: &str) -> Option<String> {
    let rules: Vec<String> = attributes
        .split_whitespace()
        .filter_map(|token| token.split_once('='))
        .filter(|(key, _)| matches!(*key, "width" | "height"))
        .map(|(key, value)| format!("{key}:{value}"))
        .collect();
    (!rules.is_empty()).then(|| rules.join(";"))
}

fn image_tag(src: &str, alt: &str, title: &str, style: Option<&str>) -> Markup {
    let title = (!title.is_empty()).then_some(title);
    html! {
        img src=(src) alt=(alt) title=[title] style=[style];
    }
}

fn standalone_document(title: &TitleBlock, stylesheet: &str, toc: &[&Heading], body: String) -> Markup {
    let author = (!title.author.is_empty()).then_some(title.author.as_str());
    let date = (!title.date.is_empty()).then_some(title.date.as_str());

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0, user-scalable=yes";
                @if let Some(author) = author {
                    meta name="author" content=(author);
                }
                @if let Some(date) = date {
                    meta name="dcterms.date" content=(date);
                }
                title { (title.title) }
                (PreEscaped(stylesheet))
            }
            body {
                header id="title-block-header" {
                    h1.title { (title.title) }
                    @if let Some(author) = author {
                        p.author { (author) }
                    }
                    @if let Some(date) = date {
                        p.date { (date) }
                    }
                }
                nav id="TOC" role="doc-toc" {
                    @if !toc.is_empty() {
                        ul {
                            @for heading in toc {
                                li {
                                    a href={ "#" (heading.id) } id={ "toc-" (heading.id) } { (heading.text) }
                                }
                            }
                        }
                    }
                }
                (PreEscaped(body))
            }
        }
    }
}
