//! `Engine` backed by a local `typst` binary.
//!
//! Bring-up checks the configured binary and creates a scratch directory. Each
//! compile writes the registered sources into a fresh job directory under it,
//! runs `typst compile`, and reads the artifact back. The job directory is removed
//! when the compile returns.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use crate::render::engine::{
    Diagnostic, Engine, EngineError, EngineOutput, OutputFormat, MAIN_SOURCE,
};

const PDF_OUTPUT: &str = "output.pdf";
const SVG_PAGE_PREFIX: &str = "page-";

pub struct TypstCliEngine {
    binary: PathBuf,
    font_path: Option<PathBuf>,
    scratch: Option<TempDir>,
    sources: Vec<(String, String)>,
}

impl TypstCliEngine {
    pub fn new(binary: PathBuf, font_path: Option<PathBuf>) -> Self {
        Self {
            binary,
            font_path,
            scratch: None,
            sources: Vec::new(),
        }
    }
}

#[async_trait]
impl Engine for TypstCliEngine {
    fn name(&self) -> &'static str {
        "typst-cli"
    }

    async fn init(&mut self) -> Result<(), EngineError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(EngineError::Protocol(format!(
                "{} --version exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        info!("Found {}", String::from_utf8_lossy(&output.stdout).trim());

        self.scratch = Some(tempfile::Builder::new().prefix("folio-typst-").tempdir()?);
        Ok(())
    }

    fn reset(&mut self) {
        self.sources.clear();
    }

    fn add_source(&mut self, path: &str, text: &str) {
        match self.sources.iter_mut().find(|(p, _)| p == path) {
            Some(entry) => entry.1 = text.to_string(),
            None => self.sources.push((path.to_string(), text.to_string())),
        }
    }

    async fn compile(&mut self, format: OutputFormat) -> Result<EngineOutput, EngineError> {
        let scratch = self.scratch.as_ref().ok_or(EngineError::NotInitialized)?;
        if !self.sources.iter().any(|(p, _)| p == MAIN_SOURCE) {
            return Err(EngineError::Protocol(format!(
                "no source registered at {MAIN_SOURCE}"
            )));
        }

        let job = tempfile::tempdir_in(scratch.path())?;
        for (path, text) in &self.sources {
            let target = job.path().join(path.trim_start_matches('/'));
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, text).await?;
        }

        let output_path = match format {
            OutputFormat::Pdf => job.path().join(PDF_OUTPUT),
            OutputFormat::Svg => job.path().join(format!("{SVG_PAGE_PREFIX}{{p}}.svg")),
        };

        let mut command = Command::new(&self.binary);
        command
            .arg("compile")
            .arg("--root")
            .arg(job.path())
            .arg("--diagnostic-format")
            .arg("short")
            .arg("--format")
            .arg(format.extension());
        if let Some(fonts) = &self.font_path {
            command.arg("--font-path").arg(fonts);
        }
        let output = command
            .arg(job.path().join(MAIN_SOURCE.trim_start_matches('/')))
            .arg(&output_path)
            .stdin(Stdio::null())
            .output()
            .await?;

        debug!("typst compile ({:?}) exited with {}", format, output.status);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Ok(EngineOutput::failed(parse_diagnostics(&stderr, job.path())));
        }

        let artifact = match format {
            OutputFormat::Pdf => tokio::fs::read(&output_path).await?,
            OutputFormat::Svg => stack_svg_pages(&read_svg_pages(job.path()).await?)?.into_bytes(),
        };
        Ok(EngineOutput::artifact(artifact))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Diagnostics
// ────────────────────────────────────────────────────────────────────────────

/// Pulls error lines out of short-format stderr, with the job directory
/// stripped from paths. Unrecognised but non-empty stderr becomes one diagnostic.
fn parse_diagnostics(stderr: &str, root: &Path) -> Vec<Diagnostic> {
    let prefix = format!("{}/", root.display());
    let errors: Vec<Diagnostic> = stderr
        .lines()
        .map(|line| line.trim().replace(&prefix, ""))
        .filter(|line| is_error_line(line))
        .map(Diagnostic::Text)
        .collect();

    if errors.is_empty() && !stderr.trim().is_empty() {
        return vec![Diagnostic::Text(stderr.trim().to_string())];
    }
    errors
}

/// Short format is `<file>:<line>:<col>: <severity>: <message>`; a bare
/// `error: ...` line has no location.
fn is_error_line(line: &str) -> bool {
    if line.starts_with("error:") {
        return true;
    }
    let mut fields = line.splitn(5, ": ");
    let location = fields.next().unwrap_or_default();
    let severity = fields.next();
    let mut position = location.rsplitn(3, ':');
    let has_line_col = position.next().is_some_and(is_number)
        && position.next().is_some_and(is_number)
        && position.next().is_some();
    has_line_col && severity == Some("error")
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

// ────────────────────────────────────────────────────────────────────────────
// SVG pages
// ────────────────────────────────────────────────────────────────────────────

/// Reads `page-N.svg` files in page order.
async fn read_svg_pages(dir: &Path) -> Result<Vec<String>, EngineError> {
    let mut numbered = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let page = name
            .strip_prefix(SVG_PAGE_PREFIX)
            .and_then(|rest| rest.strip_suffix(".svg"))
            .and_then(|n| n.parse::<u32>().ok());
        if let Some(page) = page {
            numbered.push((page, entry.path()));
        }
    }
    numbered.sort_by_key(|(page, _)| *page);

    let mut pages = Vec::with_capacity(numbered.len());
    for (_, path) in numbered {
        pages.push(tokio::fs::read_to_string(path).await?);
    }
    Ok(pages)
}

/// Root element of one page: its viewBox size and inner markup.
struct SvgPage<'a> {
    width: f64,
    height: f64,
    inner: &'a str,
}

fn parse_svg_page(svg: &str) -> Option<SvgPage<'_>> {
    let mut reader = Reader::from_str(svg);
    let mut depth = 0usize;
    let mut root: Option<(f64, f64, usize)> = None;

    loop {
        let event = reader.read_event().ok()?;
        let position = usize::try_from(reader.buffer_position()).ok()?;
        match event {
            Event::Start(e) if root.is_none() => {
                let (width, height) = svg_view_box(&e)?;
                root = Some((width, height, position));
                depth = 1;
            }
            Event::Empty(e) if root.is_none() => {
                let (width, height) = svg_view_box(&e)?;
                return Some(SvgPage {
                    width,
                    height,
                    inner: "",
                });
            }
            Event::Start(_) => depth += 1,
            Event::End(_) if root.is_some() => {
                depth -= 1;
                if depth == 0 {
                    let (width, height, inner_start) = root?;
                    let through_close = svg.get(inner_start..position)?;
                    let close = through_close.rfind("</")?;
                    return Some(SvgPage {
                        width,
                        height,
                        inner: &through_close[..close],
                    });
                }
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}

/// Width and height from the `viewBox` of a root `<svg>` element. Numbers may be
/// separated by whitespace, commas, or both.
fn svg_view_box(element: &BytesStart<'_>) -> Option<(f64, f64)> {
    if element.local_name().as_ref() != b"svg" {
        return None;
    }
    let attr = element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"viewBox")?;
    let value = std::str::from_utf8(&attr.value).ok()?;
    let dims: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|n| !n.is_empty())
        .map(|n| n.parse().ok())
        .collect::<Option<_>>()?;
    match dims.as_slice() {
        [_, _, width, height] => Some((*width, *height)),
        _ => None,
    }
}

/// Stacks pages vertically into a single SVG document.
fn stack_svg_pages(pages: &[String]) -> Result<String, EngineError> {
    match pages {
        [] => Err(EngineError::Protocol("compile produced no SVG pages".to_string())),
        [single] => Ok(single.clone()),
        _ => {
            let mut width = 0.0_f64;
            let mut offset = 0.0_f64;
            let mut body = String::new();

            for (index, svg) in pages.iter().enumerate() {
                let page = parse_svg_page(svg).ok_or_else(|| {
                    EngineError::Protocol(format!("page {} is not a readable SVG", index + 1))
                })?;
                body.push_str(&format!(
                    r#"<svg x="0" y="{offset}" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{inner}</svg>"#,
                    w = page.width,
                    h = page.height,
                    inner = page.inner,
                ));
                width = width.max(page.width);
                offset += page.height;
            }

            Ok(format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 {width} {offset}" width="{width}pt" height="{offset}pt">{body}</svg>"#
            ))
        }
    }
}
