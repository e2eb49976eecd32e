//! JaCoCo XML report parser.
//!
//! A report nests `package` elements (optionally inside `group`s), each
//! holding `class` and `sourcefile` elements plus its own `counter` rollups.
//! The module totals are taken from those package rollups, and every
//! `sourcefile` becomes one [`FileCoverage`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, error};

use crate::collector::ReportLocation;
use crate::error::{CoverageError, CoverageResult};
use crate::model::{Counter, CounterKind, Counters, FileCoverage, ModuleCoverage};

/// A report that could not be turned into a [`ModuleCoverage`].
#[derive(Debug)]
pub struct ReportFailure {
    pub module: String,
    pub path: PathBuf,
    pub error: CoverageError,
}

impl fmt::Display for ReportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error parsing {} ({}): {}",
            self.module,
            self.path.display(),
            self.error
        )
    }
}

pub type ReportOutcome = Result<ModuleCoverage, ReportFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Package,
    SourceFile,
    Counter,
    Other,
}

impl Element {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"package" => Element::Package,
            b"sourcefile" => Element::SourceFile,
            b"counter" => Element::Counter,
            _ => Element::Other,
        }
    }
}

/// Parses every located report. One outcome per location, in order; a
/// failure is logged and never stops the remaining reports.
pub fn parse_reports(reports: &[ReportLocation]) -> Vec<ReportOutcome> {
    reports.iter().map(parse_located).collect()
}

/// Parses one located report, logging the failure if there is one.
pub fn parse_located(report: &ReportLocation) -> ReportOutcome {
    parse_report_file(&report.module, &report.path).map_err(|err| {
        let failure = ReportFailure {
            module: report.module.clone(),
            path: report.path.clone(),
            error: err,
        };
        error!("{failure}");
        failure
    })
}

pub fn parse_report_file(module: &str, path: &Path) -> CoverageResult<ModuleCoverage> {
    let xml = fs::read_to_string(path).map_err(|err| CoverageError::io(path, err))?;
    parse_report_str(module, &xml)
}

/// Parses one report document. The module name is supplied by the caller;
/// the report's own `name` attribute is not used.
pub fn parse_report_str(module: &str, xml: &str) -> CoverageResult<ModuleCoverage> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text(true);
    config.expand_empty_elements = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut counters = Counters::default();
    let mut files = Vec::new();
    let mut current_file: Option<FileCoverage> = None;
    let mut saw_root = false;
    let mut root_closed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) if root_closed => {
                return Err(CoverageError::xml("content after document element"));
            }
            Ok(Event::Start(elem)) => {
                let element = Element::from_name(elem.name().as_ref());
                match (element, stack.last().copied()) {
                    (Element::SourceFile, Some(Element::Package)) => {
                        let name = attribute(&elem, b"name")?.ok_or_else(|| {
                            CoverageError::xml("sourcefile without a name attribute")
                        })?;
                        current_file = Some(FileCoverage::new(name, Counters::default()));
                    }
                    (Element::Counter, Some(Element::SourceFile)) => {
                        if let (Some(file), Some((kind, counter))) =
                            (current_file.as_mut(), read_counter(&elem)?)
                        {
                            *file.counters.slot_mut(kind) = counter;
                        }
                    }
                    (Element::Counter, Some(Element::Package)) => {
                        if let Some((kind, counter)) = read_counter(&elem)? {
                            *counters.slot_mut(kind) += counter;
                        }
                    }
                    _ => {}
                }
                saw_root = true;
                stack.push(element);
            }
            Ok(Event::End(_)) => {
                if stack.pop() == Some(Element::SourceFile) {
                    if let Some(file) = current_file.take() {
                        files.push(file);
                    }
                }
                if stack.is_empty() {
                    root_closed = true;
                }
            }
            // Character data is only allowed inside the root element.
            Ok(Event::Text(text)) if stack.is_empty() && !is_blank(&text) => {
                return Err(CoverageError::xml(if root_closed {
                    "content after document element"
                } else {
                    "content before document element"
                }));
            }
            Ok(Event::CData(_)) if stack.is_empty() => {
                return Err(CoverageError::xml("character data outside document element"));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(CoverageError::xml(format!(
                    "XML parse error at position {}: {}",
                    reader.error_position(),
                    err
                )))
            }
        }
    }

    if !saw_root {
        return Err(CoverageError::xml("document has no root element"));
    }
    if !stack.is_empty() {
        return Err(CoverageError::xml("unexpected end of document"));
    }

    debug!(module, files = files.len(), "parsed coverage report");
    Ok(ModuleCoverage::new(module, counters, files))
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Reads a `counter` element. Kinds this tool does not consume yield `None`.
fn read_counter(elem: &BytesStart<'_>) -> CoverageResult<Option<(CounterKind, Counter)>> {
    let Some(kind) = attribute(elem, b"type")?
        .as_deref()
        .and_then(CounterKind::from_jacoco)
    else {
        return Ok(None);
    };

    let missed = count(elem, kind, "missed")?;
    let covered = count(elem, kind, "covered")?;
    Ok(Some((kind, Counter::new(missed, covered))))
}

// An absent count attribute reads as zero.
fn count(elem: &BytesStart<'_>, kind: CounterKind, name: &'static str) -> CoverageResult<u64> {
    match attribute(elem, name.as_bytes())? {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| CoverageError::InvalidCount {
                kind,
                attribute: name,
                value,
            }),
    }
}

fn attribute(elem: &BytesStart<'_>, key: &[u8]) -> CoverageResult<Option<String>> {
    let Some(attr) = elem.try_get_attribute(key).map_err(CoverageError::xml)? else {
        return Ok(None);
    };
    let raw = std::str::from_utf8(&attr.value).map_err(CoverageError::xml)?;
    let value = unescape(raw).map_err(CoverageError::xml)?;
    Ok(Some(value.into_owned()))
}
