//! High-level report API.
//!
//! A [`Report`] holds the layout description and document settings. It can
//! be built in code or loaded from JSON, and turned into PDF bytes with
//! [`Report::generate`].
//!
//! ```
//! use pdf_report::Report;
//!
//! let mut report = Report::new();
//! report.add_header("Build Summary");
//! report.add_divider();
//! report.add_page("Details");
//!
//! let bytes = report.generate().unwrap();
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! ```

use crate::elements::{Element, Page};
use crate::error::{Error, Result};
use crate::layout::LayoutEngine;
use crate::writer::{Margins, PdfWriter, PdfWriterConfig};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Name of the page created implicitly by the `add_*` helpers.
const DEFAULT_PAGE_NAME: &str = "Main Page";

/// Name of the page that receives a legacy flat element list.
const MIGRATED_PAGE_NAME: &str = "Migrated Content";

/// Document-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// File name used by [`Report::save_in`]
    pub file_name: String,
    /// Margins for pages without overrides
    pub margins: Margins,
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let writer = PdfWriterConfig::default();
        Self {
            file_name: "report.pdf".to_string(),
            margins: writer.margins,
            page_width: writer.page_width,
            page_height: writer.page_height,
        }
    }
}

impl ReportConfig {
    /// Writer configuration for these settings.
    pub fn writer_config(&self) -> PdfWriterConfig {
        PdfWriterConfig::default()
            .with_page_size(self.page_width, self.page_height)
            .with_margins(self.margins)
    }

    fn validate(&self) -> Result<()> {
        if !(self.page_width > 0.0 && self.page_height > 0.0)
            || !self.page_width.is_finite()
            || !self.page_height.is_finite()
        {
            return Err(Error::InvalidLayout(format!(
                "page size {}x{} must be positive",
                self.page_width, self.page_height
            )));
        }
        Ok(())
    }
}

/// A report: settings plus an ordered list of pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    /// Document settings
    pub config: ReportConfig,
    /// Pages in output order
    pub pages: Vec<Page>,
    /// Flat element list from layouts that predate pages.
    ///
    /// Used only when `pages` is empty, as a single page.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<Element>,
}

impl Report {
    /// Empty report with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty report with the given settings.
    pub fn with_config(config: ReportConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parse a report from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON report file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the report to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a centered bold heading to the last page.
    pub fn add_header(&mut self, text: impl Into<String>) {
        self.add_element(Element::header(text));
    }

    /// Append a divider to the last page.
    pub fn add_divider(&mut self) {
        self.add_element(Element::divider());
    }

    /// Append `element` to the last page, creating a page if there is none.
    pub fn add_element(&mut self, element: Element) {
        if self.pages.is_empty() {
            self.pages.push(Page::new(DEFAULT_PAGE_NAME));
        }
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    /// Start a new page; following `add_*` calls go to it.
    pub fn add_page(&mut self, name: impl Into<String>) {
        self.pages.push(Page::new(name));
    }

    /// Remove all pages and elements.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.elements.clear();
    }

    /// Whether there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.elements.is_empty()
    }

    /// Pages to render, with a legacy element list folded into one page.
    pub fn effective_pages(&self) -> Cow<'_, [Page]> {
        if self.pages.is_empty() && !self.elements.is_empty() {
            let mut page = Page::new(MIGRATED_PAGE_NAME);
            page.elements = self.elements.clone();
            return Cow::Owned(vec![page]);
        }
        Cow::Borrowed(&self.pages)
    }

    /// Lay the report out into a fresh writer.
    pub fn render(&self) -> Result<PdfWriter> {
        self.config.validate()?;
        if self.is_empty() {
            log::warn!("Report has no pages or elements");
        }

        let mut writer = PdfWriter::with_config(self.config.writer_config());
        LayoutEngine::new(self.config.margins).render(&mut writer, &self.effective_pages());
        Ok(writer)
    }

    /// Generate the PDF bytes.
    pub fn generate(&self) -> Result<Vec<u8>> {
        self.render()?.to_bytes()
    }

    /// Generate and write the PDF to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.render()?.save(path)?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }

    /// Generate and write the PDF to `dir` under the configured file name.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.config.file_name);
        self.save(&path)?;
        Ok(path)
    }
}
