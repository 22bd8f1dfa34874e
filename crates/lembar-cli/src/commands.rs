// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers. Each returns a value the binary prints, so the
// handlers stay testable without capturing stdout.

use std::path::{Path, PathBuf};

use lembar_core::error::Result;
use lembar_core::{RenderWarning, TemplateConfig, Variant};
use lembar_layout::{LayoutConfig, chunk, order_items};
use lembar_render::{DocumentRenderer, DocumentSource, RenderRequest, RenderRequestHandler};
use serde::Serialize;
use tracing::info;

use crate::bundle::JsonFileSource;

/// What `render` wrote.
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub page_count: usize,
    pub sha256: String,
    pub warnings: Vec<RenderWarning>,
}

/// `template` from `path`, or the built-in default.
pub fn load_template(path: Option<&Path>) -> Result<TemplateConfig> {
    match path {
        Some(path) => TemplateConfig::load(path),
        None => Ok(TemplateConfig::default()),
    }
}

/// Render the bundle at `bundle` and write the PDF into `out_dir`.
pub fn render(
    bundle: &Path,
    variant: &str,
    out_dir: &Path,
    template: Option<&Path>,
) -> Result<RenderOutcome> {
    let renderer = DocumentRenderer::new(load_template(template)?)?;
    let source = JsonFileSource::new(bundle);
    let key = source.key()?;
    let handler = RenderRequestHandler::new(source, renderer);

    let rendered = handler.handle(&RenderRequest {
        key,
        variant: variant.to_string(),
    })?;

    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&rendered.suggested_filename);
    std::fs::write(&path, &rendered.bytes)?;
    info!(path = %path.display(), "PDF saved");

    Ok(RenderOutcome {
        path,
        page_count: rendered.page_count,
        sha256: rendered.sha256,
        warnings: rendered.warnings,
    })
}

/// Write the default template to `path` for editing.
pub fn write_template(path: &Path) -> Result<()> {
    TemplateConfig::default().save(path)
}

/// One page of a page plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPage {
    /// 1-based.
    pub page: usize,
    /// 1-based global row numbers, `None` for an empty page.
    pub rows: Option<(usize, usize)>,
    pub signature: bool,
}

/// How a document would paginate under one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    pub variant: Variant,
    pub rows_per_page: usize,
    pub item_count: usize,
    pub pages: Vec<PlannedPage>,
}

/// Chunk the bundle's items without rendering.
pub fn inspect(bundle: &Path, variant: &str) -> Result<PagePlan> {
    let variant: Variant = variant.parse()?;
    let source = JsonFileSource::new(bundle);
    let document = source.fetch(&source.key()?)?;

    let layout = LayoutConfig::for_variant(variant);
    let items = order_items(document.items);
    let chunks = chunk(&items, layout.rows_per_page)?;
    let pages = chunks
        .iter()
        .map(|c| PlannedPage {
            page: c.page_index + 1,
            rows: (!c.is_empty()).then(|| (c.first_row_number, c.first_row_number + c.len() - 1)),
            signature: c.is_last_page,
        })
        .collect();

    Ok(PagePlan {
        variant,
        rows_per_page: layout.rows_per_page,
        item_count: items.len(),
        pages,
    })
}

impl std::fmt::Display for PagePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} variant: {} items, {} rows per page, {} page(s)",
            self.variant,
            self.item_count,
            self.rows_per_page,
            self.pages.len()
        )?;
        for page in &self.pages {
            let rows = match page.rows {
                Some((first, last)) => format!("rows {first}-{last}"),
                None => "no rows".to_string(),
            };
            let signature = if page.signature { "  + signature block" } else { "" };
            writeln!(f, "  page {}: {rows}{signature}", page.page)?;
        }
        Ok(())
    }
}
