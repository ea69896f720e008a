use anyhow::{Result, anyhow};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, Tree, fontdb};
use std::path::Path;
use std::sync::Arc;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::core::template;
use crate::schemas::generate::GenerateRequest;
use crate::settings::{Config, DEFAULT_FONT_FAMILY};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[month padding:none]/[day padding:none]/[year] [hour repr:12 padding:none]:[minute]:[second] [period]"
);

/// Current wall clock in the cover's timestamp format.
///
/// Falls back to UTC when the local offset cannot be determined, which is
/// always the case once the process has spawned extra threads on unix.
pub fn timestamp_now() -> Result<String> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(TIMESTAMP_FORMAT)?)
}

/// Split a CSS font-family list into names, unquoted.
fn family_names(font_family: &str) -> Vec<&str> {
    font_family
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Whether any entry of the font-family list maps to a loaded face.
fn family_resolves(db: &fontdb::Database, font_family: &str) -> bool {
    let families: Vec<fontdb::Family> = family_names(font_family)
        .into_iter()
        .map(|name| match name.to_ascii_lowercase().as_str() {
            "serif" => fontdb::Family::Serif,
            "sans-serif" => fontdb::Family::SansSerif,
            "monospace" => fontdb::Family::Monospace,
            "cursive" => fontdb::Family::Cursive,
            "fantasy" => fontdb::Family::Fantasy,
            _ => fontdb::Family::Name(name),
        })
        .collect();

    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    db.query(&query).is_some()
}

/// Family of an installed upright regular face, preferring sans families.
fn fallback_family(db: &fontdb::Database) -> Option<String> {
    let regular = |face: &&fontdb::FaceInfo| {
        face.style == fontdb::Style::Normal && face.weight == fontdb::Weight::NORMAL
    };
    let name = |face: &fontdb::FaceInfo| face.families.first().map(|(name, _)| name.clone());

    db.faces()
        .filter(regular)
        .filter_map(name)
        .find(|family| family.contains("Sans"))
        .or_else(|| db.faces().filter(regular).find_map(name))
        .or_else(|| db.faces().find_map(name))
}

#[derive(Clone)]
pub struct CoverRenderer {
    fontdb: Arc<fontdb::Database>,
    font_family: String,
}

impl CoverRenderer {
    /// Renderer over the system fonts with the default family.
    pub fn new() -> Result<Self> {
        Self::with_fonts(None, DEFAULT_FONT_FAMILY)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_fonts(config.font_dir.as_deref(), &config.font_family)
    }

    pub fn with_fonts(font_dir: Option<&str>, font_family: &str) -> Result<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        if let Some(dir) = font_dir {
            let path = Path::new(dir);
            if !path.is_dir() {
                return Err(anyhow!("Font directory not found: {}", dir));
            }
            db.load_fonts_dir(path);
        }

        tracing::info!("Loaded {} font faces", db.len());
        if db.is_empty() {
            tracing::warn!("No fonts available, cover text will not be drawn");
        }

        let mut font_family = font_family.to_string();
        if !db.is_empty() && !family_resolves(&db, &font_family) {
            if let Some(fallback) = fallback_family(&db) {
                tracing::warn!(
                    "Font family {:?} not installed, falling back to {:?}",
                    font_family,
                    fallback
                );
                db.set_sans_serif_family(fallback.as_str());
                font_family = format!("'{fallback}', sans-serif");
            }
        }

        Ok(Self {
            fontdb: Arc::new(db),
            font_family,
        })
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Render a cover stamped with the current time.
    pub async fn render(&self, params: GenerateRequest) -> Result<Vec<u8>> {
        let renderer = self.clone();

        tokio::task::spawn_blocking(move || {
            let generated_at = timestamp_now()?;
            renderer.render_at(&params, &generated_at)
        })
        .await
        .map_err(|e| anyhow!("Task join error: {}", e))?
    }

    /// Render a cover stamped with `generated_at`.
    ///
    /// Output depends only on the arguments and the loaded fonts.
    pub fn render_at(&self, params: &GenerateRequest, generated_at: &str) -> Result<Vec<u8>> {
        let svg = template::generate_svg(params, generated_at, &self.font_family);

        let mut options = usvg::Options::default();
        options.fontdb = self.fontdb.clone();
        options.font_family = self.font_family.clone();

        let tree = Tree::from_str(&svg, &options)?;

        let size = tree.size().to_int_size();
        let mut pixmap = Pixmap::new(size.width(), size.height())
            .ok_or_else(|| anyhow!("Failed to allocate {}x{} pixmap", size.width(), size.height()))?;

        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        let png = pixmap.encode_png()?;
        tracing::debug!("Cover encoded, size: {} bytes", png.len());

        Ok(png)
    }
}
