use crate::bracket::BracketError;
use image::RgbaImage;
use log::debug;
use resvg::usvg::fontdb;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Short code → team logo.
pub trait TeamAssets {
    fn logo(&self, code: &str) -> Result<RgbaImage, BracketError>;
}

/// Logos stored as `{dir}/{CODE}.gif`.
#[derive(Debug, Clone)]
pub struct LogoDir {
    dir: PathBuf,
}

impl LogoDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{code}.gif"))
    }
}

impl TeamAssets for LogoDir {
    fn logo(&self, code: &str) -> Result<RgbaImage, BracketError> {
        let path = self.path_for(code);
        image::open(&path)
            .map(|img| img.to_rgba8())
            .map_err(|e| BracketError::asset_missing(format!("logo {code}"), path, e))
    }
}

/// Read-only resources shared by every render: the blank bracket template
/// and the caption font. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct BracketAssets {
    template: Arc<RgbaImage>,
    fonts: Arc<fontdb::Database>,
    font_family: String,
}

impl BracketAssets {
    pub fn new(template: RgbaImage, fonts: fontdb::Database) -> Self {
        let font_family = fonts
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "sans-serif".to_owned());
        Self {
            template: Arc::new(template),
            fonts: Arc::new(fonts),
            font_family,
        }
    }

    /// Load the template image and caption font from disk. Either one
    /// missing is fatal.
    pub fn load(template_path: &Path, font_path: &Path) -> Result<Self, BracketError> {
        let template = image::open(template_path)
            .map_err(|e| BracketError::asset_missing("bracket template", template_path, e))?
            .to_rgba8();

        let font_data = std::fs::read(font_path)
            .map_err(|e| BracketError::asset_missing("caption font", font_path, e))?;
        let mut fonts = fontdb::Database::new();
        fonts.load_font_data(font_data);
        if fonts.is_empty() {
            return Err(BracketError::asset_missing(
                "caption font",
                font_path,
                "no usable font faces",
            ));
        }

        let assets = Self::new(template, fonts);
        debug!(
            "loaded {}x{} template, caption font {:?}",
            assets.template.width(),
            assets.template.height(),
            assets.font_family
        );
        Ok(assets)
    }

    #[cfg(test)]
    pub fn template(&self) -> &RgbaImage {
        &self.template
    }

    /// A fresh copy of the template to draw on.
    pub fn canvas(&self) -> RgbaImage {
        self.template.as_ref().clone()
    }

    pub fn fonts(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.fonts)
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}

#[cfg(test)]
impl TeamAssets for std::collections::HashMap<String, RgbaImage> {
    fn logo(&self, code: &str) -> Result<RgbaImage, BracketError> {
        self.get(code)
            .cloned()
            .ok_or_else(|| BracketError::asset_missing(format!("logo {code}"), code, "not in test set"))
    }
}
