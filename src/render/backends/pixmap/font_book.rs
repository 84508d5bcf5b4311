use super::font_manager::FontManager;
use crate::errors::RenderError;
use skrifa::raw::{FontRef, ReadError};
use std::collections::HashMap;
use std::sync::Arc;

/// Raw font file bytes plus the face index inside a collection.
#[derive(Clone)]
pub struct FontData {
    pub data: Arc<[u8]>,
    pub index: u32,
}

impl FontData {
    pub fn font_ref(&self) -> Result<FontRef<'_>, ReadError> {
        FontRef::from_index(&self.data, self.index)
    }
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Maps font family names to loaded fonts.
///
/// Fonts registered by the host win. Unknown names are resolved against the system fonts
/// (when enabled) and remembered, so every later lookup of the same name gets the same face.
pub struct FontBook {
    fonts: HashMap<String, FontData>,
    resolved_names: HashMap<String, String>,
    system: Option<FontManager>,
    fallback_family: String,
}

impl FontBook {
    /// Create a new, empty font book.
    pub fn new(use_system_fonts: bool, fallback_family: impl Into<String>) -> Self {
        Self {
            fonts: HashMap::new(),
            resolved_names: HashMap::new(),
            system: use_system_fonts.then(FontManager::new),
            fallback_family: fallback_family.into(),
        }
    }

    /// Registers font file bytes under `name`. The data must parse as a font.
    pub fn register(&mut self, name: &str, data: Vec<u8>, index: u32) -> Result<(), RenderError> {
        let font = FontData {
            data: Arc::from(data),
            index,
        };
        font.font_ref().map_err(|e| RenderError::MeasurementUnavailable {
            font: name.to_string(),
            reason: e.to_string(),
        })?;

        log::debug!("Registered font {}", name);
        self.resolved_names.remove(name);
        self.fonts.insert(name.to_string(), font);
        Ok(())
    }

    /// Resolve `name` to a font, trying registered fonts, then the system fonts, then the
    /// registered fallback family.
    pub fn fetch(&mut self, name: &str) -> Result<FontData, RenderError> {
        if let Some(font) = self.fonts.get(name) {
            return Ok(font.clone());
        }
        if let Some(font) = self.resolved_names.get(name).and_then(|r| self.fonts.get(r)) {
            return Ok(font.clone());
        }

        if let Some(system) = self.system.as_mut() {
            if let Some(font) = system.resolve(Some(name)) {
                log::debug!("Caching system font for {}", name);
                let resolved = format!("system:{name}");
                self.fonts.insert(resolved.clone(), font.clone());
                self.resolved_names.insert(name.to_string(), resolved);
                return Ok(font);
            }
        }

        if let Some(font) = self.fonts.get(&self.fallback_family).cloned() {
            self.resolved_names
                .insert(name.to_string(), self.fallback_family.clone());
            return Ok(font);
        }

        Err(RenderError::MeasurementUnavailable {
            font: name.to_string(),
            reason: "no registered or system font matches".to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }
}
