use super::font_book::FontData;
use fontique::{Attributes, Collection, GenericFamily, QueryFamily, QueryStatus, SourceCache};
use std::sync::Arc;

/// Resolves family names against the fonts installed on the system, using Fontique.
pub struct FontManager {
    collection: Collection,
    cache: SourceCache,
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            collection: Collection::new(Default::default()),
            cache: SourceCache::new_shared(),
        }
    }

    /// Resolve a preferred family name; falls back to UI Sans → SansSerif.
    pub fn resolve(&mut self, prefer: Option<&str>) -> Option<FontData> {
        let mut q = self.collection.query(&mut self.cache);

        let mut families: Vec<QueryFamily> = Vec::new();
        if let Some(name) = prefer {
            families.push(QueryFamily::Named(name));
        }
        families.push(GenericFamily::UiSansSerif.into());
        families.push(GenericFamily::SansSerif.into());

        q.set_families(families);
        q.set_attributes(Attributes::default());

        let mut chosen: Option<FontData> = None;
        q.matches_with(|cand| {
            chosen = Some(FontData {
                data: Arc::from(cand.blob.data()),
                index: cand.index,
            });
            QueryStatus::Stop
        });

        chosen
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}
