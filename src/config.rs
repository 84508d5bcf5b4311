use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "CardRenderer/0.1 (+https://crates.io/crates/card-renderer)";

/// Native width of a card in layout units. Scenes are authored against this size.
pub const CARD_WIDTH: f32 = 747.0;
/// Native height of a card in layout units.
pub const CARD_HEIGHT: f32 = 1038.0;

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Native card width; the scene coordinate space
    pub card_width: f32,
    /// Native card height
    pub card_height: f32,
    /// CSS color used to fill the whole surface before anything else is drawn
    pub background: String,
    /// A pending image load that takes longer than this is marked as failed
    pub image_load_timeout: Duration,
    /// Resolve unregistered font names against the installed system fonts
    pub use_system_fonts: bool,
    /// Family tried when a named font is neither registered nor installed
    pub fallback_family: String,
    /// User agent string for remote image requests
    pub user_agent: String,
    /// Capacity of the command channel between a [`RendererHandle`](crate::renderer::RendererHandle) and its worker
    pub command_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            card_width: CARD_WIDTH,
            card_height: CARD_HEIGHT,
            background: "#cdcdcd".to_string(),
            image_load_timeout: Duration::from_secs(10),
            use_system_fonts: true,
            fallback_family: "SansSerif".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            command_capacity: 64,
        }
    }
}
