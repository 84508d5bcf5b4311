/// What the renderer is doing after a tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    /// Nothing to draw yet, or nothing changed since the last pass.
    #[default]
    Idle,
    /// A pass ran but some images are still loading; another pass follows when they land.
    Partial,
    /// A pass ran with every image resolved (drawn or failed).
    Rendered,
}

#[derive(Default, Debug, Clone)]
pub struct TickResult {
    pub status: RenderStatus,
    /// A render pass ran and its output went to the sink
    pub rendered: bool,
    /// The surface was created or resized
    pub resized: bool,
    /// Image loads applied to the cache during this tick
    pub loads_applied: usize,
    pub pending_images: usize,
}

/// Why the next tick has to render.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyFlags {
    pub scene: bool,       // Card data changed
    pub constraints: bool, // Output bounds changed
    pub images: bool,      // An image finished loading
    pub forced: bool,      // Redraw requested explicitly
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.scene || self.constraints || self.images || self.forced
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_flags() {
        let mut flags = DirtyFlags::default();
        assert!(!flags.any());
        flags.images = true;
        assert!(flags.any());
        flags.clear();
        assert!(!flags.any());
    }
}
