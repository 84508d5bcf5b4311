use crate::card::{Card, CardScene};
use crate::geometry::BoundingConstraint;
use tokio::sync::oneshot;

/// Commands accepted by a [`RenderWorker`](crate::renderer::RenderWorker).
#[derive(Debug)]
pub enum RenderCommand {
    SetCard(Box<Card>),
    SetScene(CardScene),
    SetConstraints(BoundingConstraint),
    /// Render again even if nothing changed
    Invalidate,
    /// Wait for every image load of the current scene, render, then reply
    Settle(oneshot::Sender<()>),
    Shutdown,
}
