use crate::card::{Card, CardScene};
use crate::errors::RenderError;
use crate::event::RenderCommand;
use crate::geometry::BoundingConstraint;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot;

/// Cloneable sender side of a [`RenderWorker`](crate::renderer::RenderWorker).
#[derive(Clone, Debug)]
pub struct RendererHandle {
    cmd_tx: Sender<RenderCommand>,
}

impl RendererHandle {
    pub fn new(cmd_tx: Sender<RenderCommand>) -> Self {
        Self { cmd_tx }
    }

    pub async fn set_card(&self, card: Card) -> Result<(), RenderError> {
        self.send(RenderCommand::SetCard(Box::new(card))).await
    }

    pub async fn set_scene(&self, scene: CardScene) -> Result<(), RenderError> {
        self.send(RenderCommand::SetScene(scene)).await
    }

    pub async fn set_constraints(&self, constraints: BoundingConstraint) -> Result<(), RenderError> {
        self.send(RenderCommand::SetConstraints(constraints)).await
    }

    pub async fn invalidate(&self) -> Result<(), RenderError> {
        self.send(RenderCommand::Invalidate).await
    }

    /// Resolves once the worker has loaded every image of the current scene and rendered.
    pub async fn settle(&self) -> Result<(), RenderError> {
        let (tx, rx) = oneshot::channel();
        self.send(RenderCommand::Settle(tx)).await?;
        rx.await.map_err(|_| RenderError::WorkerStopped)
    }

    pub async fn shutdown(&self) -> Result<(), RenderError> {
        self.send(RenderCommand::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    async fn send(&self, cmd: RenderCommand) -> Result<(), RenderError> {
        self.cmd_tx.send(cmd).await.map_err(|_| RenderError::WorkerStopped)
    }
}
