use crate::event::RenderCommand;
use crate::renderer::{CardRenderer, RendererHandle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs a [`CardRenderer`] on its own task.
///
/// Commands that queue up while a pass is running are applied together before the next
/// pass, so only the latest scene and constraints are ever drawn. Finished image loads
/// trigger a new pass as they arrive.
pub struct RenderWorker {
    renderer: CardRenderer,
    cmd_rx: mpsc::Receiver<RenderCommand>,
}

impl RenderWorker {
    pub fn new(renderer: CardRenderer, cmd_rx: mpsc::Receiver<RenderCommand>) -> Self {
        Self { renderer, cmd_rx }
    }

    /// Spawns a worker for `renderer` on the current runtime.
    pub fn spawn(renderer: CardRenderer) -> (RendererHandle, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(renderer.config().command_capacity.max(1));
        let task = tokio::spawn(Self::new(renderer, cmd_rx).run());
        (RendererHandle::new(cmd_tx), task)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                msg = self.cmd_rx.recv() => {
                    let Some(cmd) = msg else {
                        // All handles dropped
                        break;
                    };
                    if !self.handle_command(cmd).await {
                        break;
                    }
                    if !self.drain_queued().await {
                        break;
                    }
                    self.render();
                }

                completion = self.renderer.cache_mut().next_completion() => {
                    self.renderer.apply_completion(completion);
                    self.render();
                }
            }
        }
        log::debug!("render worker stopped");
    }

    /// Applies every command already waiting in the channel. Returns false on shutdown.
    async fn drain_queued(&mut self) -> bool {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            if !self.handle_command(cmd).await {
                return false;
            }
        }
        true
    }

    /// Returns false when the worker should stop.
    async fn handle_command(&mut self, cmd: RenderCommand) -> bool {
        match cmd {
            RenderCommand::SetCard(card) => {
                self.renderer.set_card(&card);
            }
            RenderCommand::SetScene(scene) => {
                self.renderer.set_scene(scene);
            }
            RenderCommand::SetConstraints(constraints) => {
                if let Err(e) = self.renderer.set_constraints(constraints) {
                    log::warn!("ignoring constraints {constraints:?}: {e}");
                }
            }
            RenderCommand::Invalidate => self.renderer.invalidate(),
            RenderCommand::Settle(reply) => {
                if let Err(e) = self.renderer.settle().await {
                    log::error!("render pass failed: {e}");
                }
                let _ = reply.send(());
            }
            RenderCommand::Shutdown => return false,
        }
        true
    }

    fn render(&mut self) {
        match self.renderer.tick() {
            Ok(result) if result.rendered => {
                log::debug!("worker pass {} ({:?})", self.renderer.epoch(), result.status);
            }
            Ok(_) => {}
            Err(e) => log::error!("render pass failed: {e}"),
        }
    }
}
