use std::sync::Arc;

use apply_store::ApplyStore;
use chat_model::ChatModel;

use crate::apply::{ApplyController, ApplyCursor};
use crate::command::{ChunkStream, CommandContext, CommandRegistry, WorkspaceInfo};
use crate::error::CommandError;
use crate::host::{Host, HostCapabilities};

/// Everything one assistant session shares: commands, apply sessions and
/// the "apply next" cursor.
pub struct AssistantSession {
    model: Arc<dyn ChatModel>,
    host: Arc<dyn Host>,
    registry: CommandRegistry,
    store: Arc<ApplyStore>,
    cursor: Arc<ApplyCursor>,
    controller: ApplyController,
    workspace: WorkspaceInfo,
}

impl AssistantSession {
    /// Session with the built-in commands and default host capabilities.
    pub fn new(model: Arc<dyn ChatModel>, host: Arc<dyn Host>) -> Result<Self, CommandError> {
        let registry = CommandRegistry::with_builtins()?;
        Ok(Self::with_registry(model, host, registry))
    }

    pub fn with_registry(
        model: Arc<dyn ChatModel>,
        host: Arc<dyn Host>,
        registry: CommandRegistry,
    ) -> Self {
        let store = Arc::new(ApplyStore::new());
        let cursor = Arc::new(ApplyCursor::new());
        let controller =
            ApplyController::new(Arc::clone(&host), Arc::clone(&store), Arc::clone(&cursor));
        Self {
            model,
            host,
            registry,
            store,
            cursor,
            controller,
            workspace: WorkspaceInfo::default(),
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.controller = self.controller.with_capabilities(capabilities);
        self
    }

    pub fn set_workspace(&mut self, workspace: WorkspaceInfo) {
        self.workspace = workspace;
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn store(&self) -> &Arc<ApplyStore> {
        &self.store
    }

    pub fn cursor(&self) -> &Arc<ApplyCursor> {
        &self.cursor
    }

    pub fn controller(&self) -> &ApplyController {
        &self.controller
    }

    /// Runs command `name` against the session's model, host and workspace.
    pub fn run(&self, name: &str, input: &str) -> Result<ChunkStream, CommandError> {
        let ctx = CommandContext::new(Arc::clone(&self.model), Arc::clone(&self.host), input)
            .with_workspace(self.workspace.clone());
        self.registry.execute(name, ctx)
    }

    /// Ends the session: apply sessions are dropped and the cursor rewinds.
    pub fn shutdown(&self) {
        tracing::info!(sessions = self.store.len(), "assistant session shut down");
        self.store.clear();
        self.cursor.reset();
    }
}
