use std::sync::Arc;

use chat_model::ChatModel;
use chat_model_mock::{MockChatModel, MOCK_PROVIDER_ID};

pub fn provider_for_id(provider_id: &str) -> Result<Arc<dyn ChatModel>, String> {
    match provider_id.trim() {
        MOCK_PROVIDER_ID => Ok(Arc::new(MockChatModel::default())),
        unknown => Err(format!(
            "Unsupported provider '{unknown}'. Available providers: {MOCK_PROVIDER_ID}"
        )),
    }
}
