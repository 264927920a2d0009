use crate::application::scout::BaseballAgent;
use std::sync::Arc;

pub struct ServerState {
    agent: Arc<BaseballAgent>,
}

impl ServerState {
    pub fn new(agent: Arc<BaseballAgent>) -> Self {
        Self { agent }
    }

    pub(crate) fn agent(&self) -> Arc<BaseballAgent> {
        Arc::clone(&self.agent)
    }
}
