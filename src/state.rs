use std::sync::Arc;

use crate::store::TodoStore;

/// Shared handles cloned into every handler. The store lives exactly as
/// long as the process; tests build their own fresh instance instead.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TodoStore>,
}
