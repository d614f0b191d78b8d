use std::sync::Arc;

use crate::config::Config;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<RecordStore>,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<RecordStore>) -> Self {
        Self { config, store }
    }
}
