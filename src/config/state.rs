// Shared per-process state, built once at startup.

use crate::config::Config;
use crate::notify::Notifier;
use crate::store::Store;

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: Store::new(&config.store.file),
            notifier: Notifier::new(config.mail.clone()),
            config: config.clone(),
        }
    }
}
