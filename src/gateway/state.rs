use std::path::PathBuf;
use std::sync::Arc;

use crate::matching::MatchEngine;
use crate::parser::RecordParser;
use crate::store::{ProfileStore, RequestStore};

#[derive(Clone)]
pub struct HandlerState {
    pub engine: Arc<MatchEngine>,

    pub profiles: Arc<dyn ProfileStore>,

    pub requests: Arc<dyn RequestStore>,

    pub parser: Arc<dyn RecordParser>,

    /// Source directory for `/api/profiles/seed`; seeding loads nothing when unset.
    pub synthetic_dir: Option<PathBuf>,
}

impl HandlerState {
    pub fn new(
        engine: Arc<MatchEngine>,
        profiles: Arc<dyn ProfileStore>,
        requests: Arc<dyn RequestStore>,
        parser: Arc<dyn RecordParser>,
    ) -> Self {
        Self {
            engine,
            profiles,
            requests,
            parser,
            synthetic_dir: None,
        }
    }

    pub fn with_synthetic_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.synthetic_dir = dir;
        self
    }
}

impl std::fmt::Debug for HandlerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerState")
            .field("engine", &self.engine)
            .field("synthetic_dir", &self.synthetic_dir)
            .finish()
    }
}
