use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use recall_lib::clock::{Clock, SystemClock};
use recall_lib::config::RecallConfig;
use recall_lib::flashcards::{
    DueQueue, FileStore, Flashcard, FlashcardIntake, NewFlashcard, Quality, ReviewStats,
    ScheduleState, Scheduler, SessionUpload,
};
use recall_lib::identity::{IdentityResolver, KeyFileResolver, OwnerId};

/// Shared application state for CLI commands
pub struct App {
    resolver: KeyFileResolver,
    scheduler: Scheduler<FileStore>,
    queue: DueQueue<FileStore>,
    intake: FlashcardIntake<FileStore>,
}

impl App {
    /// Load config and open the card store it points at
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = RecallConfig::load(config_path).context("Failed to load config")?;
        let data_dir = config.data_dir().context("Failed to get data directory")?;
        log::debug!("Using data directory {:?}", data_dir);

        let store = Arc::new(
            FileStore::new(data_dir.clone()).context("Failed to open flashcard store")?,
        );
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Ok(Self {
            resolver: KeyFileResolver::new(data_dir),
            scheduler: Scheduler::new(Arc::clone(&store), Arc::clone(&clock))
                .with_max_commit_retries(config.max_commit_retries),
            queue: DueQueue::new(Arc::clone(&store), Arc::clone(&clock))
                .with_default_limit(config.due_limit),
            intake: FlashcardIntake::new(store, clock),
        })
    }

    /// Resolve the API key to the owner it belongs to
    pub fn owner(&self, api_key: Option<&str>) -> Result<OwnerId> {
        let Some(key) = api_key else {
            bail!("API key required (use --api-key or RECALL_API_KEY)");
        };
        match self.resolver.resolve(key) {
            Some(owner) => Ok(owner),
            None => bail!("Invalid API key"),
        }
    }

    pub fn register(&self, owner: &str) -> Result<String> {
        self.resolver
            .register(OwnerId::new(owner))
            .context("Failed to register API key")
    }

    pub fn create_card(&self, owner: &OwnerId, request: NewFlashcard) -> Result<Flashcard> {
        self.intake
            .create(owner, request)
            .context("Failed to create flashcard")
    }

    pub fn import_session(&self, owner: &OwnerId, upload: SessionUpload) -> Result<Vec<Flashcard>> {
        self.intake
            .ingest_session(owner, upload)
            .context("Failed to import session")
    }

    pub fn due_cards(
        &self,
        owner: &OwnerId,
        as_of: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<Flashcard>> {
        self.queue
            .due_cards(owner, as_of, limit)
            .context("Failed to list due cards")
    }

    pub fn stats(&self, owner: &OwnerId) -> Result<ReviewStats> {
        self.queue.stats(owner, None).context("Failed to compute stats")
    }

    pub fn review(&self, owner: &OwnerId, card_id: Uuid, quality: i64) -> Result<Flashcard> {
        self.scheduler
            .review(owner, card_id, quality)
            .context("Review failed")
    }

    pub fn review_quality(
        &self,
        owner: &OwnerId,
        card_id: Uuid,
        quality: Quality,
    ) -> Result<Flashcard> {
        self.scheduler
            .review_quality(owner, card_id, quality)
            .context("Review failed")
    }

    pub fn schedule_of(&self, owner: &OwnerId, card_id: Uuid) -> Result<ScheduleState> {
        self.scheduler
            .schedule_of(owner, card_id)
            .context("Failed to read card")
    }
}
