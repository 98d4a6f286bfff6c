// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service assembly: configuration to wired processing pipeline.

use std::sync::Arc;

use notetron_agent::{AnswerComposer, ComposerSettings, IdempotencyGate};
use notetron_config::Config;
use notetron_core::{
    Embedder, IngestionOutcome, LanguageModel, NotetronError, PromptStore, Request, TraceSink,
    VectorStore,
};
use notetron_ingest::DocumentIngestionPipeline;
use notetron_langfuse::LangfuseClient;
use notetron_openai::OpenAiClient;
use notetron_qdrant::QdrantClient;
use notetron_storage::Database;
use tracing::info;

/// The fully wired service: gate for inbound requests, pipeline for
/// document ingestion, and the database both persist into.
pub struct Runtime {
    db: Database,
    gate: IdempotencyGate,
    pipeline: DocumentIngestionPipeline,
}

impl Runtime {
    /// Opens the database and builds the real service clients from the
    /// validated configuration.
    pub async fn from_config(config: &Config) -> Result<Self, NotetronError> {
        let db = Database::open(&config.history.path).await?;

        let openai = Arc::new(OpenAiClient::from_config(&config.openai)?);
        let qdrant = Arc::new(QdrantClient::from_config(&config.qdrant)?);
        let langfuse = Arc::new(LangfuseClient::from_config(
            &config.langfuse,
            config.service.name.clone(),
        )?);

        info!(
            service = config.service.name.as_str(),
            phase = config.service.phase,
            version = config.service.version.as_str(),
            "runtime assembled"
        );

        Ok(Self::new(
            db,
            openai.clone(),
            openai,
            qdrant,
            langfuse.clone(),
            langfuse,
            ComposerSettings {
                prompt_name: config.langfuse.prompt_name.clone(),
                version: config.service.version.clone(),
                phase: config.service.phase,
                model_name: config.openai.chat_model.clone(),
            },
        ))
    }

    /// Assembles the pipeline from explicit service handles.
    pub fn new(
        db: Database,
        model: Arc<dyn LanguageModel>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        prompts: Arc<dyn PromptStore>,
        traces: Arc<dyn TraceSink>,
        settings: ComposerSettings,
    ) -> Self {
        let version = settings.version.clone();
        let phase = settings.phase;
        let composer = AnswerComposer::new(
            db.clone(),
            embedder.clone(),
            store.clone(),
            model,
            prompts,
            traces,
            settings,
        );
        let gate = IdempotencyGate::new(db.clone(), composer, version);
        let pipeline = DocumentIngestionPipeline::new(embedder, store, phase);

        Self { db, gate, pipeline }
    }

    /// Processes one inbound request through the idempotency gate.
    pub async fn process(&self, request: &Request) -> Result<Option<String>, NotetronError> {
        self.gate.process(request).await
    }

    /// Offers one document to the ingestion pipeline.
    pub async fn ingest(
        &self,
        bytes: &[u8],
        source_name: &str,
        extension: &str,
    ) -> Result<IngestionOutcome, NotetronError> {
        self.pipeline.ingest(bytes, source_name, extension).await
    }

    /// Closes the underlying database connection.
    pub async fn close(self) -> Result<(), NotetronError> {
        self.db.close().await
    }
}
