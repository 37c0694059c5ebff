//! Batch publishing: upload, assemble, broadcast.
//!
//! Items are processed strictly in input order, one network call at a time.
//! Per-item preparation (upload + post assembly) yields
//! `Result<PreparedPost, ItemFailure>`; what happens next depends on the mode:
//!
//! - independent: each prepared post is broadcast in its own transaction
//!   before the next item is touched
//! - atomic: prepared posts are collected, failures skipped, and a single
//!   transaction carrying every surviving post is broadcast at the end

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::PublisherConfig;
use crate::ledger::{
    BroadcastConfirmation, ChainId, Ledger, LedgerResult, Operation, TxBuilder, Wallet,
};
use crate::observability::metrics;
use crate::post::{Post, PostGenerator, PublishItem};
use crate::publisher::report::{
    BatchMode, BatchReport, FailureStage, ItemFailure, PublishError, PublishedPost,
};
use crate::upload::Uploader;

/// Format of the per-batch `storage_date`.
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Storage date stamped on every item of a batch started at `now`.
pub fn storage_date(now: DateTime<Utc>) -> String {
    now.format(STORAGE_DATE_FORMAT).to_string()
}

/// A post ready to go on chain, with its position in the batch.
#[derive(Debug, Clone)]
struct PreparedPost {
    index: usize,
    url: String,
    post: Post,
}

/// Publishes batches of items for one account.
pub struct Publisher {
    uploader: Arc<dyn Uploader>,
    ledger: Arc<dyn Ledger>,
    tx_builder: TxBuilder,
    generator: PostGenerator,
    wallet: Wallet,
    account: String,
    chain_id: ChainId,
}

impl Publisher {
    /// Create a publisher from validated configuration.
    pub fn new(
        config: &PublisherConfig,
        uploader: Arc<dyn Uploader>,
        ledger: Arc<dyn Ledger>,
        wallet: Wallet,
        account: impl Into<String>,
    ) -> LedgerResult<Self> {
        let chain_id = ChainId::from_hex(&config.ledger.chain_id)?;
        let tx_builder = TxBuilder::new(
            ledger.clone(),
            Duration::from_secs(config.ledger.expiration_secs),
        );

        Ok(Self {
            uploader,
            ledger,
            tx_builder,
            generator: PostGenerator::from_config(&config.app, &config.ledger),
            wallet,
            account: account.into(),
            chain_id,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Publish `items` in the given mode.
    ///
    /// Items are updated in place with their `url` and `storage_date`.
    pub async fn publish(
        &self,
        mode: BatchMode,
        items: &mut [PublishItem],
    ) -> Result<BatchReport, PublishError> {
        match mode {
            BatchMode::Independent => Ok(self.publish_independent(items).await),
            BatchMode::Atomic => self.publish_atomic(items).await,
        }
    }

    /// One transaction per item. Never fails as a whole.
    pub async fn publish_independent(&self, items: &mut [PublishItem]) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let span = tracing::info_span!("batch", batch_id = %batch_id, mode = "independent");

        async {
            let total = items.len();
            let mut report = BatchReport::new(batch_id, BatchMode::Independent, total);
            let stamp = storage_date(Utc::now());

            tracing::info!(items = total, account = %self.account, "Batch started");

            for (index, item) in items.iter_mut().enumerate() {
                let prepared = match self.prepare_item(index, item, &stamp).await {
                    Ok(prepared) => prepared,
                    Err(failure) => {
                        tracing::warn!(
                            entry = index + 1,
                            stage = ?failure.stage,
                            error = %failure.error,
                            "Error with entry, skipping"
                        );
                        report.failed.push(failure);
                        continue;
                    }
                };

                let post = prepared.post.clone();
                match self.broadcast_posts(vec![post]).await {
                    Ok((trx_id, confirmation)) => {
                        metrics::record_broadcast(BatchMode::Independent.as_str(), true);
                        metrics::record_posts_published(BatchMode::Independent.as_str(), 1);
                        let published = published_post(&prepared, trx_id, &confirmation);
                        tracing::info!(
                            progress = %format!("{}/{}", index + 1, total),
                            permlink = %published.reference(),
                            "New document published"
                        );
                        report.published.push(published);
                    }
                    Err(e) => {
                        metrics::record_broadcast(BatchMode::Independent.as_str(), false);
                        tracing::warn!(entry = index + 1, error = %e, "Broadcast failed, skipping");
                        report.failed.push(ItemFailure {
                            index,
                            filename: item.filename.clone(),
                            stage: FailureStage::Broadcast,
                            error: e.to_string(),
                        });
                    }
                }
            }

            tracing::info!(
                published = report.published.len(),
                failed = report.failed.len(),
                "Batch finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// One transaction for the whole batch.
    ///
    /// Items that fail to upload or assemble are left out. If the final
    /// transaction cannot be built or broadcast, nothing is published.
    pub async fn publish_atomic(&self, items: &mut [PublishItem]) -> Result<BatchReport, PublishError> {
        let batch_id = Uuid::new_v4();
        let span = tracing::info_span!("batch", batch_id = %batch_id, mode = "atomic");

        async {
            let total = items.len();
            let mut report = BatchReport::new(batch_id, BatchMode::Atomic, total);
            let stamp = storage_date(Utc::now());

            tracing::info!(items = total, account = %self.account, "Batch started");

            let mut prepared = Vec::new();
            for (index, item) in items.iter_mut().enumerate() {
                match self.prepare_item(index, item, &stamp).await {
                    Ok(post) => prepared.push(post),
                    Err(failure) => {
                        tracing::warn!(
                            entry = index + 1,
                            stage = ?failure.stage,
                            error = %failure.error,
                            "Error preparing entry, leaving it out of the batch"
                        );
                        report.failed.push(failure);
                    }
                }
            }

            if prepared.is_empty() {
                tracing::warn!("No document survived preparation, nothing to broadcast");
                return Ok(report);
            }

            let posts = prepared.iter().map(|p| p.post.clone()).collect();
            match self.broadcast_posts(posts).await {
                Ok((trx_id, confirmation)) => {
                    metrics::record_broadcast(BatchMode::Atomic.as_str(), true);
                    metrics::record_posts_published(BatchMode::Atomic.as_str(), prepared.len());
                    report.published = prepared
                        .iter()
                        .map(|p| published_post(p, trx_id.clone(), &confirmation))
                        .collect();

                    tracing::info!(
                        documents = report.published.len(),
                        trx_id = %trx_id,
                        "Documents published"
                    );
                    for published in &report.published {
                        tracing::info!(permlink = %published.reference(), "Published");
                    }
                    Ok(report)
                }
                Err(source) => {
                    metrics::record_broadcast(BatchMode::Atomic.as_str(), false);
                    tracing::error!(
                        error = %source,
                        orphaned = prepared.len(),
                        "Error broadcasting documents to the ledger"
                    );
                    Err(PublishError::BatchLost {
                        batch_id,
                        orphaned: prepared.len(),
                        failed: report.failed,
                        source,
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Upload the item's file and assemble its post.
    async fn prepare_item(
        &self,
        index: usize,
        item: &mut PublishItem,
        storage_date: &str,
    ) -> Result<PreparedPost, ItemFailure> {
        let failure = |stage, error: String| ItemFailure {
            index,
            filename: item.filename.clone(),
            stage,
            error,
        };

        let url = self
            .uploader
            .upload(Path::new(&item.filename), &self.account, &self.wallet)
            .await
            .map_err(|e| failure(FailureStage::Upload, e.to_string()))?;

        item.url = Some(url.clone());
        item.storage_date = Some(storage_date.to_string());

        let post = self
            .generator
            .generate(&self.account, item)
            .map_err(|e| ItemFailure {
                index,
                filename: item.filename.clone(),
                stage: FailureStage::Assemble,
                error: e.to_string(),
            })?;

        Ok(PreparedPost { index, url, post })
    }

    /// Build, sign and broadcast one transaction holding a comment per post.
    async fn broadcast_posts(&self, posts: Vec<Post>) -> LedgerResult<(String, BroadcastConfirmation)> {
        let mut tx = self.tx_builder.new_transaction().await?;
        for post in posts {
            tx.push(Operation::Comment(post));
        }

        let signed = tx.sign(&self.wallet, &self.chain_id)?;
        let trx_id = signed.id();
        tracing::debug!(trx_id = %trx_id, operations = signed.transaction.operations.len(), "Broadcasting");

        let confirmation = self.ledger.broadcast(&signed).await?;
        Ok((trx_id, confirmation))
    }
}

fn published_post(prepared: &PreparedPost, trx_id: String, confirmation: &BroadcastConfirmation) -> PublishedPost {
    PublishedPost {
        index: prepared.index,
        author: prepared.post.author.clone(),
        permlink: prepared.post.permlink.clone(),
        url: prepared.url.clone(),
        trx_id,
        block_num: confirmation.block_num,
    }
}
