//! Dispatch orchestration
//!
//! Pulls records, renders messages, consults the dedup ledger and fans
//! sends out to a bounded worker pool. Per-record failures never stop
//! the batch; only a missing-template configuration error aborts a run,
//! and it does so before any record is processed.

use crate::dedup::{DedupLedger, Fingerprint};
use crate::error::MailerError;
use crate::message::RenderedMessage;
use crate::provider::{MailTransport, SendOutcome};
use crate::record::Record;
use crate::summary::{invalid_address_line, send_failure_line, Aggregator, RunSummary};
use crate::templates::MessageTemplates;
use crate::validate::is_valid_address;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Bulk dispatcher over a single transport.
///
/// The pool width is fixed for the lifetime of the dispatcher. Width 1
/// means fully sequential execution with no pool overhead. Each call to
/// [`run`](Self::run) is one invocation: the dedup ledger and the
/// counters start empty and all in-flight sends are joined before the
/// summary is returned.
pub struct Dispatcher<T: MailTransport> {
    transport: Arc<T>,
    templates: Arc<MessageTemplates>,
    concurrency: usize,
}

impl<T: MailTransport + 'static> Dispatcher<T> {
    /// Create a new dispatcher. `concurrency` must be at least 1.
    pub fn new(
        transport: T,
        templates: MessageTemplates,
        concurrency: usize,
    ) -> Result<Self, MailerError> {
        Self::with_arc_transport(Arc::new(transport), templates, concurrency)
    }

    /// Create a new dispatcher from a shared transport handle. Useful
    /// when the caller wants to keep inspecting the transport afterwards.
    pub fn with_arc_transport(
        transport: Arc<T>,
        templates: MessageTemplates,
        concurrency: usize,
    ) -> Result<Self, MailerError> {
        if concurrency == 0 {
            return Err(MailerError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            transport,
            templates: Arc::new(templates),
            concurrency,
        })
    }

    /// Process one batch: render, dedup and send one email per record.
    ///
    /// Records are submitted in input order; completion order across
    /// workers is not guaranteed. The returned summary carries the final
    /// counts and every error line in append order. An empty batch
    /// yields a zeroed summary.
    pub async fn run(
        &self,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<RunSummary, MailerError> {
        self.templates.ensure_usable()?;

        // Fresh per-run state; nothing survives across invocations
        let ledger = Arc::new(DedupLedger::new());
        let aggregator = Arc::new(Aggregator::new());

        info!(
            concurrency = self.concurrency,
            transport = self.transport.name(),
            "Starting dispatch run"
        );

        if self.concurrency == 1 {
            // Sequential execution, no pool
            for record in records {
                Self::process_record(&self.transport, &self.templates, &ledger, &aggregator, record)
                    .await;
            }
        } else {
            let semaphore = Arc::new(Semaphore::new(self.concurrency));
            let mut join_set: JoinSet<()> = JoinSet::new();

            for record in records {
                let semaphore = Arc::clone(&semaphore);
                let transport = Arc::clone(&self.transport);
                let templates = Arc::clone(&self.templates);
                let ledger = Arc::clone(&ledger);
                let aggregator = Arc::clone(&aggregator);

                join_set.spawn(async move {
                    // Blocks while the pool is saturated
                    let _permit = semaphore.acquire().await.expect("Semaphore closed");
                    Self::process_record(&transport, &templates, &ledger, &aggregator, record)
                        .await;
                });
            }

            // The run must not return while sends are still in flight
            while join_set.join_next().await.is_some() {}
        }

        let summary = aggregator.snapshot();
        info!(
            sent = summary.sent,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            "Dispatch run complete"
        );
        Ok(summary)
    }

    /// Take one record through validate -> build -> dedup -> send.
    async fn process_record(
        transport: &Arc<T>,
        templates: &MessageTemplates,
        ledger: &DedupLedger,
        aggregator: &Aggregator,
        record: Record,
    ) {
        let record = record.trimmed();

        if !is_valid_address(&record.to_address) {
            debug!(to = %record.to_address, "Recipient failed validation");
            aggregator.record_error(invalid_address_line(&record.to_address));
            return;
        }

        let message = match RenderedMessage::build(
            &record.subject,
            &record.from_address,
            &record.to_address,
            templates,
        ) {
            Ok(message) => message,
            Err(e) => {
                warn!(to = %record.to_address, error = %e, "Failed to build message");
                aggregator.record_error(send_failure_line(&record.to_address, &e.to_string()));
                return;
            }
        };

        let fingerprint =
            Fingerprint::of(&record.from_address, &record.to_address, &record.subject);
        if ledger.seen_or_mark(fingerprint) {
            // Already dispatched this run, likely a batch-level retry
            debug!(to = %record.to_address, "Duplicate fingerprint, skipping send");
            aggregator.record_skipped();
            return;
        }

        match transport.send(&message).await {
            SendOutcome::Sent { message_id } => {
                debug!(to = %record.to_address, message_id = %message_id, "Email sent");
                aggregator.record_sent();
            }
            SendOutcome::Rejected { detail } => {
                warn!(to = %record.to_address, detail = %detail, "Provider rejected message");
                aggregator.record_error(send_failure_line(&record.to_address, &detail));
            }
            SendOutcome::TransportError { detail } => {
                warn!(to = %record.to_address, detail = %detail, "Send attempt failed");
                aggregator.record_error(send_failure_line(&record.to_address, &detail));
            }
        }
    }
}
