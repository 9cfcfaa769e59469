// Fan-out/fan-in word aggregation across many sources.
//
// Layout of one run:
//
//   work queue ──> N workers ──(word, count)──> merge channel ──> drain loop
//                     │                              ▲
//                     └──completion──> tracker ──────┘ (holds a sender
//                                                      until all N signal)
//
// Each worker pops a source, extracts and counts it inside its own task,
// pushes every pair onto the unbounded merge channel, then signals
// completion on a channel sized exactly to the number of sources. Emitting
// and signalling happen without an await in between, so a completion signal
// always means that source's pairs are already queued.
//
// The merge channel closes only once every sender is gone: each worker
// drops its clone when the queue runs dry, and the tracker drops the last
// one after observing all completions. The drain loop owns the aggregate
// table outright; nothing else ever touches it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use indicatif::ProgressBar;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::report::{AggregateError, AggregateReport, SourceFailure};
use crate::config::{Config, DEFAULT_SOURCE_TIMEOUT_SECS};
use crate::count::counter::into_pairs;
use crate::count::{count_text, WordCountPair, WordCounts};
use crate::extract::TextExtractor;

type Job = (usize, Arc<dyn TextExtractor>);
type WorkQueue = Arc<Mutex<VecDeque<Job>>>;

/// Reason recorded for sources still outstanding when the deadline fires.
pub const DEADLINE_REASON: &str = "cancelled: overall deadline exceeded";

/// One completion signal: which source finished and how.
#[derive(Debug)]
struct Completion {
    index: usize,
    label: String,
    /// Distinct words emitted, or the failure reason
    result: Result<usize, String>,
}

/// Runs word counting over many sources concurrently and merges the results.
pub struct Aggregator {
    concurrency: usize,
    source_timeout: Duration,
    deadline: Option<Duration>,
    progress: ProgressBar,
}

impl Aggregator {
    /// An aggregator with `concurrency` workers (at least one), the default
    /// per-source timeout, and no overall deadline.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            deadline: None,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.concurrency)
            .with_source_timeout(config.source_timeout)
            .with_deadline(config.deadline)
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Overall limit for the run. Sources still outstanding when it expires
    /// are cancelled and reported as failures.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Progress bar ticked once per completed source.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Count every source and merge the per-source tables.
    ///
    /// Returns once every source has completed, or the deadline fired. A
    /// source that fails to extract contributes nothing and is listed in
    /// `AggregateReport::failures`; the rest still merge.
    pub async fn run(
        &self,
        extractors: Vec<Arc<dyn TextExtractor>>,
    ) -> Result<AggregateReport, AggregateError> {
        let total = extractors.len();
        if total == 0 {
            return Err(AggregateError::NoSources);
        }

        let labels: Vec<String> = extractors.iter().map(|e| e.label()).collect();
        let queue: WorkQueue = Arc::new(Mutex::new(extractors.into_iter().enumerate().collect()));

        let (pair_tx, mut pair_rx) = mpsc::unbounded_channel::<WordCountPair>();
        let (done_tx, done_rx) = mpsc::channel::<Completion>(total);

        let worker_count = self.concurrency.min(total);
        info!(sources = total, workers = worker_count, "Starting aggregation");

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&queue),
                pair_tx.clone(),
                done_tx.clone(),
                self.source_timeout,
            ));
        }
        // Workers own the only completion senders from here on
        drop(done_tx);

        let tracker = tokio::spawn(track_completions(
            total,
            done_rx,
            pair_tx,
            self.progress.clone(),
        ));

        let mut counts = WordCounts::new();
        let drain = drain_pairs(&mut pair_rx, &mut counts);
        let deadline_exceeded = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, drain).await.is_err(),
            None => {
                drain.await;
                false
            }
        };

        if deadline_exceeded {
            warn!(
                deadline_ms = self.deadline.map(|d| d.as_millis() as u64),
                "Overall deadline exceeded, cancelling outstanding sources"
            );
            workers.abort_all();
            queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }

        let mut worker_error = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    worker_error.get_or_insert(e);
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    worker_error.get_or_insert(AggregateError::ProtocolViolation(format!(
                        "worker task failed: {e}"
                    )));
                }
            }
        }

        // Every worker is gone, so the tracker finishes as soon as it has
        // read the signals already queued; then the merge channel closes.
        drain_pairs(&mut pair_rx, &mut counts).await;

        let completions = match tracker.await {
            Ok(Ok(completions)) => completions,
            Ok(Err(e)) => return Err(fail(e)),
            Err(e) => {
                return Err(fail(AggregateError::ProtocolViolation(format!(
                    "completion tracker failed: {e}"
                ))))
            }
        };
        if let Some(e) = worker_error {
            return Err(fail(e));
        }
        let failures = settle_completions(labels, completions, deadline_exceeded).map_err(fail)?;

        self.progress.finish_and_clear();

        info!(
            sources = total,
            failed = failures.len(),
            distinct_words = counts.len(),
            deadline_exceeded,
            "Aggregation complete"
        );

        Ok(AggregateReport {
            counts,
            sources: total,
            failures,
            deadline_exceeded,
        })
    }
}

fn fail(e: AggregateError) -> AggregateError {
    error!(error = %e, "Aggregation aborted");
    e
}

/// Turn the observed completions into the failure list.
///
/// Without a deadline every source must have signalled; a shortfall means a
/// worker vanished and is a protocol violation. After a deadline, sources
/// with no completion are reported as cancelled.
fn settle_completions(
    labels: Vec<String>,
    completions: Vec<Completion>,
    deadline_exceeded: bool,
) -> Result<Vec<SourceFailure>, AggregateError> {
    let total = labels.len();
    if !deadline_exceeded && completions.len() != total {
        return Err(AggregateError::ProtocolViolation(format!(
            "only {} of {} sources signalled completion",
            completions.len(),
            total
        )));
    }

    let mut finished = vec![false; total];
    let mut failures = Vec::new();
    for completion in completions {
        finished[completion.index] = true;
        if let Err(reason) = completion.result {
            failures.push(SourceFailure {
                index: completion.index,
                label: completion.label,
                reason,
            });
        }
    }
    for (index, label) in labels.into_iter().enumerate() {
        if !finished[index] {
            failures.push(SourceFailure {
                index,
                label,
                reason: DEADLINE_REASON.to_string(),
            });
        }
    }
    failures.sort_by_key(|f| f.index);
    Ok(failures)
}

/// Sum pairs into the aggregate until the merge channel is closed and empty.
async fn drain_pairs(pair_rx: &mut mpsc::UnboundedReceiver<WordCountPair>, counts: &mut WordCounts) {
    while let Some(pair) = pair_rx.recv().await {
        *counts.entry(pair.word).or_insert(0) += pair.count;
    }
}

/// Pull sources off the queue until it is empty.
async fn run_worker(
    worker_id: usize,
    queue: WorkQueue,
    pair_tx: mpsc::UnboundedSender<WordCountPair>,
    done_tx: mpsc::Sender<Completion>,
    source_timeout: Duration,
) -> Result<(), AggregateError> {
    loop {
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some((index, extractor)) = next else {
            break;
        };
        let label = extractor.label();

        let result = match count_source(extractor, source_timeout).await {
            Ok(counts) => {
                let distinct = counts.len();
                for pair in into_pairs(counts) {
                    pair_tx.send(pair).map_err(|_| {
                        AggregateError::ProtocolViolation(format!(
                            "merge stream closed while {label} was still emitting"
                        ))
                    })?;
                }
                debug!(worker_id, source = %label, distinct, "Source counted");
                Ok(distinct)
            }
            Err(reason) => {
                warn!(worker_id, source = %label, reason = %reason, "Source skipped");
                Err(reason)
            }
        };

        // Capacity equals the number of sources, so a full channel means a
        // source signalled twice.
        done_tx
            .try_send(Completion {
                index,
                label,
                result,
            })
            .map_err(|e| {
                AggregateError::ProtocolViolation(format!("completion signal rejected: {e}"))
            })?;
    }

    debug!(worker_id, "Work queue empty, worker exiting");
    Ok(())
}

/// Extract and count one source in its own task.
///
/// Running the job in a child task keeps a panicking extractor from taking
/// the worker down with it. The JoinSet aborts the child if the worker
/// itself is cancelled.
async fn count_source(
    extractor: Arc<dyn TextExtractor>,
    source_timeout: Duration,
) -> Result<WordCounts, String> {
    let mut job = JoinSet::new();
    job.spawn(async move {
        let text = tokio::time::timeout(source_timeout, extractor.extract())
            .await
            .map_err(|_| anyhow::anyhow!("timed out after {}s", source_timeout.as_secs_f64()))??;
        Ok::<_, anyhow::Error>(count_text(&text))
    });

    match job.join_next().await {
        Some(Ok(Ok(counts))) => Ok(counts),
        Some(Ok(Err(e))) => Err(format!("{e:#}")),
        Some(Err(e)) if e.is_panic() => Err("extractor panicked".to_string()),
        Some(Err(e)) => Err(format!("extraction task failed: {e}")),
        None => Err("extraction task vanished".to_string()),
    }
}

/// Wait for exactly `expected` completion signals, then release the
/// tracker's merge-channel sender.
///
/// Returns early only if every worker is gone (deadline cancellation or a
/// bug); the caller decides which.
async fn track_completions(
    expected: usize,
    mut done_rx: mpsc::Receiver<Completion>,
    pair_tx: mpsc::UnboundedSender<WordCountPair>,
    progress: ProgressBar,
) -> Result<Vec<Completion>, AggregateError> {
    progress.set_length(expected as u64);

    let mut seen = vec![false; expected];
    let mut completions = Vec::with_capacity(expected);

    while completions.len() < expected {
        let Some(completion) = done_rx.recv().await else {
            break;
        };
        match seen.get_mut(completion.index) {
            Some(flag) if !*flag => *flag = true,
            Some(_) => {
                return Err(AggregateError::ProtocolViolation(format!(
                    "source {} signalled completion twice",
                    completion.index
                )))
            }
            None => {
                return Err(AggregateError::ProtocolViolation(format!(
                    "completion for unknown source {}",
                    completion.index
                )))
            }
        }
        progress.inc(1);
        completions.push(completion);
    }

    if let Ok(extra) = done_rx.try_recv() {
        return Err(AggregateError::ProtocolViolation(format!(
            "completion count overrun: source {} signalled after all {} finished",
            extra.index, expected
        )));
    }

    drop(pair_tx);
    Ok(completions)
}
