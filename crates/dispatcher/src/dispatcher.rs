//! BatchDispatcher - batch loop with lag-based pacing
//!
//! 状态机：
//!
//! ```text
//! Idle -> Dispatching(i) -> CheckingLag(i) -> [Throttling(i)] -> Dispatching(i+1) -> ... -> Done
//! ```
//!
//! 每个批次内按顺序逐条投递；批次结束后查询一次 lag，超过阈值则暂停
//! `batch_delay` 再进入下一批次。投递失败不会中断运行。

use std::sync::Arc;
use std::time::{Duration, Instant};

use contracts::{Batch, DeliveryClient, LagMonitor, Record, RecordSource, RelayConfig};
use observability::metrics::{record_batch_dispatched, record_lag_reading, record_throttle_pause};
use observability::LagStatsAggregator;
use tracing::{debug, info, instrument, warn};

use crate::batch::{BatchPlan, BatchSpan};
use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;
use crate::report::DispatchReport;

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    /// Records per batch
    pub batch_size: usize,
    /// Lag strictly above this pauses the next batch
    pub lag_threshold: f64,
    /// Length of each pause
    pub batch_delay: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::from(&RelayConfig::default())
    }
}

impl From<&RelayConfig> for DispatcherConfig {
    fn from(config: &RelayConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            lag_threshold: config.lag_threshold,
            batch_delay: config.batch_delay(),
        }
    }
}

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Records loaded, nothing sent yet
    Idle,
    /// Delivering the records of a batch
    Dispatching { batch_index: usize },
    /// Batch finished, querying lag
    CheckingLag { batch_index: usize },
    /// Lag over threshold, pausing before the next batch
    Throttling { batch_index: usize },
    /// Every record has been attempted
    Done,
}

/// Drives delivery batch by batch
pub struct BatchDispatcher<D, L> {
    config: DispatcherConfig,
    delivery: D,
    lag_monitor: L,
    state: DispatchState,
    metrics: Arc<DispatchMetrics>,
    lag_stats: LagStatsAggregator,
}

impl<D, L> BatchDispatcher<D, L>
where
    D: DeliveryClient,
    L: LagMonitor,
{
    pub fn new(config: DispatcherConfig, delivery: D, lag_monitor: L) -> Self {
        Self {
            config,
            delivery,
            lag_monitor,
            state: DispatchState::Idle,
            metrics: Arc::new(DispatchMetrics::new()),
            lag_stats: LagStatsAggregator::new(),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Live counters, readable while a run is in flight
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Fetch every record from `source`, then dispatch them
    ///
    /// # Errors
    /// Only a record source failure. Delivery, credential and lag failures
    /// never fail the run.
    #[instrument(name = "dispatcher_run", skip(self, source), fields(source = %source.describe()))]
    pub async fn run<S: RecordSource>(
        &mut self,
        source: &S,
    ) -> Result<DispatchReport, DispatcherError> {
        let records = source.fetch_records().await?;
        info!(records = records.len(), "Records loaded");
        Ok(self.dispatch(&records).await)
    }

    /// Dispatch an already-loaded record sequence
    ///
    /// Counters and lag statistics start from zero on every call.
    pub async fn dispatch(&mut self, records: &[Record]) -> DispatchReport {
        let started = Instant::now();
        let plan = BatchPlan::new(records.len(), self.config.batch_size);
        self.metrics.reset();
        self.lag_stats.reset();

        self.transition(DispatchState::Idle);
        info!(
            records = plan.total_records(),
            batches = plan.batch_count(),
            batch_size = plan.batch_size(),
            "Dispatcher started"
        );

        for span in plan.spans() {
            self.dispatch_batch(span, &records[span.range()]).await;
            self.pace(span).await;
        }

        self.transition(DispatchState::Done);

        let report = DispatchReport {
            total_records: records.len(),
            counts: self.metrics.snapshot(),
            lag: self.lag_stats.summary(),
            elapsed: started.elapsed(),
        };
        info!(
            delivered = report.counts.delivered,
            rejected = report.counts.rejected,
            errored = report.counts.errored,
            pauses = report.counts.throttle_pauses,
            "Dispatcher finished"
        );
        report
    }

    async fn dispatch_batch(&mut self, span: &BatchSpan, batch: Batch<'_>) {
        self.transition(DispatchState::Dispatching {
            batch_index: span.index,
        });

        for record in batch {
            let outcome = self.delivery.deliver(record).await;
            self.metrics.record_outcome(&outcome);
        }

        self.metrics.inc_batches();
        record_batch_dispatched(span.index, batch.len());
        debug!(batch = span.index, len = batch.len(), "Batch dispatched");
    }

    /// Query lag once and pause when it is over the threshold
    async fn pace(&mut self, span: &BatchSpan) {
        self.transition(DispatchState::CheckingLag {
            batch_index: span.index,
        });

        let lag = self.lag_monitor.current_lag().await;
        self.metrics.inc_lag_queries();
        record_lag_reading(lag);

        let throttle = lag.exceeds(self.config.lag_threshold);
        self.lag_stats.update(lag, throttle);

        if throttle {
            self.transition(DispatchState::Throttling {
                batch_index: span.index,
            });
            warn!(
                lag = %lag,
                threshold = self.config.lag_threshold,
                delay_ms = self.config.batch_delay.as_millis() as u64,
                "Lag over threshold, pausing before next batch"
            );

            tokio::time::sleep(self.config.batch_delay).await;

            let paused_ms = self.config.batch_delay.as_millis() as u64;
            self.metrics.record_pause(paused_ms);
            record_throttle_pause(paused_ms);
        }
    }

    fn transition(&mut self, next: DispatchState) {
        debug!(from = ?self.state, to = ?next, "Dispatcher state change");
        self.state = next;
    }
}
