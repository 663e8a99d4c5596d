//! Batch relay 指标收集模块
//!
//! 记录投递结果、批次进度和 lag 读数，并在内存中聚合 lag 统计。

use contracts::{DeliveryOutcome, LagReading};
use metrics::{counter, gauge, histogram};

/// 记录单条投递结果
pub fn record_delivery_outcome(outcome: &DeliveryOutcome) {
    counter!(
        "batch_relay_deliveries_total",
        "outcome" => outcome.label()
    )
    .increment(1);
}

/// 记录单条投递耗时
pub fn record_delivery_latency_ms(latency_ms: f64) {
    histogram!("batch_relay_delivery_latency_ms").record(latency_ms);
}

/// 记录批次完成
pub fn record_batch_dispatched(batch_index: usize, batch_len: usize) {
    counter!("batch_relay_batches_total").increment(1);
    gauge!("batch_relay_last_batch_index").set(batch_index as f64);
    histogram!("batch_relay_batch_size").record(batch_len as f64);
}

/// 记录 lag 读数
pub fn record_lag_reading(lag: LagReading) {
    gauge!("batch_relay_lag_reading").set(lag.value());
    histogram!("batch_relay_lag_reading_hist").record(lag.value());
}

/// 记录一次限流暂停
pub fn record_throttle_pause(delay_ms: u64) {
    counter!("batch_relay_throttle_pauses_total").increment(1);
    counter!("batch_relay_throttle_paused_ms_total").increment(delay_ms);
}

/// Lag 统计聚合器
///
/// 在内存中聚合每批次后的 lag 读数，便于输出运行摘要。
#[derive(Debug, Clone, Default)]
pub struct LagStatsAggregator {
    /// 查询次数
    pub total_queries: u64,

    /// 超过阈值的次数
    pub over_threshold: u64,

    /// 读数统计
    pub lag_stats: RunningStats,
}

impl LagStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, lag: LagReading, throttled: bool) {
        self.total_queries += 1;
        if throttled {
            self.over_threshold += 1;
        }
        self.lag_stats.push(lag.value());
    }

    /// 生成摘要
    pub fn summary(&self) -> LagSummary {
        LagSummary {
            total_queries: self.total_queries,
            over_threshold: self.over_threshold,
            throttle_rate: if self.total_queries > 0 {
                self.over_threshold as f64 / self.total_queries as f64 * 100.0
            } else {
                0.0
            },
            lag: StatsSummary::from(&self.lag_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Lag 摘要
#[derive(Debug, Clone, Default)]
pub struct LagSummary {
    pub total_queries: u64,
    pub over_threshold: u64,
    pub throttle_rate: f64,
    pub lag: StatsSummary,
}

impl std::fmt::Display for LagSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Lag queries: {}", self.total_queries)?;
        writeln!(
            f,
            "Over threshold: {} ({:.2}%)",
            self.over_threshold, self.throttle_rate
        )?;
        write!(f, "Lag: {}", self.lag)
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
