//! # Dispatcher
//!
//! 批量投递模块。
//!
//! 负责：
//! - 将记录按 batch_size 切分为连续批次
//! - 逐条 HTTP 投递，单条失败不影响后续记录
//! - 每批次后查询下游 lag，超过阈值时暂停

pub mod batch;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod report;

pub use batch::{BatchPlan, BatchSpan};
pub use contracts::{DeliveryClient, DeliveryOutcome, LagMonitor, Record, RecordSource};
pub use delivery::{DeliveryBody, HttpDeliveryClient, RecordingDeliveryClient, API_KEY_HEADER};
pub use dispatcher::{BatchDispatcher, DispatchState, DispatcherConfig};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use report::{DispatchReport, COMPLETION_MESSAGE};
