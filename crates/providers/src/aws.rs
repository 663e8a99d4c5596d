//! Shared AWS configuration

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Load AWS config once for every client of the run
///
/// `region` overrides the SDK default chain when set.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    let sdk_config = loader.load().await;
    debug!(region = ?sdk_config.region(), "AWS config loaded");
    sdk_config
}
