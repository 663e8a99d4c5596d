//! Delivery clients
//!
//! Contains HttpDeliveryClient and RecordingDeliveryClient.

mod http;
mod recording;

pub use self::http::{DeliveryBody, HttpDeliveryClient, API_KEY_HEADER};
pub use self::recording::RecordingDeliveryClient;
