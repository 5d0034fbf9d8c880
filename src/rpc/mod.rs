pub mod client;
pub mod subscription;
pub mod types;

pub use client::RpcClient;
pub use subscription::{EventSubscriber, Unsubscribe};
