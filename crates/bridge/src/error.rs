use api_types::events::EventName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("event channel closed")]
    Closed,
    #[error("\"{name}\" already has a handler registered as \"{key}\"")]
    DuplicateSubscription { name: EventName, key: String },
    #[error("unknown event \"{0}\"")]
    UnknownEvent(String),
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failure of a request/response call itself, as opposed to a `false`
/// answer from the backend.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("backend is not reachable")]
    Disconnected,
    #[error("backend dropped the request without answering")]
    NoReply,
    #[error("backend did not answer in time")]
    Timeout,
}
