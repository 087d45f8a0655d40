//! Cross-process plumbing between the UI and the backend.
//!
//! - [`channel`]: named fire-and-forget events ([`EventChannel`]).
//! - [`rpc`]: the two request/response calls ([`ExpensesRpc`]).
//!
//! Both are handed to their users as capabilities rather than reached
//! through globals.

pub use channel::{Endpoint, Envelope, EventChannel, Handlers, Subscription, pair};
pub use error::{ChannelError, RpcError};
pub use rpc::{ExpensesRpc, RpcClient, RpcRequest, RpcServer, rpc_channel};

pub mod channel;
mod error;
pub mod rpc;
