//! Request/response calls from the UI to the backend.

use std::future::Future;

use api_types::expenses::{CombinedMonthlyExpenses, MonthlyExpenses};
use tokio::sync::{mpsc, oneshot};

use crate::RpcError;

/// The two calls the UI makes to the backend.
pub trait ExpensesRpc: Send + Sync {
    /// Current shared expenses, as prepared by the backend at startup.
    fn fetch_shared_expenses(
        &self,
    ) -> impl Future<Output = Result<MonthlyExpenses, RpcError>> + Send;

    /// Creates the ledger transactions. `Ok(false)` means the backend tried
    /// and failed; `Err` means the call itself failed.
    fn submit_combined_expenses(
        &self,
        expenses: CombinedMonthlyExpenses,
    ) -> impl Future<Output = Result<bool, RpcError>> + Send;
}

/// A pending call, as seen by the backend.
#[derive(Debug)]
pub enum RpcRequest {
    FetchSharedExpenses {
        reply: oneshot::Sender<MonthlyExpenses>,
    },
    SubmitCombinedExpenses {
        expenses: CombinedMonthlyExpenses,
        reply: oneshot::Sender<bool>,
    },
}

impl RpcRequest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FetchSharedExpenses { .. } => "fetchSharedExpenses",
            Self::SubmitCombinedExpenses { .. } => "submitCombinedExpenses",
        }
    }
}

/// UI side handle. Cheap to clone; every clone talks to the same backend.
#[derive(Debug, Clone)]
pub struct RpcClient {
    requests: mpsc::UnboundedSender<RpcRequest>,
}

impl RpcClient {
    async fn call<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<T>) -> RpcRequest,
    ) -> Result<T, RpcError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(request(reply))
            .map_err(|_| RpcError::Disconnected)?;
        response.await.map_err(|_| RpcError::NoReply)
    }
}

impl ExpensesRpc for RpcClient {
    async fn fetch_shared_expenses(&self) -> Result<MonthlyExpenses, RpcError> {
        self.call(|reply| RpcRequest::FetchSharedExpenses { reply })
            .await
    }

    async fn submit_combined_expenses(
        &self,
        expenses: CombinedMonthlyExpenses,
    ) -> Result<bool, RpcError> {
        self.call(|reply| RpcRequest::SubmitCombinedExpenses { expenses, reply })
            .await
    }
}

/// Backend side: yields the calls in the order they were made.
#[derive(Debug)]
pub struct RpcServer {
    requests: mpsc::UnboundedReceiver<RpcRequest>,
}

impl RpcServer {
    /// `None` once every [`RpcClient`] is gone.
    pub async fn next(&mut self) -> Option<RpcRequest> {
        self.requests.recv().await
    }
}

pub fn rpc_channel() -> (RpcClient, RpcServer) {
    let (requests, receiver) = mpsc::unbounded_channel();
    (
        RpcClient { requests },
        RpcServer {
            requests: receiver,
        },
    )
}
