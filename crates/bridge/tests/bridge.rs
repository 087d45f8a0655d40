use std::time::Duration;

use api_types::{
    ExpenseCategory,
    events::{ChannelEvent, EventName},
    expenses::{CombinedMonthlyExpenses, MonthlyExpense, MonthlyExpenses},
};
use bridge::{
    ChannelError, Envelope, EventChannel, ExpensesRpc, RpcError, RpcRequest, pair, rpc_channel,
};
use tokio::time::timeout;

fn expenses(water: &str) -> MonthlyExpenses {
    let mut expenses = MonthlyExpenses {
        budget_id: "budget".to_string(),
        account_id: "account".to_string(),
        ..MonthlyExpenses::default()
    };
    expenses.expenses.insert(
        ExpenseCategory::Water,
        MonthlyExpense {
            amount: water.to_string(),
            ..MonthlyExpense::default()
        },
    );
    expenses
}

async fn next(subscription: &mut bridge::Subscription) -> ChannelEvent {
    timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("event not delivered")
        .expect("subscription closed")
}

#[tokio::test]
async fn events_cross_the_channel_in_order() {
    let (ui, backend) = pair();
    let mut inputs = backend
        .on(EventName::SharedMonthlyExpensesInput, "backend")
        .unwrap();

    for amount in ["1", "2", "3"] {
        ui.emit(ChannelEvent::SharedMonthlyExpensesInput(expenses(amount)))
            .unwrap();
    }

    for amount in ["1", "2", "3"] {
        let ChannelEvent::SharedMonthlyExpensesInput(received) = next(&mut inputs).await else {
            panic!("unexpected event");
        };
        assert_eq!(received.amount(ExpenseCategory::Water), amount);
    }
}

#[tokio::test]
async fn emit_does_not_loop_back_to_sender() {
    let (ui, _backend) = pair();
    let mut own = ui.on(EventName::BackendSetupComplete, "ui").unwrap();

    ui.emit(ChannelEvent::BackendSetupComplete(Some(true))).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(own.try_recv().is_none());
}

#[tokio::test]
async fn malformed_envelopes_are_dropped_before_handlers() {
    let (ui, backend) = pair();
    let mut splits = ui.on(EventName::SharedMonthlyExpensesSplit, "ui").unwrap();

    backend
        .emit_raw(Envelope {
            name: "sharedMonthlyExpensesSplit".to_string(),
            payload: serde_json::json!([1, 2, 3]),
        })
        .unwrap();
    backend
        .emit(ChannelEvent::SharedMonthlyExpensesSplit(expenses("15.00")))
        .unwrap();

    let ChannelEvent::SharedMonthlyExpensesSplit(individual) = next(&mut splits).await else {
        panic!("unexpected event");
    };
    assert_eq!(individual.amount(ExpenseCategory::Water), "15.00");
    assert!(splits.try_recv().is_none());
}

#[tokio::test]
async fn dropped_subscription_stops_receiving() {
    let (ui, backend) = pair();
    let splits = ui.on(EventName::SharedMonthlyExpensesSplit, "ui").unwrap();
    drop(splits);

    assert_eq!(ui.handlers().count(EventName::SharedMonthlyExpensesSplit), 0);
    backend
        .emit(ChannelEvent::SharedMonthlyExpensesSplit(expenses("1")))
        .unwrap();
    assert!(ui.on(EventName::SharedMonthlyExpensesSplit, "ui").is_ok());
}

#[tokio::test]
async fn emit_fails_once_peer_is_gone() {
    let (ui, backend) = pair();
    drop(backend);
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(matches!(
        ui.emit(ChannelEvent::BackendSetupComplete(Some(true))),
        Err(ChannelError::Closed)
    ));
}

#[tokio::test]
async fn rpc_round_trip() {
    let (client, mut server) = rpc_channel();

    let backend = tokio::spawn(async move {
        while let Some(request) = server.next().await {
            match request {
                RpcRequest::FetchSharedExpenses { reply } => {
                    let _ = reply.send(expenses("30"));
                }
                RpcRequest::SubmitCombinedExpenses { expenses, reply } => {
                    let ok = expenses.individual_monthly_expenses.amount(ExpenseCategory::Water)
                        == "15.00";
                    let _ = reply.send(ok);
                }
            }
        }
    });

    let shared = client.fetch_shared_expenses().await.unwrap();
    assert_eq!(shared.amount(ExpenseCategory::Water), "30");

    let accepted = client
        .submit_combined_expenses(CombinedMonthlyExpenses {
            shared_monthly_expenses: shared.clone(),
            individual_monthly_expenses: expenses("15.00"),
        })
        .await;
    assert_eq!(accepted, Ok(true));

    let rejected = client
        .submit_combined_expenses(CombinedMonthlyExpenses {
            shared_monthly_expenses: shared,
            individual_monthly_expenses: expenses("1.00"),
        })
        .await;
    assert_eq!(rejected, Ok(false));

    drop(client);
    backend.await.unwrap();
}

#[tokio::test]
async fn rpc_distinguishes_transport_failures() {
    let (client, server) = rpc_channel();
    drop(server);
    assert_eq!(
        client.fetch_shared_expenses().await,
        Err(RpcError::Disconnected)
    );

    let (client, mut server) = rpc_channel();
    let backend = tokio::spawn(async move {
        // Drop the request without answering.
        let _ = server.next().await;
    });
    assert_eq!(client.fetch_shared_expenses().await, Err(RpcError::NoReply));
    backend.await.unwrap();
}
