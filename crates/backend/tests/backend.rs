use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use api_types::{
    ExpenseCategory,
    events::{ChannelEvent, EventName},
    expenses::{CombinedMonthlyExpenses, MonthlyExpenses},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::get,
};
use backend::Backend;
use bridge::{EventChannel, ExpensesRpc, Subscription, pair, rpc_channel};
use chrono::NaiveDate;
use serde_json::{Value, json};

const SHARED_BUDGET: &str = "11111111-1111-1111-1111-111111111111";
const SHARED_ACCOUNT: &str = "11111111-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
const INDIVIDUAL_BUDGET: &str = "22222222-2222-2222-2222-222222222222";
const INDIVIDUAL_ACCOUNT: &str = "22222222-aaaa-aaaa-aaaa-aaaaaaaaaaaa";

type Reply = (StatusCode, Json<Value>);

#[derive(Clone, Default)]
struct FakeYnab {
    posts: Arc<Mutex<Vec<(String, Value)>>>,
    reject_posts: bool,
}

fn error(status: StatusCode, detail: &str) -> Reply {
    (
        status,
        Json(json!({ "error": { "id": status.as_str(), "name": "error", "detail": detail } })),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some("Bearer secret")
}

async fn budgets(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    let with_accounts = query.get("include_accounts").map(String::as_str) == Some("true");
    let accounts = |id: &str, name: &str| {
        if with_accounts {
            json!([
                { "id": id, "name": name, "closed": false, "deleted": false, "balance": 0 },
                { "id": "33333333-3333-3333-3333-333333333333", "name": name, "closed": true, "deleted": false },
            ])
        } else {
            json!([])
        }
    };

    (
        StatusCode::OK,
        Json(json!({ "data": { "budgets": [
            { "id": SHARED_BUDGET, "name": "Casa Reis-Pereira 🏡", "accounts": accounts(SHARED_ACCOUNT, "Millennium bcp") },
            { "id": INDIVIDUAL_BUDGET, "name": "Magui's budget", "accounts": accounts(INDIVIDUAL_ACCOUNT, "CGD") },
        ] } })),
    )
}

async fn categories(headers: HeaderMap, Path(budget_id): Path<String>) -> Reply {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if budget_id != SHARED_BUDGET && budget_id != INDIVIDUAL_BUDGET {
        return error(StatusCode::NOT_FOUND, "Resource not found");
    }

    let prefix = &budget_id[..8];
    let category = |n: u32, name: &str| {
        json!({ "id": format!("{prefix}-0000-0000-0000-{n:012}"), "name": name, "hidden": false, "deleted": false })
    };
    (
        StatusCode::OK,
        Json(json!({ "data": { "category_groups": [
            {
                "id": format!("{prefix}-0000-0000-0000-000000000100"),
                "name": "🧾 Obligatory Monthly Expenses",
                "hidden": false,
                "deleted": false,
                "categories": [
                    category(1, "🏢 Condominium"),
                    category(2, "💡 Electricity"),
                    category(3, "💧 Water"),
                    category(4, "📺 TV / Internet / Phone"),
                    category(5, "🏦 Bank Fees"),
                ],
            },
        ] } })),
    )
}

async fn transactions(
    State(state): State<FakeYnab>,
    headers: HeaderMap,
    Path(budget_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if state.reject_posts {
        return error(StatusCode::BAD_REQUEST, "invalid transaction");
    }
    state
        .posts
        .lock()
        .unwrap()
        .push((budget_id, body));
    (
        StatusCode::CREATED,
        Json(json!({ "data": { "transaction_ids": ["t1"] } })),
    )
}

async fn spawn_ynab(state: FakeYnab) -> String {
    let app = Router::new()
        .route("/v1/budgets", get(budgets))
        .route("/v1/budgets/{budget_id}/categories", get(categories))
        .route(
            "/v1/budgets/{budget_id}/transactions",
            axum::routing::post(transactions),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

async fn backend(base_url: &str, token: &str) -> Backend {
    let mut backend = Backend::builder()
        .token(token)
        .base_url(base_url)
        .today(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())
        .build()
        .unwrap();
    backend.setup().await;
    backend
}

fn with_amounts(mut expenses: MonthlyExpenses, amounts: [&str; 4]) -> MonthlyExpenses {
    for (category, amount) in ExpenseCategory::ALL.into_iter().zip(amounts) {
        expenses.expenses.entry(category).or_default().amount = amount.to_string();
    }
    expenses
}

async fn next(subscription: &mut Subscription) -> ChannelEvent {
    tokio::time::timeout(Duration::from_secs(5), subscription.recv())
        .await
        .expect("event not delivered")
        .expect("subscription closed")
}

#[tokio::test]
async fn setup_builds_both_templates() {
    let base_url = spawn_ynab(FakeYnab::default()).await;
    let backend = backend(&base_url, "secret").await;

    assert!(backend.is_ready());

    let shared = backend.shared_expenses();
    assert_eq!(shared.budget_id, SHARED_BUDGET);
    assert_eq!(shared.account_id, SHARED_ACCOUNT);
    let water = &shared.expenses[&ExpenseCategory::Water];
    assert_eq!(water.payee_name.as_deref(), Some("EPAL"));
    assert_eq!(water.memo.as_deref(), Some("May 2024 - 4 May to 3 June"));
    assert_eq!(water.amount, "");

    let individual = backend.individual_expenses();
    assert_eq!(individual.account_id, INDIVIDUAL_ACCOUNT);
    let condominium = &individual.expenses[&ExpenseCategory::Condominium];
    assert_eq!(condominium.payee_name.as_deref(), Some("Transfer: Casa"));
    assert_eq!(
        condominium.memo.as_deref(),
        Some("June 2024 - Household Expenses")
    );
}

#[tokio::test]
async fn rejected_token_leaves_backend_not_ready() {
    let base_url = spawn_ynab(FakeYnab::default()).await;
    let backend = backend(&base_url, "wrong").await;

    assert!(!backend.is_ready());
    assert!(backend.shared_expenses().expenses.is_empty());
}

#[tokio::test]
async fn serves_split_fetch_and_submit_over_the_bridge() {
    let ynab = FakeYnab::default();
    let base_url = spawn_ynab(ynab.clone()).await;
    let backend = backend(&base_url, "secret").await;

    let (ui, backend_side) = pair();
    let (client, server) = rpc_channel();
    let mut ready = ui.on(EventName::BackendSetupComplete, "test").unwrap();
    let mut splits = ui.on(EventName::SharedMonthlyExpensesSplit, "test").unwrap();
    let task = tokio::spawn(backend.run(backend_side, server));

    assert_eq!(
        next(&mut ready).await,
        ChannelEvent::BackendSetupComplete(Some(true))
    );

    let shared = client.fetch_shared_expenses().await.unwrap();
    assert_eq!(shared.budget_id, SHARED_BUDGET);
    let shared = with_amounts(shared, ["100.00", "50", "20.5", "30"]);

    ui.emit(ChannelEvent::SharedMonthlyExpensesInput(shared.clone()))
        .unwrap();
    let ChannelEvent::SharedMonthlyExpensesSplit(individual) = next(&mut splits).await else {
        panic!("unexpected event");
    };
    assert_eq!(individual.budget_id, INDIVIDUAL_BUDGET);
    assert_eq!(individual.amount(ExpenseCategory::Condominium), "50.00");
    assert_eq!(individual.amount(ExpenseCategory::Electricity), "25.00");
    assert_eq!(individual.amount(ExpenseCategory::TvInternetPhone), "10.25");
    assert_eq!(individual.amount(ExpenseCategory::Water), "15.00");

    let created = client
        .submit_combined_expenses(CombinedMonthlyExpenses {
            shared_monthly_expenses: shared,
            individual_monthly_expenses: individual,
        })
        .await;
    assert_eq!(created, Ok(true));

    {
        let posts = ynab.posts.lock().unwrap();
        assert_eq!(posts.len(), 2);

        let (budget, body) = &posts[0];
        assert_eq!(budget, SHARED_BUDGET);
        let transactions = body["transactions"].as_array().unwrap();
        assert_eq!(transactions.len(), 6);
        assert_eq!(transactions[0]["amount"], -100_000);
        assert_eq!(transactions[0]["date"], "2024-06-05");
        assert_eq!(transactions[0]["cleared"], "uncleared");
        assert_eq!(transactions[4]["payee_name"], "Transfer: Magui");
        assert_eq!(transactions[4]["amount"], 100_250);

        let (budget, body) = &posts[1];
        assert_eq!(budget, INDIVIDUAL_BUDGET);
        assert_eq!(body["transaction"]["amount"], -100_250);
        assert_eq!(body["transaction"]["account_id"], INDIVIDUAL_ACCOUNT);
    }

    drop(client);
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn failed_import_answers_false() {
    let ynab = FakeYnab {
        reject_posts: true,
        ..FakeYnab::default()
    };
    let base_url = spawn_ynab(ynab.clone()).await;
    let mut backend = backend(&base_url, "secret").await;

    let shared = with_amounts(
        backend.shared_expenses().clone(),
        ["10", "10", "10", "10"],
    );
    let individual = backend.split(&shared, engine::Rounding::Up);

    let created = backend
        .submit(&CombinedMonthlyExpenses {
            shared_monthly_expenses: shared,
            individual_monthly_expenses: individual,
        })
        .await;

    assert!(!created);
    assert!(ynab.posts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn submit_refuses_incomplete_expenses() {
    let base_url = spawn_ynab(FakeYnab::default()).await;
    let backend = backend(&base_url, "secret").await;

    let created = backend
        .submit(&CombinedMonthlyExpenses {
            shared_monthly_expenses: with_amounts(
                backend.shared_expenses().clone(),
                ["1", "1", "1", "1"],
            ),
            individual_monthly_expenses: MonthlyExpenses::default(),
        })
        .await;

    assert!(!created);
}
