use api_types::{
    events::{ChannelEvent, EventName},
    expenses::{CombinedMonthlyExpenses, MonthlyExpenses},
    ynab::BudgetSummary,
};
use bridge::{ChannelError, EventChannel, RpcRequest, RpcServer};
use chrono::{Local, NaiveDate};
use engine::{
    Payees, Rounding, Side, is_valid,
    setup::{self, find_budget},
};
use serde::Deserialize;

use crate::{YnabClient, YnabError, ynab::DEFAULT_BASE_URL};

/// Key under which the backend registers its event handlers.
const HANDLER_KEY: &str = "backend";

/// Where the monthly expenses live in YNAB.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    /// Substring of the shared budget name.
    pub shared: String,
    /// Exact name of the account paying the shared bills.
    pub shared_account: String,
    /// Substring of the individual budget name.
    pub individual: String,
    /// Exact name of the account paying the individual share.
    pub individual_account: String,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            shared: "Casa Reis-Pereira".to_string(),
            shared_account: "Millennium bcp".to_string(),
            individual: "Magui".to_string(),
            individual_account: "CGD".to_string(),
        }
    }
}

pub struct Backend {
    client: YnabClient,
    budgets: BudgetSettings,
    payees: Payees,
    today: Option<NaiveDate>,
    shared: MonthlyExpenses,
    individual: MonthlyExpenses,
}

impl Backend {
    pub fn builder() -> BackendBuilder {
        BackendBuilder::default()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn shared_expenses(&self) -> &MonthlyExpenses {
        &self.shared
    }

    pub fn individual_expenses(&self) -> &MonthlyExpenses {
        &self.individual
    }

    /// Both templates point to a budget and an account and cover every
    /// category.
    pub fn is_ready(&self) -> bool {
        is_valid(&self.shared) && is_valid(&self.individual)
    }

    /// Reads budgets, accounts and categories from YNAB and builds the
    /// templates. Failures are logged and leave the templates incomplete.
    pub async fn setup(&mut self) {
        tracing::info!("Reading budgets from YNAB...");
        let budgets = match self.client.budgets().await {
            Ok(budgets) => budgets,
            Err(err) => {
                tracing::error!("failed to read budgets: {err}");
                return;
            }
        };

        let shared = self
            .template(
                Side::Shared,
                find_budget(&budgets, &self.budgets.shared),
                &self.budgets.shared_account,
            )
            .await;
        let individual = self
            .template(
                Side::Individual,
                find_budget(&budgets, &self.budgets.individual),
                &self.budgets.individual_account,
            )
            .await;

        self.shared = shared;
        self.individual = individual;
        tracing::info!("backend setup complete, ready: {}", self.is_ready());
    }

    async fn template(
        &self,
        side: Side,
        budget: Option<&BudgetSummary>,
        account_name: &str,
    ) -> MonthlyExpenses {
        let Some(budget) = budget else {
            tracing::warn!("no {side:?} budget found");
            return MonthlyExpenses::default();
        };

        let account = setup::monthly_expenses_account(&budget.accounts, account_name);
        if account.is_none() {
            tracing::warn!("no account \"{account_name}\" in budget \"{}\"", budget.name);
        }

        let groups = match self.client.categories(&budget.id.to_string()).await {
            Ok(groups) => groups,
            Err(err) => {
                tracing::error!("failed to read categories of \"{}\": {err}", budget.name);
                Vec::new()
            }
        };
        let categories = setup::monthly_expenses_categories(&groups);

        setup::expenses_template(side, budget, account, &categories, &self.payees, self.today())
    }

    /// Serves the UI until either side of the bridge goes away.
    ///
    /// Readiness is announced once, right after the split handler is
    /// registered.
    pub async fn run(
        mut self,
        channel: impl EventChannel,
        mut rpc: RpcServer,
    ) -> Result<(), ChannelError> {
        let mut inputs = channel.on(EventName::SharedMonthlyExpensesInput, HANDLER_KEY)?;
        channel.emit(ChannelEvent::BackendSetupComplete(Some(self.is_ready())))?;

        loop {
            tokio::select! {
                event = inputs.recv() => match event {
                    Some(ChannelEvent::SharedMonthlyExpensesInput(shared)) => {
                        let individual = self.split(&shared, Rounding::random());
                        channel.emit(ChannelEvent::SharedMonthlyExpensesSplit(individual))?;
                    }
                    Some(other) => tracing::warn!("unexpected {} event", other.name()),
                    None => break,
                },
                request = rpc.next() => match request {
                    Some(request) => self.handle(request).await,
                    None => break,
                },
            }
        }

        tracing::info!("backend stopped");
        Ok(())
    }

    /// Replaces the individual amounts with the split of `shared`.
    pub fn split(&mut self, shared: &MonthlyExpenses, first: Rounding) -> MonthlyExpenses {
        self.individual = engine::split_monthly_expenses(shared, &self.individual, first);
        self.individual.clone()
    }

    async fn handle(&self, request: RpcRequest) {
        tracing::debug!("rpc {}", request.label());
        let delivered = match request {
            RpcRequest::FetchSharedExpenses { reply } => reply.send(self.shared.clone()).is_ok(),
            RpcRequest::SubmitCombinedExpenses { expenses, reply } => {
                let created = self.submit(&expenses).await;
                reply.send(created).is_ok()
            }
        };
        if !delivered {
            tracing::warn!("caller went away before the reply");
        }
    }

    /// Creates the shared and the individual transactions. `false` when
    /// anything fails; the cause is logged.
    pub async fn submit(&self, combined: &CombinedMonthlyExpenses) -> bool {
        match self.create_transactions(combined).await {
            Ok(()) => {
                tracing::info!("monthly expenses imported");
                true
            }
            Err(err) => {
                tracing::error!("failed to import monthly expenses: {err}");
                false
            }
        }
    }

    async fn create_transactions(&self, combined: &CombinedMonthlyExpenses) -> Result<(), SubmitError> {
        let today = self.today();
        let shared = engine::shared_transactions(combined, &self.payees, today)?;
        let individual =
            engine::individual_transaction(&combined.individual_monthly_expenses, today)?;

        self.client
            .create_transactions(&combined.shared_monthly_expenses.budget_id, shared)
            .await?;
        self.client
            .create_transaction(&combined.individual_monthly_expenses.budget_id, individual)
            .await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
enum SubmitError {
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error(transparent)]
    Ynab(#[from] YnabError),
}

#[derive(Debug)]
pub struct BackendBuilder {
    base_url: String,
    token: String,
    budgets: BudgetSettings,
    payees: Payees,
    today: Option<NaiveDate>,
}

impl Default for BackendBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: String::new(),
            budgets: BudgetSettings::default(),
            payees: Payees::default(),
            today: None,
        }
    }
}

impl BackendBuilder {
    pub fn token(mut self, token: &str) -> BackendBuilder {
        self.token = token.to_string();
        self
    }

    pub fn base_url(mut self, base_url: &str) -> BackendBuilder {
        self.base_url = base_url.to_string();
        self
    }

    pub fn budgets(mut self, budgets: BudgetSettings) -> BackendBuilder {
        self.budgets = budgets;
        self
    }

    pub fn payees(mut self, payees: Payees) -> BackendBuilder {
        self.payees = payees;
        self
    }

    /// Pins the date used for memos and transactions.
    pub fn today(mut self, today: NaiveDate) -> BackendBuilder {
        self.today = Some(today);
        self
    }

    pub fn build(self) -> Result<Backend, YnabError> {
        if self.token.is_empty() {
            tracing::warn!("no YNAB access token configured");
        }

        Ok(Backend {
            client: YnabClient::new(&self.base_url, &self.token)?,
            budgets: self.budgets,
            payees: self.payees,
            today: self.today,
            shared: MonthlyExpenses::default(),
            individual: MonthlyExpenses::default(),
        })
    }
}
