use std::time::Duration;

use api_types::{
    events::{ChannelEvent, EventName},
    expenses::MonthlyExpenses,
};
use bridge::{EventChannel, ExpensesRpc, RpcError, Subscription};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::{
    config::UiConfig,
    error::{AppError, Result},
    state::{AppState, Readiness},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

/// Key under which the UI registers its event handlers.
const HANDLER_KEY: &str = "app";

/// Results of the UI's own background work, applied on the UI loop.
#[derive(Debug)]
pub enum UiMessage {
    ReadinessCommitted(Readiness),
    SharedFetched(std::result::Result<MonthlyExpenses, RpcError>),
    ImportResolved(std::result::Result<bool, RpcError>),
}

pub struct App<C, R> {
    config: UiConfig,
    channel: C,
    rpc: R,
    pub state: AppState,
    readiness: Subscription,
    splits: Subscription,
    sender: mpsc::UnboundedSender<UiMessage>,
    messages: mpsc::UnboundedReceiver<UiMessage>,
    tick: usize,
    should_quit: bool,
}

impl<C, R> App<C, R>
where
    C: EventChannel,
    R: ExpensesRpc + Clone + 'static,
{
    /// Registers the event handlers. They live as long as the app.
    pub fn new(config: UiConfig, channel: C, rpc: R) -> Result<Self> {
        let readiness = channel.on(EventName::BackendSetupComplete, HANDLER_KEY)?;
        let splits = channel.on(EventName::SharedMonthlyExpensesSplit, HANDLER_KEY)?;
        let (sender, messages) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            channel,
            rpc,
            state: AppState::default(),
            readiness,
            splits,
            sender,
            messages,
            tick: 0,
            should_quit: false,
        })
    }

    /// Fetches the shared expenses once. Gives up after the fetch timeout.
    pub fn start(&self) {
        let rpc = self.rpc.clone();
        let sender = self.sender.clone();
        let timeout = self.config.fetch_timeout();

        tokio::spawn(async move {
            let result = tokio::time::timeout(timeout, rpc.fetch_shared_expenses())
                .await
                .unwrap_or(Err(RpcError::Timeout));
            let _ = sender.send(UiMessage::SharedFetched(result));
        });
    }

    pub async fn run(&mut self) -> Result<()> {
        self.start();

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            self.pump();
            terminal
                .draw(|frame| ui::render(frame, &self.state, self.tick))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
            self.tick = self.tick.wrapping_add(1);
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        self.handle_action(map_key(key));
    }

    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::NextField => self.state.focus_next(),
            AppAction::PrevField => self.state.focus_prev(),
            AppAction::Backspace => {
                self.state.backspace();
            }
            AppAction::Input(ch) => {
                self.state.type_char(ch);
            }
            AppAction::Split => self.split(),
            AppAction::Import => self.import(),
            AppAction::None => {}
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Sends the shared expenses to the backend for splitting.
    pub fn split(&mut self) {
        let Some(shared) = self.state.split_request() else {
            return;
        };
        if let Err(err) = self
            .channel
            .emit(ChannelEvent::SharedMonthlyExpensesInput(shared))
        {
            tracing::error!("failed to request split: {err}");
        }
    }

    /// Submits the combined expenses. The outcome is shown after the import
    /// delay.
    pub fn import(&mut self) {
        let Some(combined) = self.state.begin_import() else {
            return;
        };
        let rpc = self.rpc.clone();
        let sender = self.sender.clone();
        let delay = self.config.import_delay();

        tokio::spawn(async move {
            let result = rpc.submit_combined_expenses(combined).await;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let _ = sender.send(UiMessage::ImportResolved(result));
        });
    }

    /// Applies everything already delivered, without waiting.
    pub fn pump(&mut self) {
        while let Some(event) = self.readiness.try_recv() {
            self.on_event(event);
        }
        while let Some(event) = self.splits.try_recv() {
            self.on_event(event);
        }
        while let Ok(message) = self.messages.try_recv() {
            self.on_message(message);
        }
    }

    /// Waits for the next event or message and applies it.
    pub async fn update(&mut self) {
        tokio::select! {
            Some(event) = self.readiness.recv() => self.on_event(event),
            Some(event) = self.splits.recv() => self.on_event(event),
            Some(message) = self.messages.recv() => self.on_message(message),
            else => {}
        }
    }

    fn on_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::BackendSetupComplete(signal) => {
                let Some(target) = self.state.on_backend_setup_complete(signal) else {
                    return;
                };
                let delay = self.config.readiness_delay();
                if delay.is_zero() {
                    self.state.commit_readiness(target);
                    return;
                }
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = sender.send(UiMessage::ReadinessCommitted(target));
                });
            }
            ChannelEvent::SharedMonthlyExpensesSplit(individual) => {
                self.state.on_split(individual);
            }
            other => tracing::warn!("unexpected {} event", other.name()),
        }
    }

    fn on_message(&mut self, message: UiMessage) {
        match message {
            UiMessage::ReadinessCommitted(readiness) => self.state.commit_readiness(readiness),
            UiMessage::SharedFetched(result) => self.state.on_shared_fetched(result),
            UiMessage::ImportResolved(result) => self.state.finish_import(result),
        }
    }
}
