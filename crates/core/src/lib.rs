pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod navigation;
pub mod services;
pub mod storage;

use std::sync::Arc;

use api::gateway::Gateway;
use api::http::ReqwestTransport;
use api::traits::Transport;
use config::ClientConfig;
use errors::ClientError;
use models::{
    action::{Action, Effect},
    chart::ChartKind,
    message::Message,
    route::Route,
    transaction::TransactionDraft,
    user::Credentials,
};
use navigation::{CapturingNavigator, Navigator};
use services::{
    account_service::{AccountService, REGISTERED_NOTICE},
    chart_service::{ChartOutcome, ChartPresenter, ChartRenderer},
    conversation_service::ConversationLog,
    session_guard::SessionGuard,
    transaction_service::{
        AutoConfirm, Confirm, DeleteOutcome, Resync, TransactionList, TransactionService,
    },
};
use storage::credential_store::CredentialStore;

/// Appended to the transcript after a transaction is created.
pub const TRANSACTION_ADDED_NOTICE: &str = "Successfully added transaction.";

/// Alert raised when a mutation succeeded but the list could not be reloaded.
pub const RESYNC_FAILED_ALERT: &str = "The transaction list could not be refreshed";

/// Prompt shown before deleting the account.
pub const DELETE_ACCOUNT_PROMPT: &str =
    "Are you sure you want to delete your account and all of your data?";

/// Session-scoped context of the Finance Tracker client.
///
/// Owns the gateway and every view (transcript, transaction list, chart),
/// and turns [`Action`]s into [`Effect`]s. Front-ends create one per
/// session and route all user interaction through [`dispatch`](Self::dispatch).
#[must_use]
pub struct FinanceTracker<R: ChartRenderer> {
    gateway: Gateway,
    navigator: Arc<CapturingNavigator>,
    guard: SessionGuard,
    accounts: AccountService,
    transactions: TransactionService,
    conversation: ConversationLog,
    charts: ChartPresenter<R>,
    confirm: Box<dyn Confirm>,
}

impl<R: ChartRenderer> std::fmt::Debug for FinanceTracker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("authenticated", &self.is_authenticated())
            .field("messages", &self.conversation.messages().len())
            .field("transactions", &self.transactions.list().rows().len())
            .field("chart", &self.charts.active_kind())
            .finish()
    }
}

impl<R: ChartRenderer> FinanceTracker<R> {
    /// Build a client talking over `transport`.
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        renderer: R,
    ) -> Self {
        let navigator = Arc::new(CapturingNavigator::new(navigator));
        let gateway = Gateway::new(transport, credentials.clone(), navigator.clone());
        let guard = SessionGuard::new(credentials, navigator.clone());

        Self {
            gateway,
            navigator,
            guard,
            accounts: AccountService::new(),
            transactions: TransactionService::new(),
            conversation: ConversationLog::new(),
            charts: ChartPresenter::new(renderer),
            // Destructive actions are refused until a real prompt is installed.
            confirm: Box::new(AutoConfirm(false)),
        }
    }

    /// Build a client talking HTTP to `config.base_url`.
    pub fn from_config(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        renderer: R,
    ) -> Self {
        Self::new(
            Arc::new(ReqwestTransport::new(config)),
            credentials,
            navigator,
            renderer,
        )
    }

    /// Install the prompt used before deleting data.
    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.guard.is_authenticated()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    #[must_use]
    pub fn conversation(&self) -> &ConversationLog {
        &self.conversation
    }

    #[must_use]
    pub fn transactions(&self) -> &TransactionList {
        self.transactions.list()
    }

    #[must_use]
    pub fn charts(&self) -> &ChartPresenter<R> {
        &self.charts
    }

    // ── Entry ───────────────────────────────────────────────────────

    /// Activate a view: protected routes require a credential.
    ///
    /// On success for `Route::Home`, loads the profile (welcome message)
    /// the way the main page does on first paint.
    pub async fn enter(&mut self, route: Route) -> Vec<Effect> {
        if let Err(e) = self.guard.enter(route) {
            return self.finish(vec![Effect::Alert(e.to_string())]);
        }
        if route == Route::Home {
            return self.dispatch(Action::LoadProfile).await;
        }
        self.finish(Vec::new())
    }

    // ── Dispatch ────────────────────────────────────────────────────

    /// Handle one user action.
    ///
    /// Protected actions pass through the session guard first, so an
    /// anonymous session never reaches the network. Every failure is
    /// reported exactly once, as an `Alert` or as an error entry in the
    /// transcript.
    pub async fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        tracing::debug!(?action, "Dispatching");

        if action.requires_session() {
            if let Err(e) = self.guard.enter_protected() {
                self.reset_views();
                return self.finish(vec![Effect::Alert(e.to_string())]);
            }
        }

        let effects = match action {
            Action::Login(credentials) => self.login(&credentials).await,
            Action::Register(credentials) => self.register(&credentials).await,
            Action::Logout => self.logout(),
            Action::LoadProfile => self.load_profile().await,
            Action::DeleteAccount => self.delete_account().await,
            Action::SubmitQuery(query) => self.submit_query(&query).await,
            Action::RefreshTransactions => self.refresh_transactions().await,
            Action::AddTransaction(draft) => self.add_transaction(&draft).await,
            Action::DeleteTransaction(id) => self.delete_transaction(id).await,
            Action::RenderChart(kind) => self.render_chart(kind).await,
        };

        self.finish(effects)
    }

    // ── Handlers ────────────────────────────────────────────────────

    async fn login(&mut self, credentials: &Credentials) -> Vec<Effect> {
        match self.accounts.login(&self.gateway, credentials).await {
            Ok(()) => Vec::new(),
            Err(e) => vec![Effect::Alert(e.to_string())],
        }
    }

    async fn register(&mut self, credentials: &Credentials) -> Vec<Effect> {
        match self.accounts.register(&self.gateway, credentials).await {
            Ok(_) => vec![Effect::Notice(REGISTERED_NOTICE.into())],
            Err(e) => vec![Effect::Alert(e.to_string())],
        }
    }

    fn logout(&mut self) -> Vec<Effect> {
        self.reset_views();
        match self.accounts.logout(&self.gateway) {
            Ok(()) => Vec::new(),
            Err(e) => vec![Effect::Alert(e.to_string())],
        }
    }

    async fn load_profile(&mut self) -> Vec<Effect> {
        match self.accounts.current_user(&self.gateway).await {
            Ok(user) => vec![Effect::Welcome(format!("Welcome, {}!", user.username))],
            Err(e) => {
                // An unusable profile means an unusable credential.
                tracing::warn!(error = %e, "Failed to fetch current user");
                if !e.is_session_error() {
                    if let Err(clear_err) = self.accounts.logout(&self.gateway) {
                        tracing::error!(error = %clear_err, "Failed to clear credential");
                    }
                }
                vec![Effect::Alert(e.to_string())]
            }
        }
    }

    async fn delete_account(&mut self) -> Vec<Effect> {
        if !self.confirm.confirm(DELETE_ACCOUNT_PROMPT) {
            return Vec::new();
        }
        match self.accounts.delete_account(&self.gateway).await {
            Ok(message) => {
                self.reset_views();
                vec![Effect::Notice(message)]
            }
            Err(e) => vec![Effect::Alert(e.to_string())],
        }
    }

    async fn submit_query(&mut self, query: &str) -> Vec<Effect> {
        match self.conversation.submit(&self.gateway, query).await {
            Some(_) => vec![Effect::TranscriptUpdated],
            None => Vec::new(),
        }
    }

    async fn refresh_transactions(&mut self) -> Vec<Effect> {
        match self.transactions.refresh(&self.gateway).await {
            Ok(_) => vec![Effect::TransactionsUpdated],
            Err(e) => vec![Effect::Alert(e.to_string())],
        }
    }

    async fn add_transaction(&mut self, draft: &TransactionDraft) -> Vec<Effect> {
        match self.transactions.create(&self.gateway, draft).await {
            Ok((_, resync)) => {
                self.conversation.notify(TRANSACTION_ADDED_NOTICE);
                let mut effects = vec![Effect::TranscriptUpdated];
                effects.push(Self::resync_effect(resync));
                effects
            }
            Err(e @ ClientError::Validation(_)) => vec![Effect::Alert(e.to_string())],
            Err(e) => {
                self.conversation.report_error(&e);
                vec![Effect::TranscriptUpdated]
            }
        }
    }

    async fn delete_transaction(&mut self, id: i64) -> Vec<Effect> {
        match self
            .transactions
            .delete(&self.gateway, id, self.confirm.as_ref())
            .await
        {
            Ok(DeleteOutcome::Cancelled) => Vec::new(),
            Ok(DeleteOutcome::Deleted { message, resync }) => {
                vec![Self::resync_effect(resync), Effect::Notice(message)]
            }
            Err(e) => vec![Effect::Alert(e.to_string())],
        }
    }

    async fn render_chart(&mut self, kind: ChartKind) -> Vec<Effect> {
        match self.charts.render(&self.gateway, kind).await {
            Ok(ChartOutcome::Rendered(kind)) => vec![Effect::ChartRendered(kind)],
            Ok(ChartOutcome::NoData) => vec![Effect::NoChartData],
            Err(e) => vec![Effect::Alert(e.to_string())],
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Append the redirects that happened during the action. A redirect to
    /// login means the session ended, so derived views are dropped too.
    fn finish(&mut self, mut effects: Vec<Effect>) -> Vec<Effect> {
        let routes = self.navigator.drain();
        if routes.contains(&Route::Login) {
            self.reset_views();
        }
        effects.extend(routes.into_iter().map(Effect::Navigate));
        effects
    }

    /// `TransactionsUpdated` when the list caught up, otherwise one alert.
    /// The mutation itself is reported by the caller either way.
    fn resync_effect(resync: Resync) -> Effect {
        match resync {
            Resync::Synced => Effect::TransactionsUpdated,
            Resync::Stale(e) => Effect::Alert(format!("{RESYNC_FAILED_ALERT}: {e}")),
        }
    }

    fn reset_views(&mut self) {
        self.transactions.reset();
        self.charts.clear();
    }
}
