use super::chart::ChartKind;
use super::route::Route;
use super::transaction::TransactionDraft;
use super::user::Credentials;

/// A discrete user interaction handled by the controller.
#[derive(Debug, Clone)]
pub enum Action {
    Login(Credentials),
    Register(Credentials),
    Logout,
    /// Fetch the current user and greet them
    LoadProfile,
    DeleteAccount,
    SubmitQuery(String),
    RefreshTransactions,
    AddTransaction(TransactionDraft),
    DeleteTransaction(i64),
    RenderChart(ChartKind),
}

impl Action {
    /// Actions that may only run with a credential present.
    #[must_use]
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Action::Login(_) | Action::Register(_) | Action::Logout
        )
    }
}

/// What a front-end has to do after an action completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Navigate(Route),
    /// Greeting for the signed-in user
    Welcome(String),
    /// Informational message (e.g., registration succeeded)
    Notice(String),
    /// A failure the user must see; exactly one per failed action
    Alert(String),
    /// New entries were appended to the conversation log
    TranscriptUpdated,
    /// The transaction list was replaced from the server
    TransactionsUpdated,
    ChartRendered(ChartKind),
    /// The plot endpoint returned no data; any previous chart is gone
    NoChartData,
}
