use reqwest::Method;

use crate::api::endpoints;
use crate::api::gateway::Gateway;
use crate::api::traits::RequestBody;
use crate::errors::ClientError;
use crate::models::transaction::{Transaction, TransactionDraft};
use crate::models::user::StatusMessage;

/// Placeholder shown instead of an empty list.
pub const EMPTY_PLACEHOLDER: &str = "No transactions yet.";

/// Interactive yes/no prompt, asked before destructive calls.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Answers every prompt the same way. Useful for `--yes` flags and tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// What the transaction view currently shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransactionView<'a> {
    /// Nothing fetched yet
    NotLoaded,
    /// Fetched, server has no transactions
    Empty,
    Rows(&'a [Transaction]),
}

/// The rendered transaction list.
///
/// Only ever replaced wholesale from a server response; there is no
/// insert/remove API on purpose.
#[derive(Debug, Clone, Default)]
pub struct TransactionList {
    rows: Vec<Transaction>,
    loaded: bool,
}

impl TransactionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw away the current rows and show `rows` in server order.
    pub fn replace(&mut self, rows: Vec<Transaction>) {
        self.rows = rows;
        self.loaded = true;
    }

    #[must_use]
    pub fn view(&self) -> TransactionView<'_> {
        match (self.loaded, self.rows.is_empty()) {
            (false, _) => TransactionView::NotLoaded,
            (true, true) => TransactionView::Empty,
            (true, false) => TransactionView::Rows(&self.rows),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Transaction> {
        self.rows.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Back to the not-loaded state (e.g., on logout).
    pub fn reset(&mut self) {
        self.rows.clear();
        self.loaded = false;
    }
}

/// Whether the list caught up after a mutation the server accepted.
///
/// A failed resync never undoes the mutation: the server kept the change,
/// only the rendered rows are behind.
#[derive(Debug)]
pub enum Resync {
    Synced,
    /// List left as it was before the mutation
    Stale(ClientError),
}

impl Resync {
    #[must_use]
    pub fn is_synced(&self) -> bool {
        matches!(self, Resync::Synced)
    }
}

/// Result of a delete request.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// User declined the confirmation; nothing was sent
    Cancelled,
    /// Server confirmed with `message`
    Deleted { message: String, resync: Resync },
}

/// Create/list/delete against the server, keeping [`TransactionList`]
/// equal to the server's sequence after every successful mutation.
#[derive(Debug, Default)]
pub struct TransactionService {
    list: TransactionList,
}

impl TransactionService {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn list(&self) -> &TransactionList {
        &self.list
    }

    /// Fetch-and-replace. A failed fetch leaves the current rows alone.
    pub async fn refresh(&mut self, gateway: &Gateway) -> Result<&[Transaction], ClientError> {
        let rows: Vec<Transaction> = gateway
            .call(Method::GET, endpoints::TRANSACTIONS, None)
            .await?;
        tracing::debug!(count = rows.len(), "Transactions resynchronized");
        self.list.replace(rows);
        Ok(self.list.rows())
    }

    /// Validate `draft`, create it on the server, then resynchronize.
    ///
    /// Invalid drafts fail with `ClientError::Validation` and nothing is sent.
    /// `Err` means the server did not store anything; once it has, the
    /// created row comes back together with the outcome of the resync.
    pub async fn create(
        &mut self,
        gateway: &Gateway,
        draft: &TransactionDraft,
    ) -> Result<(Transaction, Resync), ClientError> {
        let new_tx = draft.validate()?;
        let created: Transaction = gateway
            .call(
                Method::POST,
                endpoints::ADD_TRANSACTION,
                Some(RequestBody::json(&new_tx)?),
            )
            .await?;
        tracing::info!(id = created.id, "Transaction created");

        let resync = self.resync(gateway).await;
        Ok((created, resync))
    }

    /// Delete transaction `id` after confirmation, then resynchronize.
    pub async fn delete(
        &mut self,
        gateway: &Gateway,
        id: i64,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, ClientError> {
        if !confirm.confirm(&delete_prompt(id)) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let status: StatusMessage = gateway
            .call(Method::DELETE, &endpoints::transaction(id), None)
            .await?;
        tracing::info!(id, "Transaction deleted");

        let resync = self.resync(gateway).await;
        Ok(DeleteOutcome::Deleted {
            message: status.message,
            resync,
        })
    }

    async fn resync(&mut self, gateway: &Gateway) -> Resync {
        match self.refresh(gateway).await {
            Ok(_) => Resync::Synced,
            Err(e) => {
                tracing::warn!(error = %e, "Resync after mutation failed");
                Resync::Stale(e)
            }
        }
    }

    /// Drop the rendered rows (on logout or account deletion).
    pub fn reset(&mut self) {
        self.list.reset();
    }
}

fn delete_prompt(id: i64) -> String {
    format!("Are you sure you want to delete transaction #{id}?")
}
