use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// Message shown when a transaction draft fails client-side validation.
pub const INVALID_DRAFT_MESSAGE: &str = "Please fill out all transaction fields correctly.";

/// Whether a transaction takes money out or brings it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Positive amount
    Expense,
    /// Negative amount
    Income,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Expense => write!(f, "Expense"),
            TransactionKind::Income => write!(f, "Income"),
        }
    }
}

/// A transaction as confirmed by the server.
///
/// The client never constructs one of these itself: ids are assigned by
/// the server and every instance comes out of a `GET /transactions` or
/// `POST /add_transaction` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Server-assigned identifier
    pub id: i64,

    /// Signed amount: positive = expense, negative = income
    pub amount: f64,

    /// Free-text category label (e.g., "Groceries")
    pub class_name: String,

    /// Date of the transaction. The server stores it as free text, so rows
    /// that are not `YYYY-MM-DD` are kept verbatim instead of failing the list.
    pub time: TransactionTime,

    /// Owner as reported by the server
    #[serde(default)]
    pub userid: Option<String>,
}

impl Transaction {
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        if self.amount < 0.0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }

    /// Amount formatted for display: expenses as `-$42.50`, income as `+$42.50`.
    #[must_use]
    pub fn display_amount(&self) -> String {
        let sign = match self.kind() {
            TransactionKind::Expense => '-',
            TransactionKind::Income => '+',
        };
        format!("{sign}${:.2}", self.amount.abs())
    }
}

/// The `time` field of a server row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionTime {
    Date(NaiveDate),
    /// Anything the server returned that is not an ISO date
    Raw(String),
}

impl TransactionTime {
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TransactionTime::Date(d) => Some(*d),
            TransactionTime::Raw(_) => None,
        }
    }
}

impl From<NaiveDate> for TransactionTime {
    fn from(date: NaiveDate) -> Self {
        TransactionTime::Date(date)
    }
}

impl PartialEq<NaiveDate> for TransactionTime {
    fn eq(&self, other: &NaiveDate) -> bool {
        self.date().as_ref() == Some(other)
    }
}

impl std::fmt::Display for TransactionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TransactionTime::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

/// Validated request body for `POST /add_transaction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub class_name: String,
    pub time: NaiveDate,
}

/// Raw form input for a new transaction, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Amount as typed by the user
    pub amount: String,
    pub class_name: String,
    /// Pre-filled with today's date
    pub time: Option<NaiveDate>,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self {
            amount: String::new(),
            class_name: String::new(),
            time: Some(chrono::Local::now().date_naive()),
        }
    }
}

impl TransactionDraft {
    pub fn new(amount: impl Into<String>, class_name: impl Into<String>, time: Option<NaiveDate>) -> Self {
        Self {
            amount: amount.into(),
            class_name: class_name.into(),
            time,
        }
    }

    /// Check the client-side preconditions and build the request body.
    ///
    /// Rules:
    /// - amount parses to a finite, non-zero number
    /// - class name is non-empty after trimming
    /// - a date is present
    pub fn validate(&self) -> Result<NewTransaction, ClientError> {
        let invalid = || ClientError::Validation(INVALID_DRAFT_MESSAGE.into());

        let amount: f64 = self.amount.trim().parse().map_err(|_| invalid())?;
        if !amount.is_finite() || amount == 0.0 {
            return Err(invalid());
        }

        let class_name = self.class_name.trim();
        if class_name.is_empty() {
            return Err(invalid());
        }

        let time = self.time.ok_or_else(invalid)?;

        Ok(NewTransaction {
            amount,
            class_name: class_name.to_string(),
            time,
        })
    }

    /// Reset the form after a successful submit: fields emptied, date back to today.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
