//! Paths of the remote API, relative to the configured base URL.

pub const TOKEN: &str = "/token";
pub const REGISTER: &str = "/register";
pub const CURRENT_USER: &str = "/users/me";
pub const QUERY: &str = "/query";
pub const TRANSACTIONS: &str = "/transactions";
pub const ADD_TRANSACTION: &str = "/add_transaction";
pub const PLOT_BY_CATEGORY: &str = "/plot/spending_by_category";
pub const PLOT_OVER_TIME: &str = "/plot/spending_over_time";

/// `DELETE` target for a single transaction.
#[must_use]
pub fn transaction(id: i64) -> String {
    format!("{TRANSACTIONS}/{id}")
}
