//! Income and expense transactions.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, check_category, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, get_transactions, update_transaction, validate_amount,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
