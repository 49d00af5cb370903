use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A buyer. `user_id` is the opaque identifier handed out by the external
/// identity provider; several customer profiles may share one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub user_id: Uuid,
    pub phone: String,
    pub company: String,
    pub legal_address: String,
    pub actual_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub user_id: Uuid,
    pub phone: String,
    pub company: String,
    pub legal_address: String,
    pub actual_address: String,
}
