use std::sync::Arc;

use sensora_cart::repository::{CartRepository, CustomerRepository};
use sensora_catalog::repository::{ProductRepository, ReferenceRepository};

use crate::registry::AdminRegistry;

#[derive(Clone)]
pub struct AppState {
    pub reference: Arc<dyn ReferenceRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub admin: Arc<AdminRegistry>,
}
