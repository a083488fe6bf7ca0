//! Storage collaborators for each collection

pub mod deadline;
pub mod in_memory;

pub use deadline::DeadlineDataService;
pub use in_memory::InMemoryDataService;

use crate::core::DataService;
use crate::entities::{Appointment, Customer, Invoice, User};
use std::sync::Arc;
use std::time::Duration;

/// One storage collaborator per collection
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn DataService<User>>,
    pub customers: Arc<dyn DataService<Customer>>,
    pub appointments: Arc<dyn DataService<Appointment>>,
    pub invoices: Arc<dyn DataService<Invoice>>,
}

impl Storage {
    /// Fresh, empty in-memory collections
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryDataService::<User>::new()),
            customers: Arc::new(InMemoryDataService::<Customer>::new()),
            appointments: Arc::new(InMemoryDataService::<Appointment>::new()),
            invoices: Arc::new(InMemoryDataService::<Invoice>::new()),
        }
    }

    /// Wrap every collection with the same deadline
    pub fn with_deadline(self, deadline: Duration) -> Self {
        Self {
            users: Arc::new(DeadlineDataService::new(self.users, deadline)),
            customers: Arc::new(DeadlineDataService::new(self.customers, deadline)),
            appointments: Arc::new(DeadlineDataService::new(self.appointments, deadline)),
            invoices: Arc::new(DeadlineDataService::new(self.invoices, deadline)),
        }
    }
}
