//! Mock Iugu Client
//!
//! For tests and demos. Records every request and returns scripted
//! outcomes instead of talking HTTP.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::client::{
    Customer, CustomerRequest, Invoice, InvoiceOutcome, InvoiceRejection, InvoiceRequest, IuguApi,
};
use crate::error::{IuguError, Result};

/// Mock API implementation with scripted responses
pub struct MockIuguApi {
    invoice: RwLock<Invoice>,
    rejection: RwLock<Option<InvoiceRejection>>,
    fail_transport: AtomicBool,
    customers: RwLock<Vec<CustomerRequest>>,
    invoices: RwLock<Vec<InvoiceRequest>>,
    fetches: AtomicUsize,
}

impl Default for MockIuguApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIuguApi {
    /// Mock that accepts every invoice
    pub fn new() -> Self {
        Self {
            invoice: RwLock::new(Invoice {
                id: "mock-invoice".into(),
                secure_url: "https://faturas.example.com/mock-invoice".into(),
                status: Some("pending".into()),
                due_date: None,
                total_cents: None,
            }),
            rejection: RwLock::new(None),
            fail_transport: AtomicBool::new(false),
            customers: RwLock::new(Vec::new()),
            invoices: RwLock::new(Vec::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Mock that answers creation with a specific invoice
    pub fn with_invoice(invoice: Invoice) -> Self {
        let mock = Self::new();
        *mock.invoice.write().unwrap() = invoice;
        mock
    }

    /// Mock that refuses every invoice
    pub fn rejecting(rejection: InvoiceRejection) -> Self {
        let mock = Self::new();
        *mock.rejection.write().unwrap() = Some(rejection);
        mock
    }

    /// Mock where every call fails at the transport level
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.fail_transport.store(true, Ordering::SeqCst);
        mock
    }

    pub fn customer_requests(&self) -> Vec<CustomerRequest> {
        self.customers.read().unwrap().clone()
    }

    pub fn invoice_requests(&self) -> Vec<InvoiceRequest> {
        self.invoices.read().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Total remote calls seen, across all three operations
    pub fn call_count(&self) -> usize {
        self.customers.read().unwrap().len() + self.invoices.read().unwrap().len()
            + self.fetch_count()
    }

    fn check_transport(&self) -> Result<()> {
        if self.fail_transport.load(Ordering::SeqCst) {
            Err(IuguError::Transport("mock transport failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IuguApi for MockIuguApi {
    async fn create_customer(&self, request: CustomerRequest) -> Result<Customer> {
        self.check_transport()?;

        let customer = Customer {
            id: "mock-customer".into(),
            email: request.email.clone(),
            name: request.name.clone(),
        };
        self.customers.write().unwrap().push(request);
        Ok(customer)
    }

    async fn create_invoice(&self, request: InvoiceRequest) -> Result<InvoiceOutcome> {
        self.check_transport()?;
        self.invoices.write().unwrap().push(request);

        match self.rejection.read().unwrap().clone() {
            Some(rejection) => Ok(InvoiceOutcome::Rejected(rejection)),
            None => Ok(InvoiceOutcome::Created(self.invoice.read().unwrap().clone())),
        }
    }

    async fn fetch_invoice(&self, _id: &str) -> Result<Invoice> {
        self.check_transport()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.invoice.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockIuguApi::new();

        let customer = mock
            .create_customer(CustomerRequest {
                email: "donor@example.com".into(),
                name: "Maria Silva".into(),
            })
            .await
            .unwrap();

        assert_eq!(customer.email, "donor@example.com");
        assert_eq!(mock.customer_requests().len(), 1);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_mock_fails_everything() {
        let mock = MockIuguApi::failing();

        let result = mock.fetch_invoice("inv").await;
        assert!(matches!(result, Err(IuguError::Transport(_))));
        assert_eq!(mock.fetch_count(), 0);
    }
}
