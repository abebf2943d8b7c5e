use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::models::{NewConsultant, NewInvoice, NewJob, NewPayroll, INVOICE_KIND_RECRUITMENT};
use crate::store::{SeedTable, Store, StoreResult};

pub const DEMO_CLIENT: &str = "Nordic AB";
pub const DEMO_CONSULTANT_CODE: &str = "C-001";

/// Rows inserted by one seed run, per table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub jobs: usize,
    pub consultants: usize,
    pub invoices: usize,
    pub payroll: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.jobs + self.consultants + self.invoices + self.payroll == 0
    }
}

fn demo_jobs() -> Vec<NewJob> {
    [
        ("HR-generalist", "Nordic AB", "Bredd i HR, systemvana"),
        ("Truckförare", "Logiscan", "Behörighet A+B, skift"),
    ]
    .into_iter()
    .map(|(title, client, description)| NewJob {
        title: Some(title.to_string()),
        client: Some(client.to_string()),
        description: Some(description.to_string()),
    })
    .collect()
}

fn demo_consultants() -> Vec<NewConsultant> {
    [
        ("C-001", "Anna Svensson", "Sjuksköterska", 250),
        ("C-002", "Jonas Berg", "Truckförare", 180),
    ]
    .into_iter()
    .map(|(code, name, role, hourly_wage)| NewConsultant {
        code: code.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        hourly_wage,
    })
    .collect()
}

/// Fills empty tables with demo rows. Tables that already hold rows are left
/// untouched, so repeated runs insert nothing.
pub async fn seed_demo_data(store: &dyn Store) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    store.ensure_client(DEMO_CLIENT.to_string()).await?;

    if store.count(SeedTable::Jobs).await? == 0 {
        for job in demo_jobs() {
            store.create_job(job).await?;
            report.jobs += 1;
        }
    }

    if store.count(SeedTable::Consultants).await? == 0 {
        for consultant in demo_consultants() {
            store.create_consultant(consultant).await?;
            report.consultants += 1;
        }
    }

    if store.count(SeedTable::Invoices).await? == 0 {
        let client_id = store.first_client_id().await?;
        store
            .create_invoice(NewInvoice {
                client_id,
                amount: Some("114000".to_string()),
                kind: INVOICE_KIND_RECRUITMENT.to_string(),
                payload: None,
            })
            .await?;
        report.invoices += 1;
    }

    if store.count(SeedTable::Payroll).await? == 0 {
        match store
            .find_consultant_by_code(DEMO_CONSULTANT_CODE.to_string())
            .await?
        {
            Some(consultant) => {
                store
                    .create_payroll(NewPayroll {
                        consultant_id: Some(consultant.id),
                        month: "2025-08".to_string(),
                        gross: 41_250,
                        status: "Planerad".to_string(),
                    })
                    .await?;
                report.payroll += 1;
            }
            None => warn!(
                code = DEMO_CONSULTANT_CODE,
                "demo consultant missing, skipping payroll seed"
            ),
        }
    }

    Ok(report)
}

/// Runs the seed in the background. Failures are logged and never stop the server.
pub fn spawn_seed(store: Arc<dyn Store>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match seed_demo_data(store.as_ref()).await {
            Ok(report) if report.is_empty() => info!("demo data already present"),
            Ok(report) => info!(
                jobs = report.jobs,
                consultants = report.consultants,
                invoices = report.invoices,
                payroll = report.payroll,
                "seeded demo data"
            ),
            Err(err) => error!(error = %err, "failed to seed demo data"),
        }
    })
}
