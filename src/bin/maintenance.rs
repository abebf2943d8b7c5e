use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};

use agency_backend::{
    config::AppConfig,
    db,
    seed::seed_demo_data,
    store::{PgStore, Store},
};

const USAGE: &str = "Usage: maintenance <migrate|seed>";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).compact().init();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("migrate") => migrate().await?,
        Some("seed") => seed().await?,
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}\n{USAGE}");
            std::process::exit(1);
        }
        None => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn connect() -> Result<db::PgPool> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "maintenance",
        database_url = %config.redacted_database_url(),
        "loaded backend configuration"
    );
    db::init_pool(&config.database_url, 1)
}

async fn migrate() -> Result<()> {
    let pool = connect()?;
    let applied = tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let mut conn = pool.get().context("failed to get database connection")?;
        db::run_migrations(&mut conn)
    })
    .await
    .context("migration task panicked")??;

    if applied.is_empty() {
        println!("Schema is up to date.");
    } else {
        for version in &applied {
            println!("Applied migration {version}");
        }
    }
    Ok(())
}

async fn seed() -> Result<()> {
    let store: Arc<dyn Store> = Arc::new(PgStore::new(connect()?));
    let report = seed_demo_data(store.as_ref())
        .await
        .context("failed to seed demo data")?;

    println!(
        "Inserted {} jobs, {} consultants, {} invoices, {} payroll rows.",
        report.jobs, report.consultants, report.invoices, report.payroll
    );
    Ok(())
}
