//! Small admin console walkthrough: log in, inspect the catalogue, create
//! and delete a department.
//!
//! ```bash
//! MEDIPLUS_EMAIL=admin@example.com MEDIPLUS_PASSWORD=secret \
//!     cargo run --example admin_console
//! ```

use mediplus::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediplus=debug".into()),
        )
        .init();

    let client = MediplusClient::builder().config(ClientConfig::from_env()).build();

    // Public catalogue, no session needed
    let departments = client.departments().fetch_all().await?;
    println!("departments:");
    for department in &departments {
        println!("  [{}] {}", department.id, department.name);
    }

    let recent = client.blogs().fetch_recent().await?;
    println!("{} recent blog posts", recent.len());

    let email = std::env::var("MEDIPLUS_EMAIL")?;
    let password = std::env::var("MEDIPLUS_PASSWORD")?;
    let session = client
        .session()
        .login(&Credentials { email, password })
        .await?;
    println!("signed in as {}", session.name);

    // The back office sees reservations
    let reservations = client.reservations().fetch_all().await?;
    println!("{} open reservations", reservations.len());

    let created = client
        .departments()
        .create(&DepartmentDraft {
            name: "Radiology (demo)".to_string(),
        })
        .await?;
    println!("created department {}", created.id);

    client.departments().remove(created.id).await?;
    println!(
        "cleaned up; {} departments cached",
        client.departments().records().len()
    );

    client.session().logout()?;
    Ok(())
}
