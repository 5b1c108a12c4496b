fn help() {
    const HELP: &str = r#"
        NEW_RELIC_API_KEY=... cargo run --features env-config --example deployments -- <application-id> [revision]

        Lists the deployments of an application. With a revision, records a deployment first.
    "#;
    println!("{HELP}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let mut args = std::env::args();
    // drop exec
    let _ = args.next();
    let Some(application_id) = args.next() else {
        help();
        return Ok(());
    };
    let application_id: u64 = application_id.parse()?;

    let client = newrelic_client::env_config::client()?;
    let deployments = client.deployments();

    if let Some(revision) = args.next() {
        let user = std::env::var("USER").unwrap_or_default();
        let created = deployments
            .create(application_id, &revision, "", "deployments demo", &user)
            .await?;
        println!("{created:#}");
    }

    let mut page = None;
    loop {
        let resp = deployments.list(Some(application_id), page).await?;
        let list: newrelic_client::types::DeploymentList = serde_json::from_value(resp)?;

        for d in &list.deployments {
            println!(
                "{} {} {} {}",
                d.id,
                d.timestamp,
                d.revision,
                d.user.as_deref().unwrap_or("-")
            );
        }

        if list.next_page().is_none() {
            break;
        }
        page = Some(page.unwrap_or(1) + 1);
    }

    Ok(())
}
