//! Minimal presentation front end for the sync engine.
//!
//! `alertsync list [search]` prints the sorted, filtered registration list;
//! `alertsync <enable|disable|notify-on|notify-off|delete> <id>` dispatches
//! a single action and waits for it to settle.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alertsync_client::api::SharedApi;
use alertsync_client::config::ClientConfig;
use alertsync_client::http::HttpRegistrationApi;
use alertsync_core::action::AlertAction;
use alertsync_core::filter::{derive_view, ViewFilter};
use alertsync_core::view::RegistrationView;
use alertsync_engine::{Dispatched, RegistrationCache, Reconciler, SyncBus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alertsync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().context("resolving client configuration")?;
    let api: SharedApi = Arc::new(HttpRegistrationApi::new(config));
    let bus = Arc::new(SyncBus::default());
    let cache = RegistrationCache::new(api.clone(), Arc::clone(&bus));

    cache
        .invalidate()
        .await
        .context("fetching the registration list")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("list") | None => {
            let filter = ViewFilter::new(args.get(1).cloned().unwrap_or_default());
            print_list(&cache.read().await, &filter);
        }
        Some(command) => {
            let action = parse_action(command)?;
            let id: i64 = args
                .get(1)
                .context("missing registration id")?
                .parse()
                .context("registration id must be an integer")?;

            let reconciler = Reconciler::new(api, Arc::clone(&cache), bus);
            match reconciler.dispatch_action(id, action).await? {
                Dispatched::Confirmed => tracing::info!(id, ?action, "Action confirmed"),
                Dispatched::Optimistic(handle) => {
                    tracing::info!(id, ?action, "Applied optimistically, waiting for server");
                    handle.await.context("confirmation task panicked")??;
                    tracing::info!(id, "Server confirmed");
                }
            }
            print_list(&cache.read().await, &ViewFilter::default());
        }
    }

    Ok(())
}

fn parse_action(command: &str) -> anyhow::Result<AlertAction> {
    Ok(match command {
        "enable" => AlertAction::Enable,
        "disable" => AlertAction::Disable,
        "notify-on" => AlertAction::EnableClosedNotif,
        "notify-off" => AlertAction::DisableClosedNotif,
        "delete" => AlertAction::Delete,
        other => bail!(
            "unknown command '{other}' (expected list, enable, disable, notify-on, notify-off, delete)"
        ),
    })
}

fn print_list(records: &[alertsync_core::registration::Registration], filter: &ViewFilter) {
    let view = derive_view(records, filter);
    if view.is_empty() {
        println!("No registrations.");
        return;
    }

    println!("{:>6}  {:<16}  {:<8}  {:<12}  {}", "id", "section", "alert", "close-notif", "last notified");
    for record in &view {
        let v = RegistrationView::from(record);
        println!(
            "{:>6}  {:<16}  {:<8}  {:<12}  {}",
            v.id,
            v.section_code,
            if record.is_active { "on" } else { "off" },
            match v.closed_notif_action {
                alertsync_core::view::ClosedNotifAction::DisableClosedNotif => "on",
                alertsync_core::view::ClosedNotifAction::EnableClosedNotif => "off",
                alertsync_core::view::ClosedNotifAction::NoEffect => "-",
            },
            v.display_sent_at.as_deref().unwrap_or("never"),
        );
    }
}
