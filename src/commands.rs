use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::UploadArgs;
use shareup::catalog::{TargetCatalog, TargetEntry};
use shareup::config::Settings;
use shareup::desktop::{
    ClipboardWriter, CommandClipboard, CommandNotifier, LogNotifier, NoopClipboard, Notifier,
};
use shareup::job::{JobServices, ShareJob};
use shareup::observability::UploadMetrics;
use shareup::transport::{HttpConfig, ReqwestTransport};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Exit status when the job is interrupted
const CANCELLED_EXIT_CODE: i32 = 130;

/// Run one share job; returns the process exit code
pub async fn upload(settings: &Settings, args: UploadArgs) -> Result<i32, AnyError> {
    let catalog = TargetCatalog::load(&settings.targets.path)?;
    let target = catalog.get(&args.target)?.config.clone();

    let data = json!({ "urls": args.files });
    let job = ShareJob::new(target, data, services(settings)?);
    info!(job_id = %job.id(), target_id = %args.target, "Share job created");

    tokio::select! {
        outcome = job.run() => match outcome {
            Ok(output) => {
                println!("{}", serde_json::to_string(&output)?);
                Ok(0)
            }
            Err(failure) => {
                eprintln!("error: {}", failure.message);
                Ok(failure.code)
            }
        },
        _ = shutdown_signal() => {
            warn!("Upload cancelled");
            Ok(CANCELLED_EXIT_CODE)
        }
    }
}

pub fn list_targets(settings: &Settings) -> Result<(), AnyError> {
    let catalog = TargetCatalog::load(&settings.targets.path)?;
    for entry in catalog.targets() {
        println!("{}", target_line(entry));
    }
    Ok(())
}

fn target_line(entry: &TargetEntry) -> String {
    let line = format!("{:<20} {}", entry.config.id, entry.config.display_name());
    if entry.description.is_empty() {
        line
    } else {
        format!("{line:<40} {}", entry.description)
    }
}

pub fn validate(settings: &Settings) -> Result<(), AnyError> {
    let catalog = TargetCatalog::load(&settings.targets.path)?;
    println!(
        "{}: {} target(s) OK",
        settings.targets.path.display(),
        catalog.len()
    );
    Ok(())
}

fn services(settings: &Settings) -> Result<JobServices, AnyError> {
    let clipboard: Arc<dyn ClipboardWriter> = if settings.clipboard.enabled {
        Arc::new(CommandClipboard::new(&settings.clipboard.command)?)
    } else {
        Arc::new(NoopClipboard)
    };

    let notifier: Arc<dyn Notifier> = if settings.notifications.enabled {
        Arc::new(CommandNotifier::new(settings.notifications.command.clone())?)
    } else {
        Arc::new(LogNotifier)
    };

    Ok(JobServices {
        transport: Arc::new(ReqwestTransport::new(HttpConfig::default())?),
        clipboard,
        notifier,
        metrics: Arc::new(UploadMetrics::new()),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
