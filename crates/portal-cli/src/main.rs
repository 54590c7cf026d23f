//! portal: command-line client for booking documents.
//!
//! Configuration comes from the environment (see `PortalConfig::from_env`):
//! FILE_SERVICE_URL, RECORD_STORE_BACKEND, RECORD_STORE_PATH, DOWNLOAD_DIR,
//! BOOKINGS_PATH and the upload limits.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portal_cli::{init_tracing, print_json, record_table, user_error, Portal};
use portal_core::{
    Clock, DocumentCatalog, DocumentCategory, MilestoneSummary, PortalConfig, SystemClock,
};
use portal_documents::{DocumentComposer, DocumentKind, FileSink};
use portal_services::{SessionError, SessionState};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "portal", about = "Booking document portal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more files for a booking under one category
    Upload {
        /// Booking ID
        booking_id: String,
        /// Document category, e.g. pan-card, "Aadhar Card", demand-letter
        #[arg(long, default_value = "pan-card")]
        category: DocumentCategory,
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List uploaded documents of a booking, oldest first
    List {
        /// Booking ID
        booking_id: String,
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the KYC checklist of a booking
    Checklist {
        /// Booking ID
        booking_id: String,
    },
    /// Download an uploaded document into the download folder
    Download {
        /// Booking ID
        booking_id: String,
        /// Document record UUID
        record_id: Uuid,
    },
    /// Fetch an uploaded document into a temporary file for viewing
    View {
        /// Booking ID
        booking_id: String,
        /// Document record UUID
        record_id: Uuid,
    },
    /// Generate a booking document as PDF
    Generate {
        /// Booking ID
        booking_id: String,
        #[command(subcommand)]
        document: GenerateCommands,
    },
    /// List the documents issued for a booking and their availability
    Catalog {
        /// Booking ID
        booking_id: String,
    },
    /// Payment milestone progress of a booking
    Summary {
        /// Booking ID
        booking_id: String,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum GenerateCommands {
    /// Statement of accounts
    Soa,
    /// Unit allotment letter
    Allotment,
    /// Agreement to sell
    Agreement,
    /// Tax invoice for one milestone
    Invoice {
        /// Milestone ID
        milestone_id: u32,
    },
}

impl From<GenerateCommands> for DocumentKind {
    fn from(command: GenerateCommands) -> Self {
        match command {
            GenerateCommands::Soa => DocumentKind::StatementOfAccounts,
            GenerateCommands::Allotment => DocumentKind::AllotmentLetter,
            GenerateCommands::Agreement => DocumentKind::AgreementToSell,
            GenerateCommands::Invoice { milestone_id } => DocumentKind::Invoice { milestone_id },
        }
    }
}

fn session_error(err: SessionError) -> anyhow::Error {
    match err {
        SessionError::Rejected(e) => user_error(e),
        other => anyhow::Error::new(other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = PortalConfig::from_env().context("Invalid portal configuration")?;
    let portal = Portal::from_config(config).await?;

    match cli.command {
        Commands::Upload {
            booking_id,
            category,
            files,
        } => {
            let documents = portal.documents(&booking_id)?;
            let mut session = documents.upload_session();
            session.select_category(category).map_err(session_error)?;
            for file in &files {
                session.stage_path(file).await.map_err(session_error)?;
            }

            let report = session.submit().await.map_err(session_error)?;
            print_json(&serde_json::json!({
                "booking_id": booking_id,
                "summary": report.summary(),
                "uploaded": report.uploaded,
                "failed": report
                    .failures
                    .iter()
                    .map(|f| serde_json::json!({ "file": f.file_name, "error": f.error.to_string() }))
                    .collect::<Vec<_>>(),
            }))?;

            if let SessionState::Failed(failure) = session.state() {
                return Err(user_error(failure.error.clone()))
                    .with_context(|| format!("{} ({})", failure.file_name, report.summary()));
            }
        }
        Commands::List { booking_id, format } => {
            let records = portal
                .documents(&booking_id)?
                .list()
                .await
                .map_err(user_error)?;
            match format.as_str() {
                "json" => print_json(&records)?,
                "table" => print!("{}", record_table(&records)),
                other => anyhow::bail!("Unknown format {}, expected json or table", other),
            }
        }
        Commands::Checklist { booking_id } => {
            let checklist = portal
                .documents(&booking_id)?
                .checklist()
                .await
                .map_err(user_error)?;
            print_json(&serde_json::json!({
                "booking_id": booking_id,
                "complete": checklist.complete_count(),
                "pending": checklist.pending_count(),
                "entries": checklist.entries,
            }))?;
        }
        Commands::Download {
            booking_id,
            record_id,
        } => {
            let documents = portal.documents(&booking_id)?;
            let record = documents
                .record(record_id)
                .await
                .map_err(user_error)?
                .with_context(|| format!("Document {} not found in {}", record_id, booking_id))?;
            let path = documents.download(&record).await.map_err(user_error)?;
            print_json(&serde_json::json!({ "saved_to": path }))?;
        }
        Commands::View {
            booking_id,
            record_id,
        } => {
            let documents = portal.documents(&booking_id)?;
            let mut record = documents
                .record(record_id)
                .await
                .map_err(user_error)?
                .with_context(|| format!("Document {} not found in {}", record_id, booking_id))?;
            let path = documents.view(&mut record).await.map_err(user_error)?;
            print_json(&serde_json::json!({ "opened": path }))?;
        }
        Commands::Generate {
            booking_id,
            document,
        } => {
            let booking = portal.booking(&booking_id)?;
            let composer = DocumentComposer::new(Arc::new(SystemClock));
            let composed = composer
                .compose(booking, document.into())
                .map_err(user_error)?;
            let pdf = composed.to_pdf().map_err(user_error)?;
            let path = portal
                .sink()
                .save(&composed.file_name, &pdf)
                .await
                .with_context(|| format!("Failed to save {}", composed.file_name))?;
            print_json(&serde_json::json!({
                "file_name": composed.file_name,
                "saved_to": path,
                "size_bytes": pdf.len(),
                "overflows_page": composed.page.overflows(),
            }))?;
        }
        Commands::Catalog { booking_id } => {
            let booking = portal.booking(&booking_id)?;
            let catalog = DocumentCatalog::for_booking(booking, SystemClock.today());
            print_json(&serde_json::json!({
                "booking_id": booking_id,
                "available": catalog.available_count(),
                "pending": catalog.pending_count(),
                "documents": catalog.documents,
                "invoices": catalog.invoices,
            }))?;
        }
        Commands::Summary { booking_id } => {
            let booking = portal.booking(&booking_id)?;
            print_json(&MilestoneSummary::from_milestones(&booking.milestones))?;
        }
    }

    Ok(())
}
