use crate::error::CliError;
use engine_core::{engine::LoopState, state::models::CursorCheckpoint};
use model::{pagination::cursor::Cursor, records::transaction::CanonicalTransaction};
use serde::Serialize;

/// Per-partner section of the `sync` output.
#[derive(Debug, Serialize)]
pub struct PartnerReport {
    pub partner: String,
    pub state: Option<LoopState>,
    pub cursor: Option<Cursor>,
    pub error: Option<String>,
    pub transactions: Vec<CanonicalTransaction>,
}

fn to_json(reports: &[PartnerReport]) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(reports)?)
}

pub async fn write_report(reports: &[PartnerReport], path: &str) -> Result<(), CliError> {
    let json = to_json(reports)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

pub fn print_report(reports: &[PartnerReport]) -> Result<(), CliError> {
    println!("{}", to_json(reports)?);
    Ok(())
}

pub fn print_checkpoint_table(checkpoints: &[CursorCheckpoint]) {
    println!(
        "{:<12} {:<28} {:<18} {:>6} {:>6}  {}",
        "Partner", "Cursor", "State", "Txs", "Pages", "Updated"
    );
    println!("{}", "-".repeat(100));
    for cp in checkpoints {
        println!(
            "{:<12} {:<28} {:<18} {:>6} {:>6}  {}",
            cp.partner_id,
            cp.cursor.to_string(),
            cp.state.as_str(),
            cp.transactions,
            cp.pages,
            cp.updated_at.to_rfc3339()
        );
    }
}
