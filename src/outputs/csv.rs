//! CSV table of collected records.

use crate::error::Result;
use crate::models::ArticleRecord;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Render records as CSV with a header row of field names.
pub fn to_csv(records: &[ArticleRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_csv(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let bytes = to_csv(records)?;
    fs::write(path, bytes).await?;
    info!("Wrote CSV file");
    Ok(())
}
