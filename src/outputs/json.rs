//! JSON output: the record array and, optionally, extracted article bodies.
//!
//! Both files are pretty-printed with a 4-space indent so they diff cleanly.

use crate::error::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `value` as pretty JSON with 4-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let bytes = to_pretty_json(value)?;
    fs::write(path, &bytes).await?;
    info!(bytes = bytes.len(), "Wrote JSON file");
    Ok(())
}
