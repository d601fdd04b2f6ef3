//! Image summary parsed from `docker inspect` output.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{ImageError, ImageResult};

/// Placeholder for a size the engine did not report.
pub const MISSING_SIZE: &str = "-";

/// Human-oriented view of a built image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Repository name
    pub image_name: String,
    /// Tag the image was built and inspected under
    pub tag: String,
    /// Image ID (content digest)
    pub id: String,
    /// Operating system the image targets
    pub os: String,
    /// Author recorded in the image config
    pub author: String,
    /// Human-readable size
    pub size: String,
    /// Human-readable virtual size, or [`MISSING_SIZE`]
    pub virtual_size: String,
    /// Creation time in the local timezone
    pub created: String,
}

impl ImageSummary {
    /// Assemble a summary from a single inspect record.
    pub fn from_record(
        image_name: impl Into<String>,
        tag: impl Into<String>,
        record: InspectRecord,
    ) -> ImageResult<Self> {
        let created = format_created(&record.created)?;
        let virtual_size = match record.virtual_size {
            Some(bytes) if bytes > 0 => format_size(bytes),
            _ => MISSING_SIZE.to_string(),
        };

        Ok(Self {
            image_name: image_name.into(),
            tag: tag.into(),
            id: record.id,
            os: record.os,
            author: record.author,
            size: format_size(record.size),
            virtual_size,
            created,
        })
    }

    /// Full image reference (`repository:tag`).
    pub fn reference(&self) -> String {
        format!("{}:{}", self.image_name, self.tag)
    }
}

impl std::fmt::Display for ImageSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Image:        {}", self.reference())?;
        writeln!(f, "ID:           {}", self.id)?;
        writeln!(f, "OS:           {}", self.os)?;
        writeln!(f, "Author:       {}", self.author)?;
        writeln!(f, "Size:         {}", self.size)?;
        writeln!(f, "Virtual size: {}", self.virtual_size)?;
        write!(f, "Created:      {}", self.created)
    }
}

/// The fields of one `docker inspect` array element that the summary uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectRecord {
    pub id: String,
    pub os: String,
    #[serde(default)]
    pub author: String,
    pub size: u64,
    /// Dropped by newer engine API versions.
    #[serde(default)]
    pub virtual_size: Option<u64>,
    pub created: String,
}

/// Parse `docker inspect` output, which must be a JSON array holding exactly
/// one image.
pub fn parse_inspect(output: &str) -> ImageResult<InspectRecord> {
    let records: Vec<InspectRecord> = serde_json::from_str(output.trim())
        .map_err(|e| ImageError::InspectParse(format!("invalid inspect JSON: {}", e)))?;

    let count = records.len();
    let mut records = records.into_iter();
    match (records.next(), records.next()) {
        (Some(record), None) => Ok(record),
        (None, _) => Err(ImageError::InspectParse(
            "inspect returned no image metadata".to_string(),
        )),
        _ => Err(ImageError::InspectParse(format!(
            "expected metadata for exactly one image, got {}",
            count
        ))),
    }
}

const SIZE_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Render a byte count with decimal units and three significant digits,
/// e.g. `4_200_000_000` as `"4.2 GB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} B", bytes);
    }

    let mut exponent = 0;
    let mut whole = bytes;
    while whole >= 1000 && exponent < SIZE_UNITS.len() - 1 {
        whole /= 1000;
        exponent += 1;
    }

    // Rounding can carry into a fourth integer digit (999.9 kB -> "1000");
    // move up one unit when it does.
    let mut rendered = render_significant(bytes, exponent);
    if exponent < SIZE_UNITS.len() - 1 && rendered.len() > 3 && !rendered.contains('.') {
        exponent += 1;
        rendered = render_significant(bytes, exponent);
    }

    format!("{} {}", rendered, SIZE_UNITS[exponent])
}

/// `bytes` scaled by `1000^exponent`, rounded to three significant digits
/// with trailing zeros dropped.
fn render_significant(bytes: u64, exponent: usize) -> String {
    let value = bytes as f64 / 1000f64.powi(exponent as i32);
    let integer_digits = (value.trunc() as u64).to_string().len();
    let decimals = 3usize.saturating_sub(integer_digits);
    let rendered = format!("{:.*}", decimals, value);
    if rendered.contains('.') {
        rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        rendered
    }
}

/// Convert an RFC 3339 instant to a local, human-readable timestamp.
pub fn format_created(raw: &str) -> ImageResult<String> {
    let instant = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| ImageError::InspectParse(format!("invalid Created timestamp {:?}: {}", raw, e)))?;
    Ok(format_timestamp(&instant.with_timezone(&Local)))
}

fn format_timestamp<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
