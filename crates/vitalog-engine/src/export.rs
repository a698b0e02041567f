use std::io::Write;

use vitalog_types::HealthRecord;

use crate::error::Result;

/// Write records as delimited text: one header row of field names in
/// declaration order, then one row per record. A pure projection; the rows
/// come out exactly as ordered by the caller.
pub fn write_csv<W: Write>(records: &[HealthRecord], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HealthRecord::FIELD_NAMES)?;
    for record in records {
        out.write_record(&[
            record.id.to_string(),
            record.timestamp.to_string(),
            record.sleep.to_string(),
            record.water.to_string(),
            record.stress.to_string(),
            record.energy.to_string(),
            record.discomfort.clone(),
            record.food_quality.to_string(),
        ])?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Convenience wrapper producing the export as a string.
pub fn to_csv_string(records: &[HealthRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
