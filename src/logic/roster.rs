//! Roster import from CSV (`first_name,last_name,weight_class,grade`).

use crate::models::{DualMeet, MeetError, Side, WeightClass};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct RosterRow {
    first_name: String,
    last_name: String,
    #[serde(default)]
    weight_class: Option<WeightClass>,
    #[serde(default)]
    grade: Option<u8>,
}

/// Import wrestlers into one team's roster (Setup only). Returns how many were added.
///
/// All-or-nothing: a malformed row, an unknown weight class, or a duplicate name leaves the
/// roster unchanged.
pub fn import_roster_csv<R: Read>(meet: &mut DualMeet, side: Side, reader: R) -> Result<usize, MeetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| MeetError::RosterImport {
            line: 1,
            message: e.to_string(),
        })?
        .clone();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| MeetError::RosterImport {
            line: e.position().map_or(0, |p| p.line()),
            message: e.to_string(),
        })?;
        // blank lines are skipped by the reader, so keep the line it reports
        let line = record.position().map_or(0, |p| p.line());
        let row: RosterRow = record
            .deserialize(Some(&headers))
            .map_err(|e| MeetError::RosterImport {
                line,
                message: e.to_string(),
            })?;
        rows.push((line, row));
    }

    // work on a copy so a failure part way leaves the meet untouched
    let mut staged = meet.clone();
    for (line, row) in &rows {
        staged
            .add_wrestler(side, &row.first_name, &row.last_name, row.weight_class, row.grade)
            .map_err(|e| match e {
                MeetError::InvalidState => MeetError::InvalidState,
                other => MeetError::RosterImport {
                    line: *line,
                    message: other.to_string(),
                },
            })?;
    }
    *meet.team_mut(side) = staged.team(side).clone();

    log::info!(
        "Imported {} wrestler(s) into {} roster of meet {}",
        rows.len(),
        meet.team(side).name,
        meet.id
    );
    Ok(rows.len())
}
