// Primitives for reading delimited text tables.

use log::debug;
use snafu::prelude::*;
use topsis::DecisionTable;

use crate::app::*;

/// Reads a delimited table. The first row is the header, the first column the identifier.
///
/// All the rows must have as many fields as the header.
pub fn read_csv_table(path: &str, delimiter: u8) -> AppResult<DecisionTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .context(CsvParseSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvParseSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", header);

    let mut table = DecisionTable::new(header);
    for (idx, line_r) in rdr.records().enumerate() {
        let line = line_r.context(CsvParseSnafu { path })?;
        // The header is line 1.
        debug!("read_csv_table: lineno: {:?} row: {:?}", idx + 2, line);
        let id = line.get(0).unwrap_or_default();
        let values: Vec<String> = line.iter().skip(1).map(|s| s.to_string()).collect();
        table.push(id, &values);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("t.csv");
        fs::write(&p, "Model,Price,Storage\nA, 250,16\n\nB,200,16.0\n").unwrap();
        let t = read_csv_table(p.to_str().unwrap(), b',').unwrap();
        assert_eq!(t.header, vec!["Model", "Price", "Storage"]);
        assert_eq!(t.alternatives.len(), 2);
        assert_eq!(t.alternatives[0].id, "A");
        assert_eq!(t.alternatives[0].values, vec![" 250", "16"]);
        assert_eq!(t.alternatives[1].values, vec!["200", "16.0"]);
    }

    #[test]
    fn quoted_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("t.csv");
        fs::write(&p, "Name;X;Y\n\"Smith; Jones\";1;2\n").unwrap();
        let t = read_csv_table(p.to_str().unwrap(), b';').unwrap();
        assert_eq!(t.alternatives[0].id, "Smith; Jones");
    }

    #[test]
    fn empty_file_has_no_columns() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("t.csv");
        fs::write(&p, "").unwrap();
        let t = read_csv_table(p.to_str().unwrap(), b',').unwrap();
        assert_eq!(t.num_columns(), 0);
    }
}
