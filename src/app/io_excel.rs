use calamine::{open_workbook, DataType, Reader, Xlsx};
use log::debug;
use snafu::prelude::*;
use topsis::DecisionTable;

use crate::app::*;

/// Reads a decision table from an Excel workbook.
///
/// The first worksheet is used unless a name is given. The first row is the header.
/// Rows where every cell is empty are skipped.
pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> AppResult<DecisionTable> {
    let wrange = get_range(path, worksheet)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(cell_text)
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let mut table = DecisionTable::new(header);
    for (idx, row) in iter.enumerate() {
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            debug!("read_excel_table: skipping empty row {:?}", idx + 2);
            continue;
        }
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        debug!("read_excel_table: idx: {:?} row: {:?}", idx + 2, cells);
        let (id, values) = match cells.split_first() {
            Some((id, values)) => (id.clone(), values.to_vec()),
            None => continue,
        };
        table.push(&id, &values);
    }
    Ok(table)
}

fn get_range(path: &str, worksheet: Option<&str>) -> AppResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet {
        workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                worksheet: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })
    }
}

// Numbers go through the f64 formatting, so that 250.0 is read as "250".
fn cell_text(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook() -> String {
        format!(
            "{}/tests/data/excel_phones/phones.xlsx",
            env!("CARGO_MANIFEST_DIR")
        )
    }

    #[test]
    fn first_worksheet_by_default() {
        let t = read_excel_table(&workbook(), None).unwrap();
        assert_eq!(t.header, vec!["Model", "Price", "Storage"]);
        // Row 4 of the sheet is empty.
        let ids: Vec<&str> = t.alternatives.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(t.alternatives[2].values, vec!["300", "32"]);
    }

    #[test]
    fn worksheet_by_name() {
        let t = read_excel_table(&workbook(), Some("Laptops")).unwrap();
        assert_eq!(t.header, vec!["Model", "Price", "RAM", "Rating"]);
        assert_eq!(t.alternatives.len(), 2);
        assert_eq!(t.alternatives[0].values, vec!["1200", "16", "4.5"]);
    }

    #[test]
    fn missing_worksheet() {
        assert!(matches!(
            read_excel_table(&workbook(), Some("Tablets")),
            Err(TopsisAppError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn cells_as_text() {
        assert_eq!(cell_text(&DataType::Float(250.0)), "250");
        assert_eq!(cell_text(&DataType::Float(0.25)), "0.25");
        assert_eq!(cell_text(&DataType::Int(16)), "16");
        assert_eq!(cell_text(&DataType::String("M1".to_string())), "M1");
        assert_eq!(cell_text(&DataType::Empty), "");
    }
}
