use std::io::Cursor;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::debug;

use crate::domain::models::workbook::{Sheet, Workbook};
use crate::domain::ports::SpreadsheetDecoder;
use crate::error::AppError;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const CSV_SHEET_NAME: &str = "Sheet1";

/// Workbooks (xlsx, xlsm, xlsb, xls, ods) through calamine; everything else must be delimited text.
pub struct CalamineDecoder;

impl CalamineDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalamineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetDecoder for CalamineDecoder {
    fn decode(&self, bytes: &[u8], file_name: Option<&str>) -> Result<Workbook, AppError> {
        if bytes.is_empty() {
            return Err(AppError::EmptyInput);
        }

        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            debug!("Decoding {:?} as a binary workbook", file_name);
            decode_workbook(bytes)
        } else {
            debug!("Decoding {:?} as delimited text", file_name);
            decode_delimited(bytes)
        }
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Phone numbers typed into Excel come back as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn decode_workbook(bytes: &[u8]) -> Result<Workbook, AppError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::Parse(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| AppError::Parse(format!("sheet '{}': {}", name, e)))?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());

        let headers = rows.next().unwrap_or_default();
        sheets.push(Sheet::new(name, headers, rows.collect()));
    }

    if sheets.is_empty() {
        return Err(AppError::Parse("workbook contains no sheets".into()));
    }

    Ok(Workbook { sheets })
}

/// Spreadsheet exports in comma-decimal locales use `;` as the separator.
fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if tabs > commas && tabs > semicolons {
        b'\t'
    } else if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn decode_delimited(bytes: &[u8]) -> Result<Workbook, AppError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|_| AppError::Parse("file is neither a spreadsheet nor UTF-8 text".into()))?;

    if text.contains('\0') {
        return Err(AppError::Parse("unrecognized binary format".into()));
    }
    if text.trim().is_empty() {
        return Err(AppError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Parse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Workbook {
        sheets: vec![Sheet::new(CSV_SHEET_NAME.to_string(), headers, rows)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    #[test]
    fn test_decodes_csv() {
        let csv = "Nome,Telefone\nMaria Silva,912345678\n,\nJoão,\n";
        let wb = CalamineDecoder::new().decode(csv.as_bytes(), Some("guests.csv")).unwrap();

        assert_eq!(wb.sheet_names(), vec!["Sheet1"]);
        let sheet = &wb.sheets[0];
        assert_eq!(sheet.headers, vec!["Nome", "Telefone"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0], vec!["Maria Silva", "912345678"]);
    }

    #[test]
    fn test_decodes_semicolon_csv_with_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Name;Email\nAna;ana@example.com\n".as_bytes());
        let wb = CalamineDecoder::new().decode(&bytes, None).unwrap();
        assert_eq!(wb.sheets[0].headers, vec!["Name", "Email"]);
        assert_eq!(wb.sheets[0].rows[0], vec!["Ana", "ana@example.com"]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        let decoder = CalamineDecoder::new();
        assert!(matches!(decoder.decode(b"", None), Err(AppError::EmptyInput)));
        assert!(matches!(decoder.decode(b"  \n ", None), Err(AppError::EmptyInput)));
        assert!(matches!(decoder.decode(&[0xff, 0xfe, 0x00, 0x01], None), Err(AppError::Parse(_))));
        assert!(matches!(decoder.decode(b"PK\x03\x04not really a zip", None), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_decodes_multi_sheet_xlsx() {
        let mut book = XlsxWorkbook::new();
        let guests = book.add_worksheet();
        guests.set_name("Guests").unwrap();
        guests.write_string(0, 0, "Name").unwrap();
        guests.write_string(0, 1, "Phone").unwrap();
        guests.write_string(1, 0, "Ana").unwrap();
        guests.write_number(1, 1, 912345678.0).unwrap();

        let vendors = book.add_worksheet();
        vendors.set_name("Vendors").unwrap();
        vendors.write_string(0, 0, "Company").unwrap();

        let bytes = book.save_to_buffer().unwrap();
        let wb = CalamineDecoder::new().decode(&bytes, Some("list.xlsx")).unwrap();

        assert_eq!(wb.sheet_names(), vec!["Guests", "Vendors"]);
        assert!(wb.requires_sheet_selection());
        let sheet = wb.sheet("Guests").unwrap();
        assert_eq!(sheet.rows[0], vec!["Ana", "912345678"]);
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a;b;c\n1,2;3"), b';');
        assert_eq!(sniff_delimiter("a,b\n"), b',');
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter(""), b',');
    }
}
