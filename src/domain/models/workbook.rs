use serde::{Deserialize, Serialize};

/// One decoded table. `rows` are aligned with `headers`; short rows are padded on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Builds a sheet from a raw header row, giving blank or repeated headers distinct names.
    pub fn new(name: String, raw_headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut headers: Vec<String> = Vec::with_capacity(raw_headers.len());
        for raw in raw_headers {
            let base = match raw.trim() {
                "" => "__EMPTY".to_string(),
                trimmed => trimmed.to_string(),
            };
            let mut candidate = base.clone();
            let mut n = 1;
            while headers.contains(&candidate) {
                candidate = format!("{}_{}", base, n);
                n += 1;
            }
            headers.push(candidate);
        }

        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();

        Self { name, headers, rows }
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn cell<'a>(&self, row: &'a [String], header: &str) -> Option<&'a str> {
        self.column_index(header)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn requires_sheet_selection(&self) -> bool {
        self.sheets.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_blank_and_duplicate_headers_get_distinct_names() {
        let sheet = Sheet::new("Sheet1".into(), s(&["Name", "", "Name", " "]), vec![]);
        assert_eq!(sheet.headers, s(&["Name", "__EMPTY", "Name_1", "__EMPTY_1"]));
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let sheet = Sheet::new(
            "Sheet1".into(),
            s(&["Name", "Phone"]),
            vec![s(&["Ana", "1"]), s(&["", "  "]), s(&["", "2"])],
        );
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn test_cell_lookup_tolerates_short_rows() {
        let sheet = Sheet::new("Sheet1".into(), s(&["Name", "Phone"]), vec![s(&["Ana"])]);
        let row = &sheet.rows[0];
        assert_eq!(sheet.cell(row, "Name"), Some("Ana"));
        assert_eq!(sheet.cell(row, "Phone"), None);
        assert_eq!(sheet.cell(row, "Missing"), None);
    }
}
