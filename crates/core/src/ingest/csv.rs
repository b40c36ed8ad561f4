use crate::errors::DataContractError;
use crate::ingest::SourceKind;

/// A header row plus data rows. Cells are trimmed; blank lines are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CsvTable {
    kind: SourceKind,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub(crate) fn parse(kind: SourceKind, raw: &str) -> Result<Self, DataContractError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let mut records = split_records(raw)
            .map_err(|message| DataContractError::Malformed { kind, message })?
            .into_iter()
            .filter(|record| !(record.len() == 1 && record[0].is_empty()));

        let headers = records.next().ok_or_else(|| DataContractError::Malformed {
            kind,
            message: "file has no header row".to_string(),
        })?;

        Ok(Self { kind, headers, rows: records.collect() })
    }

    /// Resolves every named column to its index or fails on the first one missing.
    pub(crate) fn require_columns<const N: usize>(
        &self,
        names: [&str; N],
    ) -> Result<[usize; N], DataContractError> {
        let mut indexes = [0; N];
        for (slot, name) in indexes.iter_mut().zip(names) {
            *slot = self.column(name).ok_or_else(|| DataContractError::MissingColumn {
                kind: self.kind,
                column: name.to_string(),
            })?;
        }
        Ok(indexes)
    }

    pub(crate) fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        // Row numbers are 1-based and count the header as row 1.
        self.rows.iter().enumerate().map(|(index, cells)| CsvRow {
            kind: self.kind,
            line: index + 2,
            cells,
        })
    }
}

pub(crate) struct CsvRow<'a> {
    kind: SourceKind,
    line: usize,
    cells: &'a [String],
}

impl<'a> CsvRow<'a> {
    pub(crate) fn text(&self, index: usize) -> &'a str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn number(&self, index: usize, column: &str) -> Result<f64, DataContractError> {
        let value = self.text(index);
        value.parse::<f64>().map_err(|_| DataContractError::Malformed {
            kind: self.kind,
            message: format!("row {}: `{column}` value `{value}` is not a number", self.line),
        })
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }
}

fn split_records(raw: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if matches!(chars.peek(), Some('"')) => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                other => cell.push(other),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut cell).trim().to_string()),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut cell).trim().to_string());
                records.push(std::mem::take(&mut record));
            }
            other => cell.push(other),
        }
    }

    if in_quotes {
        return Err("unterminated quoted cell".to_string());
    }
    if !cell.is_empty() || !record.is_empty() {
        record.push(cell.trim().to_string());
        records.push(record);
    }

    Ok(records)
}
