use crate::drivers::PipelineError;
/// One parsed line of the source table: a timestamp plus one reading per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRow {
    pub time: f64,
    pub readings: Vec<f64>,
}
/// Rows in file order. Never mutated after parsing; a new import replaces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleTable {
    pub rows: Vec<SampleRow>,
}
impl SampleTable {
    pub fn new(rows: Vec<SampleRow>) -> Self {
        Self { rows }
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// Widest row seen, in readings (time column excluded).
    pub fn channel_count(&self) -> usize {
        self.rows.iter().map(|r| r.readings.len()).max().unwrap_or(0)
    }
}
/// Strict parser for the bundled data file. Every field must be a float.
pub fn parse_bundled(text: &str) -> Result<SampleTable, PipelineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(SampleTable::default());
    }
    let mut rows = Vec::new();
    for (line_no, line) in trimmed.split('\n').enumerate() {
        let line = line.trim_end_matches('\r');
        let mut fields = line.split(',');
        let time = parse_float(fields.next().unwrap_or_default(), line_no + 1)?;
        let readings = fields
            .map(|f| parse_float(f, line_no + 1))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(SampleRow { time, readings });
    }
    Ok(SampleTable::new(rows))
}
fn parse_float(field: &str, line_no: usize) -> Result<f64, PipelineError> {
    field.trim().parse::<f64>().map_err(|_| {
        PipelineError::LoadFailure(format!("line {line_no}: `{}` is not a number", field.trim()))
    })
}
/// Cell value after type inference.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Number(f64),
    Bool(bool),
    Empty,
    Text(String),
}
impl Cell {
    pub fn infer(raw: &str) -> Self {
        let t = raw.trim();
        if t.is_empty() {
            return Cell::Empty;
        }
        match t {
            "true" | "TRUE" | "True" => return Cell::Bool(true),
            "false" | "FALSE" | "False" => return Cell::Bool(false),
            _ => {}
        }
        match t.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(t.to_string()),
        }
    }
    /// Numeric view used by the chart; text and blanks become gaps.
    pub fn as_reading(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Bool(true) => 1.0,
            Cell::Bool(false) => 0.0,
            Cell::Empty | Cell::Text(_) => f64::NAN,
        }
    }
}
/// Lenient parser for user-supplied files.
///
/// Quoted fields may contain commas, newlines and doubled quotes. Rows with a
/// single column (including blank lines) are discarded.
pub fn parse_manual(bytes: &[u8]) -> Result<SampleTable, PipelineError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| PipelineError::ManualParseFailure(format!("not UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let records = split_records(text)?;
    let rows: Vec<SampleRow> = records
        .into_iter()
        .filter(|cells| cells.len() > 1)
        .map(|cells| {
            let mut cells = cells.iter().map(|c| Cell::infer(c));
            let time = cells.next().map(|c| c.as_reading()).unwrap_or(f64::NAN);
            SampleRow {
                time,
                readings: cells.map(|c| c.as_reading()).collect(),
            }
        })
        .collect();
    if rows.is_empty() {
        return Err(PipelineError::ManualParseFailure(
            "no rows with more than one column".into(),
        ));
    }
    Ok(SampleTable::new(rows))
}
fn split_records(text: &str) -> Result<Vec<Vec<String>>, PipelineError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err(PipelineError::ManualParseFailure(
            "unterminated quoted field".into(),
        ));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn bundled_rows_keep_order_and_width() {
        let table = parse_bundled("0.0,1,2\n0.005,3,4\r\n0.01,5,6\n\n").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.channel_count(), 2);
        assert_eq!(table.rows[1].time, 0.005);
        assert_eq!(table.rows[2].readings, vec![5.0, 6.0]);
    }
    #[test]
    fn bundled_rejects_malformed_field() {
        let err = parse_bundled("0.0,1,2\n0.005,abc,4").unwrap_err();
        match err {
            PipelineError::LoadFailure(msg) => assert!(msg.contains("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
    #[test]
    fn bundled_empty_text_is_empty_table() {
        assert!(parse_bundled("  \n ").unwrap().is_empty());
    }
    #[test]
    fn manual_infers_cells_and_drops_single_column_rows() {
        let bytes = b"0.0,1.5,true,\n\nlonely\n0.1,\"2,5\",x,3\n";
        let table = parse_manual(bytes).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].readings[0], 1.5);
        assert_eq!(table.rows[0].readings[1], 1.0);
        assert!(table.rows[0].readings[2].is_nan());
        assert!(table.rows[1].readings[0].is_nan());
        assert_eq!(table.rows[1].readings[2], 3.0);
    }
    #[test]
    fn manual_rejects_unterminated_quote() {
        let err = parse_manual(b"0.0,\"1,2\n").unwrap_err();
        assert!(matches!(err, PipelineError::ManualParseFailure(_)));
    }
    #[test]
    fn manual_rejects_file_without_usable_rows() {
        let err = parse_manual(b"one\ntwo\n").unwrap_err();
        assert!(matches!(err, PipelineError::ManualParseFailure(_)));
    }
    #[test]
    fn cell_inference() {
        assert_eq!(Cell::infer(" 2.5 "), Cell::Number(2.5));
        assert_eq!(Cell::infer("false"), Cell::Bool(false));
        assert_eq!(Cell::infer(""), Cell::Empty);
        assert_eq!(Cell::infer("NaN"), Cell::Text("NaN".into()));
    }
}
