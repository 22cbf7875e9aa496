// CSV import for the customer records

use std::io::Read;
use std::path::Path;

use clvchat_engine::{prepare, Prepared, RawTable};

use crate::error::LoadError;

/// Read, parse and clean a records file.
///
/// `delimiter = None` sniffs the delimiter from the first lines. Only an
/// unreadable file or a CSV syntax error fails; bad cell values are coerced
/// to missing by [`prepare`].
pub fn load(path: &Path, delimiter: Option<u8>) -> Result<Prepared, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    let raw = parse_raw(&content, delimiter).map_err(|e| LoadError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!(
        "read {} row(s), {} column(s) from {}",
        raw.rows.len(),
        raw.headers.len(),
        path.display()
    );
    Ok(prepare(raw))
}

/// Split CSV text into a header row and string cells. Every field stays a
/// string; rows may be shorter or longer than the header.
pub fn parse_raw(content: &str, delimiter: u8) -> Result<RawTable, csv::Error> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Delimiter guess for `--delimiter auto`.
///
/// A candidate must split the header into at least two fields. Among those,
/// the one whose field count is repeated by the most sample rows wins, then
/// the wider split; remaining ties keep candidate order (`;` first).
pub fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b';', b'\t', b',', b'|'];

    let mut lines = content.lines().filter(|l| !l.trim().is_empty()).take(10);
    let Some(header) = lines.next() else {
        return crate::DEFAULT_DELIMITER;
    };
    let sample: Vec<&str> = lines.collect();

    CANDIDATES
        .iter()
        .rev()
        .filter_map(|&delimiter| {
            let width = field_count(header, delimiter);
            if width < 2 {
                return None;
            }
            let agreeing = sample.iter().filter(|line| field_count(line, delimiter) == width).count();
            Some((delimiter, (agreeing, width)))
        })
        // Iterating in reverse makes the earliest candidate the last maximum
        .max_by_key(|&(_, score)| score)
        .map_or(crate::DEFAULT_DELIMITER, |(delimiter, _)| delimiter)
}

/// Fields in one line, honoring quotes.
fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(0, |record| record.len())
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let read_err = |e: std::io::Error| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Spreadsheet exports are commonly Windows-1252
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            log::debug!("{} is not UTF-8, decoded as Windows-1252", path.display());
            Ok(decoded.into_owned())
        }
    }
}
