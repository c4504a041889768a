use crate::core::Storage;
use crate::domain::model::{Contact, ContactRow};
use crate::utils::error::{DirectoryError, Result};
use csv::{ReaderBuilder, StringRecord};

/// Column order of the contact exports.
pub const CONTACT_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "email",
    "phone",
    "department",
    "country",
    "company",
    "follow_up",
    "turnover_k",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    pub delimiter: char,
    pub has_header: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| DirectoryError::InvalidConfigValueError {
            field: "delimiter".to_string(),
            value: delimiter.to_string(),
            reason: "Delimiter must be a single ASCII character".to_string(),
        })
}

fn parse_i64_or_zero(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

/// Maps one delimited row onto the contact columns. Rows with fewer than nine
/// fields yield `None`; extra fields are ignored.
pub fn row_from_record(record: &StringRecord) -> Option<ContactRow> {
    if record.len() < CONTACT_COLUMNS.len() {
        return None;
    }

    let field = |i: usize| record.get(i).unwrap_or_default().to_string();

    Some(ContactRow {
        id: field(0),
        name: field(1),
        email: field(2),
        phone: field(3),
        department: field(4),
        country: field(5),
        company: field(6),
        follow_up: record
            .get(7)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
        turnover_k: record.get(8).map(parse_i64_or_zero).unwrap_or(0),
    })
}

/// Parses contact rows from delimited text, keeping file order and identity
/// duplicates. Short rows, undecodable rows and rows with a blank email are
/// skipped.
pub fn parse_contacts(data: &[u8], options: &LoaderOptions) -> Result<Vec<Contact>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter_byte(options.delimiter)?)
        .has_headers(options.has_header)
        .flexible(true)
        // 每行直接依分隔符切開，引號視為一般字元
        .quoting(false)
        .from_reader(data);

    let mut contacts = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping unreadable row {}: {}", index + 1, e);
                continue;
            }
        };

        let Some(row) = row_from_record(&record) else {
            tracing::debug!(
                "Skipping row {}: expected {} fields, found {}",
                index + 1,
                CONTACT_COLUMNS.len(),
                record.len()
            );
            continue;
        };

        match Contact::new(row) {
            Ok(contact) => contacts.push(contact),
            Err(e) => tracing::warn!("Skipping row {}: {}", index + 1, e),
        }
    }

    Ok(contacts)
}

/// Splits a flat blob on a single delimiter. Line breaks are ignored and every
/// token is trimmed; the trailing token is always kept.
pub fn split_delimited(text: &str, delimiter: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();

    for c in text.chars() {
        match c {
            '\n' | '\r' => continue,
            c if c == delimiter => {
                tokens.push(token.trim().to_string());
                token.clear();
            }
            c => token.push(c),
        }
    }
    tokens.push(token.trim().to_string());

    tokens
}

pub struct ContactLoader<'a, S: Storage> {
    storage: &'a S,
    options: LoaderOptions,
}

impl<'a, S: Storage> ContactLoader<'a, S> {
    pub fn new(storage: &'a S, options: LoaderOptions) -> Self {
        Self { storage, options }
    }

    pub fn load(&self, path: &str) -> Result<Vec<Contact>> {
        let data = self.storage.read_file(path)?;
        let contacts = parse_contacts(&data, &self.options)?;
        tracing::debug!("Loaded {} contacts from {}", contacts.len(), path);
        Ok(contacts)
    }

    /// Loads every source in order. A source that cannot be read is logged
    /// and skipped so the remaining sources still load.
    pub fn load_all(&self, paths: &[String]) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for path in paths {
            match self.load(path) {
                Ok(mut loaded) => {
                    tracing::info!("📄 {}: {} contacts", path, loaded.len());
                    contacts.append(&mut loaded);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Skipping source {}: {}", path, e);
                    tracing::warn!("💡 {}", e.recovery_suggestion());
                }
            }
        }

        contacts
    }

    pub fn read_delimited_tokens(&self, path: &str) -> Result<Vec<String>> {
        let data = self.storage.read_file(path)?;
        let text = String::from_utf8(data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(split_delimited(&text, self.options.delimiter))
    }
}
