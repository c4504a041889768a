use crate::utils::error::{DirectoryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Raw column values of one contact row, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub country: String,
    pub company: String,
    pub follow_up: bool,
    pub turnover_k: i64,
}

/// One directory entry.
///
/// Equality and hashing only look at the normalised (trimmed, lower-case)
/// email, so two contacts with the same address are the same entity even if
/// every other field differs.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) department: String,
    pub(crate) country: String,
    pub(crate) company: String,
    pub(crate) follow_up: bool,
    pub(crate) turnover_k: i64,
}

impl Contact {
    /// Fails when the email is empty after trimming. The stored email is
    /// trimmed, all other fields are kept as given.
    pub fn new(row: ContactRow) -> Result<Self> {
        let email = row.email.trim();
        if email.is_empty() {
            return Err(DirectoryError::InvalidContact {
                reason: format!("email cannot be empty (id '{}')", row.id),
            });
        }

        Ok(Self {
            email: email.to_string(),
            id: row.id,
            name: row.name,
            phone: row.phone,
            department: row.department,
            country: row.country,
            company: row.company,
            follow_up: row.follow_up,
            turnover_k: row.turnover_k,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn is_follow_up(&self) -> bool {
        self.follow_up
    }

    pub fn turnover_k(&self) -> i64 {
        self.turnover_k
    }

    pub fn normalised_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    /// Lower-cased part after the first `@`, or empty when there is none.
    pub fn email_domain(&self) -> String {
        match self.email.split_once('@') {
            Some((_, domain)) if !domain.is_empty() => domain.to_lowercase(),
            _ => String::new(),
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Same invariant as [`Contact::new`]: a blank email is rejected.
    pub fn with_email(self, email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(DirectoryError::InvalidContact {
                reason: format!("email cannot be empty (id '{}')", self.id),
            });
        }
        Ok(Self {
            email: email.trim().to_string(),
            ..self
        })
    }

    pub fn to_row(&self) -> ContactRow {
        ContactRow {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            department: self.department.clone(),
            country: self.country.clone(),
            company: self.company.clone(),
            follow_up: self.follow_up,
            turnover_k: self.turnover_k,
        }
    }
}

impl TryFrom<ContactRow> for Contact {
    type Error = DirectoryError;

    fn try_from(row: ContactRow) -> Result<Self> {
        Contact::new(row)
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.normalised_email() == other.normalised_email()
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalised_email().hash(state);
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.id, self.name, self.email)
    }
}

/// Counts shown in the statistics table of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub raw_count: usize,
    pub unique_count: usize,
    pub duplicate_count: usize,
    pub follow_up_count: usize,
    pub total_turnover_k: i64,
}

impl DirectoryStats {
    pub fn collect(raw_count: usize, unique: &[Contact]) -> Self {
        let unique_count = unique.len();
        Self {
            raw_count,
            unique_count,
            duplicate_count: raw_count.saturating_sub(unique_count),
            follow_up_count: unique.iter().filter(|c| c.is_follow_up()).count(),
            total_turnover_k: total_turnover(unique),
        }
    }
}

/// Sum of turnover, clamped to the `i64` range instead of overflowing.
fn total_turnover(contacts: &[Contact]) -> i64 {
    let turnovers = contacts.iter().map(Contact::turnover_k);
    turnovers
        .clone()
        .try_fold(0i64, i64::checked_add)
        .unwrap_or_else(|| {
            tracing::warn!("Total turnover exceeds the i64 range, clamping");
            turnovers.fold(0i64, i64::saturating_add)
        })
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Formatted contacts, sorted for the report.
    pub formatted: Vec<Contact>,
    /// Deduplicated contacts before formatting.
    pub unique: Vec<Contact>,
    pub stats: DirectoryStats,
}

#[cfg(test)]
pub(crate) fn sample_row(id: &str, name: &str, email: &str) -> ContactRow {
    ContactRow {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: "+353 1 234-5678".to_string(),
        department: "Sales".to_string(),
        country: "Ireland".to_string(),
        company: "Acme".to_string(),
        follow_up: false,
        turnover_k: 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_trims_email_and_keeps_other_fields() {
        let mut row = sample_row(" 7 ", "  Ann Lee ", "  Ann@Example.com  ");
        row.follow_up = true;
        row.turnover_k = 250;

        let contact = Contact::new(row).unwrap();

        assert_eq!(contact.id(), " 7 ");
        assert_eq!(contact.name(), "  Ann Lee ");
        assert_eq!(contact.email(), "Ann@Example.com");
        assert_eq!(contact.phone(), "+353 1 234-5678");
        assert_eq!(contact.department(), "Sales");
        assert_eq!(contact.country(), "Ireland");
        assert_eq!(contact.company(), "Acme");
        assert!(contact.is_follow_up());
        assert_eq!(contact.turnover_k(), 250);
    }

    #[test]
    fn test_new_rejects_blank_email() {
        let err = Contact::new(sample_row("1", "Ann", "   ")).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidContact { .. }));

        assert!(Contact::try_from(sample_row("2", "Bob", "")).is_err());
    }

    #[test]
    fn test_equality_uses_normalised_email() {
        let a = Contact::new(sample_row("1", "Ann", "ann@example.com")).unwrap();
        let mut other = sample_row("99", "Someone Else", " ANN@Example.COM ");
        other.department = "IT".to_string();
        let b = Contact::new(other).unwrap();
        let c = Contact::new(sample_row("3", "Ann", "ann@example.org")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Contact> = vec![a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_email_domain() {
        let contact = Contact::new(sample_row("1", "Ann", "ann@Example.COM")).unwrap();
        assert_eq!(contact.email_domain(), "example.com");

        let no_at = Contact::new(sample_row("2", "Bob", "bob")).unwrap();
        assert_eq!(no_at.email_domain(), "");

        let trailing_at = Contact::new(sample_row("3", "Cy", "cy@")).unwrap();
        assert_eq!(trailing_at.email_domain(), "");
    }

    #[test]
    fn test_with_email_keeps_invariant() {
        let contact = Contact::new(sample_row("1", "Ann", "ann@example.com")).unwrap();
        assert!(contact.clone().with_email("  ").is_err());

        let updated = contact.with_email(" new@example.com ").unwrap();
        assert_eq!(updated.email(), "new@example.com");
        assert_eq!(updated.name(), "Ann");
    }

    #[test]
    fn test_stats_collect() {
        let mut flagged = sample_row("1", "Ann", "ann@example.com");
        flagged.follow_up = true;
        flagged.turnover_k = 100;
        let unique = vec![
            Contact::new(flagged).unwrap(),
            Contact::new(sample_row("2", "Bob", "bob@example.com")).unwrap(),
        ];

        let stats = DirectoryStats::collect(5, &unique);

        assert_eq!(stats.raw_count, 5);
        assert_eq!(stats.unique_count, 2);
        assert_eq!(stats.duplicate_count, 3);
        assert_eq!(stats.follow_up_count, 1);
        assert_eq!(stats.total_turnover_k, 110);
    }

    #[test]
    fn test_stats_total_turnover_saturates() {
        let mut big = sample_row("1", "Ann", "ann@example.com");
        big.turnover_k = i64::MAX;
        let mut one = sample_row("2", "Bob", "bob@example.com");
        one.turnover_k = 1;
        let unique = vec![Contact::new(big).unwrap(), Contact::new(one).unwrap()];

        let stats = DirectoryStats::collect(2, &unique);

        assert_eq!(stats.total_turnover_k, i64::MAX);
        assert_eq!(stats.unique_count, 2);
    }

    #[test]
    fn test_stats_collect_empty() {
        assert_eq!(DirectoryStats::collect(0, &[]), DirectoryStats::default());
    }
}
