use crate::domain::model::Contact;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One text transformation applied to a contact. Blank inputs are returned
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatStep {
    /// Trims every text field and lower-cases the email.
    Normalize,
    /// Prepends an avatar badge with the initials of the first and last name.
    InitialsAvatar,
    /// Wraps the last word of the name in `<strong>`.
    StrongSurname,
    /// Turns the email into a `mailto:` link.
    EmailLink,
}

impl FormatStep {
    pub const DEFAULT_ORDER: [FormatStep; 4] = [
        FormatStep::Normalize,
        FormatStep::InitialsAvatar,
        FormatStep::StrongSurname,
        FormatStep::EmailLink,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormatStep::Normalize => "normalize",
            FormatStep::InitialsAvatar => "initials-avatar",
            FormatStep::StrongSurname => "strong-surname",
            FormatStep::EmailLink => "email-link",
        }
    }

    pub fn apply(&self, input: Contact) -> Contact {
        match self {
            FormatStep::Normalize => normalize(input),
            FormatStep::InitialsAvatar => initials_avatar(input),
            FormatStep::StrongSurname => strong_surname(input),
            FormatStep::EmailLink => email_link(input),
        }
    }
}

impl fmt::Display for FormatStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatStep::DEFAULT_ORDER
            .into_iter()
            .find(|step| step.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown format step '{}' (expected one of: {})",
                    s,
                    FormatStep::DEFAULT_ORDER.map(|step| step.name()).join(", ")
                )
            })
    }
}

fn normalize(input: Contact) -> Contact {
    // email 已保證非空，trim 後仍非空
    Contact {
        id: input.id.trim().to_string(),
        name: input.name.trim().to_string(),
        email: input.email.trim().to_lowercase(),
        phone: input.phone.trim().to_string(),
        department: input.department.trim().to_string(),
        country: input.country.trim().to_string(),
        company: input.company.trim().to_string(),
        ..input
    }
}

fn first_letter_upper(word: &str) -> String {
    word.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

fn initials_avatar(input: Contact) -> Contact {
    let name = {
        let trimmed = input.name.trim();
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let initials = match parts.as_slice() {
            [] => None,
            [only] => Some(first_letter_upper(only)),
            [first, .., last] => Some(format!(
                "{}{}",
                first_letter_upper(first),
                first_letter_upper(last)
            )),
        };
        initials.map(|initials| format!("<span class=\"avatar\">{}</span> {}", initials, trimmed))
    };

    match name {
        Some(name) => input.with_name(name),
        None => input,
    }
}

fn strong_surname(input: Contact) -> Contact {
    let name = {
        let parts: Vec<&str> = input.name.split_whitespace().collect();
        parts.split_last().map(|(last, rest)| {
            let mut name = String::with_capacity(input.name.len() + 17);
            for part in rest {
                name.push_str(part);
                name.push(' ');
            }
            name.push_str("<strong>");
            name.push_str(last);
            name.push_str("</strong>");
            name
        })
    };

    match name {
        Some(name) => input.with_name(name),
        None => input,
    }
}

fn email_link(input: Contact) -> Contact {
    let trimmed = input.email.trim();
    if trimmed.is_empty() {
        return input;
    }

    let email = format!("<a href=\"mailto:{0}\">{0}</a>", trimmed);
    Contact { email, ..input }
}

/// Applies its steps in order to each contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterPipeline {
    steps: Vec<FormatStep>,
}

impl FormatterPipeline {
    pub fn new(steps: &[FormatStep]) -> Self {
        Self {
            steps: steps.to_vec(),
        }
    }

    pub fn steps(&self) -> &[FormatStep] {
        &self.steps
    }

    pub fn apply(&self, input: Contact) -> Contact {
        self.steps.iter().fold(input, |current, step| step.apply(current))
    }

    pub fn apply_all(&self, contacts: Vec<Contact>) -> Vec<Contact> {
        contacts.into_iter().map(|c| self.apply(c)).collect()
    }
}

impl Default for FormatterPipeline {
    fn default() -> Self {
        Self::new(&FormatStep::DEFAULT_ORDER)
    }
}
