use crate::domain::model::{Contact, DirectoryStats};
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::cmp::Ordering;

pub const DEFAULT_TITLE: &str = "Unified Contact Directory";

const STYLE: &str = "body { font-family: Arial, sans-serif; }
table { border-collapse: collapse; width: 100%; margin-bottom: 1.5em; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
th { background-color: #f2f2f2; }
tr:nth-child(even) { background-color: #f9f9f9; }
.avatar { display:inline-block; width:2em; height:2em; border-radius:50%; text-align:center; font-weight:bold; border:1px solid #ccc; margin-right:0.5em; font-size:0.8em; line-height:2em; }
";

const CONTACT_HEADERS: [&str; 9] = [
    "ID",
    "Name",
    "Email",
    "Phone",
    "Department",
    "Country",
    "Company",
    "Follow-up",
    "Turnover (k EUR)",
];

/// Replaces `&`, `<` and `>` with entities.
pub fn escape(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Department first, then name, both case-insensitive.
pub fn sort_for_report(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| {
        cmp_ignore_case(a.department(), b.department())
            .then_with(|| cmp_ignore_case(a.name(), b.name()))
    });
}

/// Phone number as a `tel:` link followed by a WhatsApp link.
pub fn render_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let digits: String = trimmed.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
    let wa_digits: String = digits.chars().filter(|c| *c != '+').collect();

    format!(
        "<a href=\"tel:{}\">{}</a> (<a href=\"https://wa.me/{}\">WhatsApp</a>)",
        html_escape::encode_double_quoted_attribute(&digits),
        escape(trimmed),
        html_escape::encode_double_quoted_attribute(&wa_digits)
    )
}

#[derive(Debug, Clone)]
pub struct HtmlReport {
    title: String,
    generated_at: Option<DateTime<Local>>,
}

impl HtmlReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            generated_at: None,
        }
    }

    pub fn generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Renders the statistics table followed by one row per contact. Name and
    /// email are embedded as-is since the formatter already produced markup
    /// for them.
    pub fn render(&self, contacts: &[Contact], stats: &DirectoryStats) -> String {
        let mut html = String::with_capacity(16384);
        let title = escape(&self.title);

        html.push_str("<html>\n<head>\n<meta charset=\"UTF-8\" />\n");
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str("<style>\n");
        html.push_str(STYLE);
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", title));

        if let Some(at) = self.generated_at {
            html.push_str(&format!(
                "<p>Generated {}</p>\n",
                at.format("%Y-%m-%d %H:%M:%S")
            ));
        }

        // 統計表
        html.push_str("<h2>Statistics</h2>\n<table border=\"1\">\n");
        html.push_str("<tr><th>Statistic</th><th>Value</th></tr>\n");
        let rows = [
            ("Raw contacts loaded", stats.raw_count.to_string()),
            ("Unique contacts", stats.unique_count.to_string()),
            ("Duplicates removed", stats.duplicate_count.to_string()),
            (
                "Contacts interested in follow-up",
                stats.follow_up_count.to_string(),
            ),
            (
                "Total turnover (sum, thousands of EUR)",
                stats.total_turnover_k.to_string(),
            ),
        ];
        for (label, value) in rows {
            html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", label, value));
        }
        html.push_str("</table>\n");

        // 聯絡人表
        html.push_str("<h2>Contacts</h2>\n<table border=\"1\">\n<tr>");
        for header in CONTACT_HEADERS {
            html.push_str(&format!("<th>{}</th>", header));
        }
        html.push_str("</tr>\n");

        for contact in contacts {
            html.push_str(&render_contact_row(contact));
        }

        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

impl Default for HtmlReport {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

fn render_contact_row(contact: &Contact) -> String {
    let cells = [
        escape(contact.id()).into_owned(),
        contact.name().to_string(),
        contact.email().to_string(),
        render_phone(contact.phone()),
        escape(contact.department()).into_owned(),
        escape(contact.country()).into_owned(),
        escape(contact.company()).into_owned(),
        (if contact.is_follow_up() { "Yes" } else { "No" }).to_string(),
        contact.turnover_k().to_string(),
    ];

    let mut row = String::from("<tr>");
    for cell in cells {
        row.push_str("<td>");
        row.push_str(&cell);
        row.push_str("</td>");
    }
    row.push_str("</tr>\n");
    row
}
