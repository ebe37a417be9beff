use serde::Deserialize;
use std::error::Error;
use std::fs;

/// One keyword-to-URL entry. Table order is load order.
#[derive(Deserialize, Debug, Clone)]
pub struct LinkEntry {
    pub keyword: String,
    pub url: String,
}

impl LinkEntry {
    /// Markdown fragment appended to a response when this keyword matched.
    pub fn decorated(&self) -> String {
        format!(
            "\n\n🔗 **Official Guide**: [{}]({})",
            title_case(&self.keyword),
            self.url
        )
    }
}

fn title_case(keyword: &str) -> String {
    keyword
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// India-focused official financial guidance, in priority order.
const DEFAULT_LINKS: &[(&str, &str)] = &[
    ("bank", "https://rbi.org.in/Scripts/FAQView.aspx?Id=28"),
    ("savings", "https://financialservices.gov.in/beta/en/open-account"),
    ("investment", "https://www.sebi.gov.in/investor_education.html"),
    ("mutual", "https://www.amfiindia.com/investor-corner"),
    ("credit", "https://www.cibil.com/"),
    ("budget", "https://financialplanning.nism.ac.in/"),
    ("insurance", "https://policyholder.gov.in/"),
    ("loan", "https://sachet.rbi.org.in/"),
    ("fd", "https://www.sbi.co.in/web/interest-rates/interest-rates/deposit-rates"),
];

/// Ordered keyword-to-URL mapping, read-only after initialization. The first
/// matching keyword wins; at most one link is ever appended to a response.
#[derive(Debug, Clone)]
pub struct OfficialLinkTable {
    entries: Vec<LinkEntry>,
}

impl Default for OfficialLinkTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_LINKS
                .iter()
                .map(|(keyword, url)| LinkEntry {
                    keyword: keyword.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        )
    }
}

impl OfficialLinkTable {
    pub fn new(entries: Vec<LinkEntry>) -> Self {
        Self { entries }
    }

    pub fn from_file(path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read links file '{}': {}", path, e))?;
        let entries: Vec<LinkEntry> = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse links file '{}': {}", path, e))?;
        Ok(Self::new(entries))
    }

    /// First entry whose keyword occurs in the message, case-insensitive.
    pub fn lookup(&self, message: &str) -> Option<&LinkEntry> {
        let message_lower = message.to_lowercase();
        self.entries
            .iter()
            .find(|entry| message_lower.contains(&entry.keyword.to_lowercase()))
    }

    /// All URLs in table order. Unique by construction.
    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.url.clone()).collect()
    }
}
