use log::info;
use std::error::Error;
use std::fs;

/// Built-in system instruction, used when no override file is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are FinLit Bot, India's trusted financial literacy AI assistant.

Your style:
- Beginner-friendly, no jargon
- Step-by-step actionable advice
- India-focused (RBI/SEBI rules)
- Structured format with bullets and lists
- Add safety disclaimers

Always include:
1. Simple explanation
2. A 3-5 step action plan
3. Official links when relevant
4. Next steps

Never:
- Give personalized advice
- Recommend specific products
- Guarantee returns

Topics: Budgeting, Banking, SIP/Mutual Funds, Credit Score, Insurance, Loans, FD/RD, Taxes";

pub fn load_system_prompt(path: Option<&str>) -> Result<String, Box<dyn Error + Send + Sync>> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .map_err(|e| format!("Failed to read system prompt file '{}': {}", p, e))?;
            info!("Loaded system prompt from: {}", p);
            Ok(text.trim().to_string())
        }
        None => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
    }
}
