// All LLM prompt templates for résumé analysis.
// Replace `{resume_text}` / `{summary}` before sending.

pub const SUMMARY_MAX_TOKENS: u32 = 500;
pub const GAPS_MAX_TOKENS: u32 = 400;
pub const ROADMAP_MAX_TOKENS: u32 = 400;
pub const KEYWORDS_MAX_TOKENS: u32 = 100;

pub const SUMMARY_PROMPT: &str = "Summarize this resume highlighting the skills, education, \
and experience:\n\n{resume_text}";

pub const GAPS_PROMPT: &str = "Analyze this resume and highlight missing skills, \
certifications, and experiences needed for better job opportunities:\n\n{resume_text}";

pub const ROADMAP_PROMPT: &str = "Based on this resume, suggest a future roadmap to improve \
this person's career prospects (skills to learn, certifications needed, industry \
exposure):\n\n{resume_text}";

pub const KEYWORDS_PROMPT: &str = "Based on this resume summary, suggest the best job titles \
and keywords for searching jobs. Give a comma-separated list only, no explanation.\n\n\
Summary: {summary}";
