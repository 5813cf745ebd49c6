use regex::Regex;
use std::sync::OnceLock;

// Applied in order, one pass; later rules see the output of earlier ones.
// Nested line markers such as `# #x` or `> > x` lose only their outer marker,
// so the result is not always a fixed point.
const RULES: [(&str, &str); 7] = [
    // bold, then italics
    (r"\*\*(.*?)\*\*", "${1}"),
    (r"\*(.*?)\*", "${1}"),
    // inline code
    (r"`([^`]+)`", "${1}"),
    // headings
    (r"(?m)^#+\s*", ""),
    // [text](url)
    (r"\[([^\]]+)\]\([^)]+\)", "${1}"),
    // block quotes
    (r"(?m)^>\s*", ""),
    // horizontal rules and underscore runs
    (r"_{3,}|-{3,}", ""),
];

static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn compiled_rules() -> &'static [(Regex, &'static str)] {
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|(pattern, replacement)| {
                (
                    Regex::new(pattern).expect("markup rule is a valid regex"),
                    *replacement,
                )
            })
            .collect()
    })
}

/// Remove lightweight Markdown from model output, leaving plain text.
pub fn strip_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = text.to_string();
    for (re, replacement) in compiled_rules() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out.trim().to_string()
}
