//! Code-likeness heuristic for extracted text

/// Characters that are rare in prose but common in source code
const CODE_SYMBOLS: &[char] = &['{', '}', '(', ')', '[', ']', ';', '=', '<', '>', '$', '#', '|'];

/// Fraction of non-whitespace characters that must be code symbols
const SYMBOL_RATIO_THRESHOLD: f64 = 0.08;

/// Below this many non-whitespace characters the symbol ratio is not trusted
const MIN_CHARS_FOR_RATIO: usize = 40;

/// Tokens that almost only appear in code
const CODE_MARKERS: &[&str] = &[
    "```", "=>", "->", "::", "==", "!=", "&&", "||", "();", "){", ") {", "</", "/>",
    "#include", "fn main", "def ", "function(", "console.log", "println!", "import ",
];

/// Distinct markers required when the symbol ratio is low
const MIN_MARKERS: usize = 3;

/// Returns true if `text` looks like it contains source code
pub fn looks_like_code(text: &str) -> bool {
    if text.contains("```") {
        return true;
    }

    let mut total = 0usize;
    let mut symbols = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if CODE_SYMBOLS.contains(&c) {
            symbols += 1;
        }
    }

    if total >= MIN_CHARS_FOR_RATIO && symbols as f64 / total as f64 >= SYMBOL_RATIO_THRESHOLD {
        return true;
    }

    CODE_MARKERS.iter().filter(|m| text.contains(*m)).count() >= MIN_MARKERS
}
