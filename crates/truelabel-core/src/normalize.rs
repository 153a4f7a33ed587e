/// Normalize a parameter name from a lab report to a lookup key.
///
/// Steps:
/// 1. Drop a trailing parenthetical: "Lead (Pb)" -> "Lead", "Fumonisins (B1+B2)" -> "Fumonisins"
/// 2. Drop a trailing species marker: "Salmonella sp." -> "Salmonella"
/// 3. Lowercase
/// 4. Replace every run of non-alphanumeric characters with a single underscore
/// 5. Trim leading and trailing underscores
///
/// Rule keys and aliases go through the same function, so matching is
/// case- and punctuation-insensitive on both sides.
pub fn normalize_parameter(raw: &str) -> String {
    let s = raw.trim();
    let s = strip_parenthetical(s).unwrap_or(s);
    to_key(strip_species_marker(s))
}

/// Keys to try, most specific first.
///
/// A trailing parenthetical is sometimes part of the name ("Aflatoxin (B1)")
/// and sometimes a note ("Lead (Pb)"), so the key with the parenthetical
/// kept comes before the stripped one.
pub fn lookup_keys(raw: &str) -> Vec<String> {
    let s = raw.trim();
    let stripped = normalize_parameter(s);
    match strip_parenthetical(s) {
        Some(_) => {
            let qualified = to_key(strip_species_marker(s));
            if qualified == stripped {
                vec![stripped]
            } else {
                vec![qualified, stripped]
            }
        }
        None => vec![stripped],
    }
}

/// Text before a trailing parenthetical, unless nothing would remain.
fn strip_parenthetical(s: &str) -> Option<&str> {
    if !s.ends_with(')') {
        return None;
    }
    let idx = s.rfind('(')?;
    let head = s[..idx].trim_end();
    (!head.is_empty()).then_some(head)
}

fn to_key(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut result = String::with_capacity(lower.len());
    let mut prev_underscore = true; // skip leading separators
    for c in lower.chars() {
        if c.is_alphanumeric() {
            result.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            result.push('_');
            prev_underscore = true;
        }
    }
    if result.ends_with('_') {
        result.pop();
    }
    result
}

fn strip_species_marker(s: &str) -> &str {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() < 2 {
        return s;
    }
    let last = words[words.len() - 1].to_lowercase();
    if matches!(last.as_str(), "sp" | "sp." | "spp" | "spp.") {
        if let Some(idx) = s.rfind(char::is_whitespace) {
            return s[..idx].trim_end();
        }
    }
    s
}
