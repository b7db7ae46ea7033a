use serde_json::error::Category;

const PREVIEW_LIMIT: usize = 200;
const SNIPPET_LINE_LIMIT: usize = 80;

pub(super) fn format_parse_error(error: &serde_json::Error, raw_text: &str) -> String {
    let message = error_message(error);
    let mut parts = vec![format!(
        "JSON parse error: {message} at line {}, column {}",
        error.line(),
        error.column()
    )];

    let snippet = context_snippet(raw_text, error.line(), error.column());
    if !snippet.is_empty() {
        parts.push(String::new());
        parts.push(snippet);
    }

    if let Some(suggestion) = suggest_fix(error, &message, raw_text) {
        parts.push(String::new());
        parts.push(format!("Suggestion: {suggestion}"));
    }

    let mut preview: String = raw_text.chars().take(PREVIEW_LIMIT).collect();
    if raw_text.chars().count() > PREVIEW_LIMIT {
        preview.push_str("...");
    }
    let preview = preview.replace('\n', "\\n").replace('\t', "\\t");
    parts.push(String::new());
    parts.push(format!("Input preview: '{preview}'"));

    parts.join("\n")
}

/// serde_json appends the position to its message; it is reported separately.
fn error_message(error: &serde_json::Error) -> String {
    let full = error.to_string();
    let position = format!(" at line {} column {}", error.line(), error.column());
    match full.strip_suffix(&position) {
        Some(message) => message.to_string(),
        None => full,
    }
}

/// One line of context either side of the error, with a caret under the column.
fn context_snippet(text: &str, line: usize, column: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() || line < 1 {
        return String::new();
    }

    let error_idx = (line - 1).min(lines.len() - 1);
    let start_idx = error_idx.saturating_sub(1);
    let end_idx = (error_idx + 2).min(lines.len());
    let width = end_idx.to_string().len();

    let mut out = Vec::new();
    for (idx, raw_line) in lines.iter().enumerate().take(end_idx).skip(start_idx) {
        let content = shorten_line(raw_line);
        out.push(format!("  {:>width$} | {content}", idx + 1));
        if idx == error_idx {
            let caret_at = if column > 0 {
                (column - 1).min(content.chars().count())
            } else {
                0
            };
            out.push(format!("  {} | {}^", " ".repeat(width), " ".repeat(caret_at)));
        }
    }
    out.join("\n")
}

fn shorten_line(line: &str) -> String {
    if line.chars().count() > SNIPPET_LINE_LIMIT {
        let kept: String = line.chars().take(SNIPPET_LINE_LIMIT - 3).collect();
        format!("{kept}...")
    } else {
        line.to_string()
    }
}

fn char_at(text: &str, line: usize, column: usize) -> Option<char> {
    let line = text.lines().nth(line.checked_sub(1)?)?;
    line.chars().nth(column.checked_sub(1)?)
}

fn suggest_fix(error: &serde_json::Error, message: &str, text: &str) -> Option<String> {
    let at = char_at(text, error.line(), error.column());

    if message.contains("while parsing a string") || message.contains("control character") {
        return Some(
            "Missing closing quote. Check for unescaped quotes inside the string.".to_string(),
        );
    }

    if error.classify() == Category::Eof {
        let open_braces = text.matches('{').count() as i64 - text.matches('}').count() as i64;
        let open_brackets = text.matches('[').count() as i64 - text.matches(']').count() as i64;
        if open_braces > 0 {
            return Some(format!(
                "Missing closing brace. {open_braces} unclosed '{{' found."
            ));
        }
        if open_brackets > 0 {
            return Some(format!(
                "Missing closing bracket. {open_brackets} unclosed '[' found."
            ));
        }
        return Some(
            "Unexpected end of input. Check for missing closing braces or brackets.".to_string(),
        );
    }

    let hint = match message {
        "trailing comma" if at == Some(']') => {
            "Trailing comma in array. Remove the comma before ']'."
        }
        "trailing comma" => "Trailing comma before closing brace. Remove the comma.",
        "key must be a string" => "Object key must be a double-quoted string.",
        "expected value" if at == Some(',') => {
            "Extra comma. Remove it or add the missing value."
        }
        "expected value" if at == Some('}') => "Missing value after colon.",
        "expected value" => {
            "Expected a value (string, number, object, array, true, false, or null)."
        }
        "expected ident" => "Bare words are not JSON. Wrap strings in double quotes.",
        "expected `:`" => "Missing colon after object key.",
        "expected `,` or `}`" => {
            "Missing comma between object properties, or extra content after value."
        }
        "expected `,` or `]`" => {
            "Missing comma between array elements, or extra content after value."
        }
        "trailing characters" => "Extra content after the JSON value. Remove the surrounding text.",
        m if m.contains("escape") => {
            "Invalid escape sequence. Use \\\\ for backslash, or \\n, \\t, \\r, \\u for special chars."
        }
        _ => return None,
    };
    Some(hint.to_string())
}
