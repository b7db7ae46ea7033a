use serde_json::{Map, Number, Value};

const MAX_DEPTH: usize = 128;

/// Best-effort parse of almost-JSON.
///
/// Accepts trailing commas, single-quoted strings, unquoted keys and bare
/// words, missing colons and commas, unclosed containers and strings,
/// `//`, `/* */` and `#` comments, and Python literals. Text before the
/// first `{` or `[` is ignored. Only objects and arrays are returned.
pub(super) fn repair(text: &str) -> Option<Value> {
    let start = text.find(|ch: char| ch == '{' || ch == '[')?;
    let mut parser = LenientParser::new(&text[start..]);
    match parser.parse_value()? {
        value @ (Value::Object(_) | Value::Array(_)) => Some(value),
        _ => None,
    }
}

struct LenientParser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl LenientParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn parse_value(&mut self) -> Option<Value> {
        self.skip_trivia();
        match self.peek()? {
            '{' => self.parse_object(),
            '[' => self.parse_array(),
            quote @ ('"' | '\'') => self.parse_string(quote).map(Value::String),
            ch if ch == '-' || ch == '+' || ch == '.' || ch.is_ascii_digit() => {
                self.parse_number()
            }
            ch if is_word_char(ch) => Some(self.parse_bare_word()),
            _ => None,
        }
    }

    fn parse_object(&mut self) -> Option<Value> {
        self.enter()?;
        self.pos += 1;
        let mut map = Map::new();
        loop {
            self.skip_trivia_and_commas();
            match self.peek() {
                None | Some(']') => break,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {}
            }

            let key = self.parse_key()?;
            self.skip_trivia();
            if self.peek() == Some(':') {
                self.pos += 1;
            }
            self.skip_trivia();
            let value = match self.peek() {
                None | Some('}' | ',' | ']') => Value::Null,
                Some(_) => self.parse_value()?,
            };
            map.insert(key, value);
        }
        self.depth -= 1;
        Some(Value::Object(map))
    }

    fn parse_array(&mut self) -> Option<Value> {
        self.enter()?;
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_trivia_and_commas();
            match self.peek() {
                None | Some('}') => break,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => items.push(self.parse_value()?),
            }
        }
        self.depth -= 1;
        Some(Value::Array(items))
    }

    fn enter(&mut self) -> Option<()> {
        self.depth += 1;
        (self.depth <= MAX_DEPTH).then_some(())
    }

    fn parse_key(&mut self) -> Option<String> {
        match self.peek()? {
            quote @ ('"' | '\'') => self.parse_string(quote),
            ch if is_word_char(ch) => Some(self.take_word()),
            _ => None,
        }
    }

    /// Reads a string opened by `quote`. An unterminated string runs to the end.
    fn parse_string(&mut self, quote: char) -> Option<String> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(ch) = self.bump() {
            if ch == quote {
                return Some(out);
            }
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            let Some(escaped) = self.bump() else { break };
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'u' => out.push(self.parse_unicode_escape()?),
                other => out.push(other),
            }
        }
        Some(out)
    }

    fn parse_unicode_escape(&mut self) -> Option<char> {
        let high = self.take_hex4()?;
        if (0xD800..0xDC00).contains(&high)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
        {
            self.pos += 2;
            let low = self.take_hex4()?;
            let combined = 0x10000 + ((high - 0xD800) << 10) + (low.checked_sub(0xDC00)?);
            return char::from_u32(combined);
        }
        Some(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn take_hex4(&mut self) -> Option<u32> {
        let end = self.pos + 4;
        let digits: String = self.chars.get(self.pos..end)?.iter().collect();
        let value = u32::from_str_radix(&digits, 16).ok()?;
        self.pos = end;
        Some(value)
    }

    fn parse_number(&mut self) -> Option<Value> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        let literal = literal.trim_start_matches('+');
        if let Ok(int) = literal.parse::<i64>() {
            return Some(Value::Number(int.into()));
        }
        if let Ok(uint) = literal.parse::<u64>() {
            return Some(Value::Number(uint.into()));
        }
        let float = literal.parse::<f64>().ok()?;
        Number::from_f64(float).map(Value::Number)
    }

    fn parse_bare_word(&mut self) -> Value {
        let word = self.take_word();
        match word.as_str() {
            "true" | "True" => Value::Bool(true),
            "false" | "False" => Value::Bool(false),
            "null" | "None" | "undefined" => Value::Null,
            _ => Value::String(word),
        }
    }

    fn take_word(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_word_char) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_trivia_and_commas(&mut self) {
        loop {
            self.skip_trivia();
            if self.peek() == Some(',') {
                self.pos += 1;
            } else {
                return;
            }
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                c if c.is_whitespace() => self.pos += 1,
                '#' => self.skip_line(),
                '/' if self.peek_at(1) == Some('/') => self.skip_line(),
                '/' if self.peek_at(1) == Some('*') => {
                    self.pos += 2;
                    while self.peek().is_some()
                        && !(self.peek() == Some('*') && self.peek_at(1) == Some('/'))
                    {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                _ => return,
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.bump() {
            if ch == '\n' {
                return;
            }
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '$' | '.')
}
