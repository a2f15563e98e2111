use services::SolutionHighlighter;

// ANSI color codes, Monokai-ish
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const KEYWORD: &str = "\x1b[38;2;249;38;114m";
    pub const STRING: &str = "\x1b[38;2;230;219;116m";
    pub const NUMBER: &str = "\x1b[38;2;174;129;255m";
    pub const COMMENT: &str = "\x1b[38;2;117;113;94m";
    pub const FUNC_CALL: &str = "\x1b[38;2;102;217;239m";
    pub const COMMAND: &str = "\x1b[38;2;253;151;31m";
    pub const PROMPT: &str = "\x1b[32m";
}

pub use colors::{PROMPT as PROMPT_COLOR, RESET as RESET_COLOR};

const KEYWORDS: &[&str] = &[
    "all", "alter", "and", "as", "asc", "between", "by", "case", "create", "cross", "delete",
    "desc", "distinct", "drop", "else", "end", "except", "exists", "from", "full", "group",
    "having", "in", "index", "inner", "insert", "intersect", "into", "is", "join", "left",
    "like", "limit", "not", "null", "offset", "on", "or", "order", "outer", "primary", "key",
    "references", "right", "select", "set", "table", "then", "union", "update", "values",
    "view", "when", "where", "with",
];

/// SQL syntax highlighter for terminal output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlHighlighter;

impl SqlHighlighter {
    pub fn highlight_line(&self, line: &str) -> String {
        let mut result = String::with_capacity(line.len() * 2);

        // Backslash commands are coloured as a whole word
        if line.trim_start().starts_with('\\') {
            let start = line.len() - line.trim_start().len();
            let end = line[start..]
                .find(char::is_whitespace)
                .map_or(line.len(), |pos| start + pos);
            result.push_str(&line[..start]);
            result.push_str(colors::COMMAND);
            result.push_str(&line[start..end]);
            result.push_str(colors::RESET);
            result.push_str(&line[end..]);
            return result;
        }

        let chars: Vec<char> = line.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            // Line comment
            if i + 1 < len && chars[i] == '-' && chars[i + 1] == '-' {
                result.push_str(colors::COMMENT);
                while i < len && chars[i] != '\n' {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(colors::RESET);
                continue;
            }

            // String literal, '' escapes a quote
            if chars[i] == '\'' {
                result.push_str(colors::STRING);
                result.push(chars[i]);
                i += 1;
                while i < len {
                    result.push(chars[i]);
                    if chars[i] == '\'' {
                        if i + 1 < len && chars[i + 1] == '\'' {
                            result.push(chars[i + 1]);
                            i += 2;
                            continue;
                        }
                        i += 1;
                        break;
                    }
                    i += 1;
                }
                result.push_str(colors::RESET);
                continue;
            }

            if chars[i].is_ascii_digit() {
                result.push_str(colors::NUMBER);
                while i < len && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(colors::RESET);
                continue;
            }

            if chars[i].is_alphabetic() || chars[i] == '_' {
                let start = i;
                while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let is_func_call = i < len && chars[i] == '(';

                if KEYWORDS.contains(&word.to_ascii_lowercase().as_str()) {
                    result.push_str(colors::KEYWORD);
                    result.push_str(&word);
                    result.push_str(colors::RESET);
                } else if is_func_call {
                    result.push_str(colors::FUNC_CALL);
                    result.push_str(&word);
                    result.push_str(colors::RESET);
                } else {
                    result.push_str(&word);
                }
                continue;
            }

            result.push(chars[i]);
            i += 1;
        }

        result
    }
}

impl SolutionHighlighter for SqlHighlighter {
    fn highlight(&self, sql: &str) -> String {
        sql.lines()
            .map(|line| self.highlight_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
