/// Split a command line on whitespace.
///
/// Quotes have no special meaning: `setalias ll "ls -l"` yields the four
/// tokens `setalias`, `ll`, `"ls` and `-l"`.
pub fn split_into_tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// A resolved command line, ready to be matched against the builtin table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    raw: String,
    tokens: Vec<String>,
}

impl CommandLine {
    pub fn parse(line: &str) -> Self {
        let raw = line.trim().to_string();
        let tokens = split_into_tokens(&raw);
        Self { raw, tokens }
    }

    /// The trimmed line as typed (after substitution and alias expansion).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// First token, or `""` for an empty line.
    pub fn verb(&self) -> &str {
        self.tokens.first().map_or("", String::as_str)
    }

    /// Tokens after the verb.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Text following a literal `prefix`, trimmed.
    pub fn remainder_after(&self, prefix: &str) -> &str {
        self.raw.strip_prefix(prefix).unwrap_or("").trim()
    }
}
