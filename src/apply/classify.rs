/// Language tags that always mean "run this in a terminal".
pub const TERMINAL_LANGUAGES: &[&str] = &["bash", "sh"];

/// Programs whose presence as the first word marks an untagged block as a
/// shell command.
pub const COMMON_TERMINAL_COMMANDS: &[&str] = &[
    "npm", "pnpm", "yarn", "bun", "deno", "npx", "cd", "ls", "pwd", "pip", "python", "node",
    "git", "curl", "wget", "rbenv", "gem", "ruby", "bundle",
];

const PROMPT_MARKER: &str = "$ ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Dispatched to the host's terminal; never enters the apply lifecycle.
    Terminal,
    FileEdit,
}

impl BlockKind {
    pub fn is_terminal(self) -> bool {
        self == Self::Terminal
    }
}

/// Heuristic split between shell commands and code to apply.
///
/// Untagged single-line snippets are terminal.
pub fn classify_block(language: Option<&str>, text: &str) -> BlockKind {
    let language = language.map(str::trim).unwrap_or_default();
    if TERMINAL_LANGUAGES
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(language))
    {
        return BlockKind::Terminal;
    }
    if !language.is_empty() {
        return BlockKind::FileEdit;
    }

    let trimmed = text.trim();
    let single_line = trimmed.split('\n').count() == 1;
    let first_word = trimmed.split_whitespace().next().unwrap_or_default();
    if single_line || COMMON_TERMINAL_COMMANDS.contains(&first_word) {
        BlockKind::Terminal
    } else {
        BlockKind::FileEdit
    }
}

/// Command line to run for a terminal block, minus a leading `$ ` prompt.
pub fn terminal_command(text: &str) -> &str {
    text.strip_prefix(PROMPT_MARKER).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_tags_are_terminal_whatever_the_content() {
        assert_eq!(classify_block(Some("sh"), "fn main() {}\nmore"), BlockKind::Terminal);
        assert_eq!(classify_block(Some("BASH"), "x\ny"), BlockKind::Terminal);
    }

    #[test]
    fn other_tags_are_file_edits_even_for_one_line() {
        assert_eq!(classify_block(Some("rust"), "let x = 1;"), BlockKind::FileEdit);
        assert_eq!(classify_block(Some("sql"), "SELECT 1"), BlockKind::FileEdit);
    }

    #[test]
    fn untagged_single_line_is_terminal() {
        assert_eq!(classify_block(None, "ls -la"), BlockKind::Terminal);
        assert_eq!(classify_block(Some(""), "SELECT * FROM t"), BlockKind::Terminal);
        assert_eq!(classify_block(None, "\n  make test  \n"), BlockKind::Terminal);
    }

    #[test]
    fn untagged_multi_line_depends_on_first_word() {
        assert_eq!(
            classify_block(None, "SELECT *\nFROM t"),
            BlockKind::FileEdit
        );
        assert_eq!(
            classify_block(None, "npm install\nnpm test"),
            BlockKind::Terminal
        );
        assert_eq!(
            classify_block(None, "gitk --all\nexit"),
            BlockKind::FileEdit
        );
    }

    #[test]
    fn prompt_marker_is_stripped_once() {
        assert_eq!(terminal_command("$ cargo test"), "cargo test");
        assert_eq!(terminal_command("cargo test"), "cargo test");
        assert_eq!(terminal_command("$$ x"), "$$ x");
    }
}
