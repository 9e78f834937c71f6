use markdown::{mdast, to_mdast, ParseOptions};

/// Fenced code block of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Position among the response's code blocks, in document order.
    pub index: usize,
    pub language: Option<String>,
    pub filepath: Option<String>,
    pub text: String,
}

impl CodeBlock {
    pub fn new(index: usize, language: Option<&str>, filepath: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            index,
            language: language.map(str::to_string),
            filepath: filepath.map(str::to_string),
            text: text.into(),
        }
    }
}

/// Returns the fenced code blocks of `markdown` in document order.
///
/// Works on partial responses too: an unterminated fence runs to the end of
/// the text. Any input that fails to parse yields no blocks.
pub fn extract_code_blocks(markdown: &str) -> Vec<CodeBlock> {
    let root = match to_mdast(markdown, &ParseOptions::gfm()) {
        Ok(root) => root,
        Err(error) => {
            tracing::debug!(%error, "response is not parseable markdown");
            return Vec::new();
        }
    };

    let mut blocks = Vec::new();
    collect_code(&root, &mut blocks);
    blocks
}

fn collect_code(node: &mdast::Node, blocks: &mut Vec<CodeBlock>) {
    if let mdast::Node::Code(code) = node {
        let language = code.lang.as_deref().filter(|lang| !lang.is_empty());
        let filepath = code
            .meta
            .as_deref()
            .and_then(|meta| meta.split_whitespace().next());
        blocks.push(CodeBlock::new(blocks.len(), language, filepath, code.value.as_str()));
        return;
    }

    if let Some(children) = node.children() {
        for child in children {
            collect_code(child, blocks);
        }
    }
}
