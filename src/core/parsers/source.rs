use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Comments extracted from SingleThreadedComments so they can outlive the
/// parser and cross threads.
#[derive(Debug, Clone)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Every comment with its 1-based line, ordered by position.
    pub fn with_lines<'a>(&'a self, source_map: &SourceMap) -> Vec<(usize, &'a Comment)> {
        let mut comments: Vec<_> = self
            .leading
            .values()
            .chain(self.trailing.values())
            .flat_map(|cmts| cmts.iter())
            .collect();
        comments.sort_by_key(|cmt| cmt.span.lo);
        comments.dedup_by_key(|cmt| cmt.span.lo);
        comments
            .into_iter()
            .map(|cmt| (source_map.lookup_char_pos(cmt.span.lo).line, cmt))
            .collect()
    }
}

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
}

/// Parse a TypeScript/JavaScript source string into an AST plus comments.
///
/// JSX is enabled for everything except `.ts` files, where `<T>expr` casts
/// would otherwise be read as elements.
pub fn parse_source(code: String, file_path: &str, source_map: Arc<SourceMap>) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let tsx = !matches!(
            Path::new(file_path).extension().and_then(|e| e.to_str()),
            Some("ts" | "mts" | "cts")
        );
        let syntax = Syntax::Typescript(TsSyntax {
            tsx,
            decorators: true,
            ..Default::default()
        });

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), Some(&comments));

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e))?;

        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map,
            comments: extracted_comments,
        })
    })
}

/// Read and parse one file with its own SourceMap.
pub fn parse_file(path: &Path) -> Result<ParsedSource> {
    let code = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
    let source_map = Arc::new(SourceMap::default());
    parse_source(code, &path.to_string_lossy(), source_map)
}
