use std::cell::OnceCell;

use vesper_syntax::{SyntaxKind, SyntaxNode, TokenKind};

/// Name of the module whose import marks a file as test code.
pub(crate) const TEST_MODULE: &str = "Testing";

/// Per-file facts shared by every rule in the pipeline.
///
/// The test-file flag is computed on first use and cached; rules query it
/// through a shared reference, so no rule can observe a half-updated
/// state.
pub(crate) struct FileContext<'a> {
    root: &'a SyntaxNode,
    imports_test_module: OnceCell<bool>,
}

impl<'a> FileContext<'a> {
    pub(crate) fn new(root: &'a SyntaxNode) -> Self {
        Self {
            root,
            imports_test_module: OnceCell::new(),
        }
    }

    /// Does a top-level import bring in the designated test module?
    pub(crate) fn is_test_file(&self) -> bool {
        *self.imports_test_module.get_or_init(|| {
            self.root
                .children_of_kind(SyntaxKind::ImportDecl)
                .any(|import| {
                    import
                        .first_token_of_kind(TokenKind::Identifier)
                        .is_some_and(|module| module.text == TEST_MODULE)
                })
        })
    }
}
