pub(crate) use doc_comment_consistency::doc_comment_consistency;
pub(crate) use missing_documentation::missing_documentation;

mod doc_comment_consistency;
mod missing_documentation;
