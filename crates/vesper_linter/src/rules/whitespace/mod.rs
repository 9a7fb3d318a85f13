//! Rules fed by the whitespace linter, which compares the user's text to
//! the pretty-printed output line by line.

pub(crate) mod rules;
