//! Rules about the spelling of declared names.

pub(crate) mod rules;
