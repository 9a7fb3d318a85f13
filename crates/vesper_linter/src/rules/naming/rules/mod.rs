pub(crate) use leading_underscore::leading_underscore;
pub(crate) use lower_camel_case::lower_camel_case;

mod leading_underscore;
mod lower_camel_case;
