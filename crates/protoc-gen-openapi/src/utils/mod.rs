pub mod refs;
pub mod text;

pub(crate) use refs::schema_ref;
pub(crate) use text::clean_comment;
