pub(crate) mod tracked;
pub(crate) mod value;
