pub mod refs;
pub mod spec;

pub(crate) use refs::component_ref_name;
