pub mod generate;
pub mod list;

pub use generate::{GenerateConfig, generate_client};
pub use list::list_operations;
