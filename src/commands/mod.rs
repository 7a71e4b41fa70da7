pub mod generate;
pub mod list;

pub use generate::{GenerateCommandArgs, execute_generate};
pub use list::execute_list;
