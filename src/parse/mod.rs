mod error;
mod menu_page;
mod statics;
pub mod text;

pub use error::Error;
pub use menu_page::*;
