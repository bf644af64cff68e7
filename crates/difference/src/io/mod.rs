pub mod files;
pub mod save;

pub use files::*;
