pub mod difference;
pub mod preprocessing;
pub mod extraction;
pub mod drawing;

pub use difference::*;
pub use preprocessing::*;
pub use extraction::*;
pub use drawing::*;
