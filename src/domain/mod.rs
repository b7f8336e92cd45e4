pub mod commands;
pub mod fine;
pub mod issue;
pub mod records;
pub mod value_objects;

pub use fine::*;
pub use issue::*;
pub use records::*;
pub use value_objects::*;
