pub mod account;
pub mod filter;
pub mod profile;

pub use account::*;
pub use filter::*;
pub use profile::*;
