pub mod forecast;
pub mod profile;
pub mod report;

pub use forecast::*;
pub use profile::*;
pub use report::*;
