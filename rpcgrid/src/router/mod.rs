pub mod aggregate;
pub mod fetch;

pub mod util;
