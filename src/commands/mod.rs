pub mod capabilities;
pub mod config;

pub use self::capabilities::*;
pub use self::config::*;
