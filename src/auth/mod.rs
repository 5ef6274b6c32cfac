mod extractors;
mod jwt;
mod password;

pub use extractors::*;
pub use jwt::*;
pub use password::*;
