pub mod db;
pub mod directory;
pub mod error;
pub mod store;
pub mod types;

pub use directory::{CheckIn, UserDirectory};
pub use error::UserError;
pub use types::User;
