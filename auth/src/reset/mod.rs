pub mod errors;
pub mod manager;
pub mod token;

pub use errors::ResetError;
pub use manager::ResetTokenManager;
pub use token::ResetToken;
