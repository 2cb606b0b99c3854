pub mod export;
pub mod letter;
pub mod pdf;

pub use export::*;
pub use letter::*;
pub use pdf::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferralError {
    #[error("Failed to generate referral PDF: {0}")]
    Render(String),

    #[error("A referral document operation is already in progress")]
    Busy,

    #[error("No referral document has been generated")]
    NothingGenerated,

    #[error("Internal lock error")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
