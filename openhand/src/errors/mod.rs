mod hand_error;
pub use hand_error::*;
