mod mapping;
pub use mapping::*;

mod convergence;
pub use convergence::*;

mod control;
pub use control::*;
