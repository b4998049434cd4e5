mod geometry;
pub use geometry::*;

mod finger;
pub use finger::*;

mod grasp;
pub use grasp::*;

mod pose;
pub use pose::*;
