mod packet;
pub use packet::*;

mod control_table;
pub use control_table::*;
