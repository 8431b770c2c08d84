mod read_op;
pub mod record;
pub mod state;
mod write_op;

pub use read_op::EntityReadable;
pub use record::Record;
pub use state::AttrState;
pub use write_op::EntityWritable;
