pub mod avg_pool;
pub mod max_pool;

pub use avg_pool::avg_pool2d_op;
pub use max_pool::max_pool2d_op;
