pub mod conv2d;
pub(crate) mod correlate;

pub use conv2d::conv2d_op;
