pub mod add_bias;
pub mod matmul;

pub use add_bias::add_bias_op;
pub use matmul::matmul_op;
