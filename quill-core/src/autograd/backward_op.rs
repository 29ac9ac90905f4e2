use ndarray::ArrayD;

use crate::error::QuillError;
use crate::ops;
use crate::ops::window::Size2;
use crate::tensor::Tensor;

/// The backward rule attached to every non-leaf node.
///
/// Each variant holds the operand handles and the configuration scalars the
/// rule needs, nothing else. The operand handles double as the node's parent
/// links: [`BackwardOp::inputs`] returns them in operand order.
///
/// Axes are stored already normalized (non-negative).
#[derive(Debug, Clone)]
pub enum BackwardOp {
    Add { a: Tensor, b: Tensor },
    Mul { a: Tensor, b: Tensor },
    Sigmoid { input: Tensor },
    Tanh { input: Tensor },
    Relu { input: Tensor },
    Matmul { a: Tensor, b: Tensor },
    AddBias { input: Tensor, bias: Tensor, axis: usize },
    Reshape { input: Tensor },
    ExpandDims { input: Tensor, axis: usize },
    Squeeze { input: Tensor, axis: usize },
    Stack { inputs: Vec<Tensor>, axis: usize },
    Concatenate { inputs: Vec<Tensor>, axis: usize },
    Split { input: Tensor, axis: usize, sections: usize },
    Unstack { input: Tensor, axis: usize },
    Sum { input: Tensor, axis: Option<usize> },
    MseLoss { prediction: Tensor, target: Tensor },
    AvgPool2d { input: Tensor, kernel: Size2, stride: Size2 },
    MaxPool2d { input: Tensor, kernel: Size2, stride: Size2 },
    Conv2d { input: Tensor, kernel: Tensor, stride: Size2, padding: Size2 },
}

impl BackwardOp {
    /// Short operation name, used in logs and `Debug` output.
    pub fn name(&self) -> &'static str {
        match self {
            BackwardOp::Add { .. } => "add",
            BackwardOp::Mul { .. } => "mul",
            BackwardOp::Sigmoid { .. } => "sigmoid",
            BackwardOp::Tanh { .. } => "tanh",
            BackwardOp::Relu { .. } => "relu",
            BackwardOp::Matmul { .. } => "matmul",
            BackwardOp::AddBias { .. } => "add_bias",
            BackwardOp::Reshape { .. } => "reshape",
            BackwardOp::ExpandDims { .. } => "expand_dims",
            BackwardOp::Squeeze { .. } => "squeeze",
            BackwardOp::Stack { .. } => "stack",
            BackwardOp::Concatenate { .. } => "concatenate",
            BackwardOp::Split { .. } => "split",
            BackwardOp::Unstack { .. } => "unstack",
            BackwardOp::Sum { .. } => "sum",
            BackwardOp::MseLoss { .. } => "mse_loss",
            BackwardOp::AvgPool2d { .. } => "avg_pool2d",
            BackwardOp::MaxPool2d { .. } => "max_pool2d",
            BackwardOp::Conv2d { .. } => "conv2d",
        }
    }

    /// The parent nodes of the operation, in operand order.
    ///
    /// A node passed twice (e.g. `add_op(&a, &a)`) appears twice; the scheduler
    /// counts every slot.
    pub fn inputs(&self) -> Vec<&Tensor> {
        match self {
            BackwardOp::Add { a, b } | BackwardOp::Mul { a, b } | BackwardOp::Matmul { a, b } => {
                vec![a, b]
            }
            BackwardOp::AddBias { input, bias, .. } => vec![input, bias],
            BackwardOp::MseLoss { prediction, target } => vec![prediction, target],
            BackwardOp::Conv2d { input, kernel, .. } => vec![input, kernel],
            BackwardOp::Stack { inputs, .. } | BackwardOp::Concatenate { inputs, .. } => {
                inputs.iter().collect()
            }
            BackwardOp::Sigmoid { input }
            | BackwardOp::Tanh { input }
            | BackwardOp::Relu { input }
            | BackwardOp::Reshape { input }
            | BackwardOp::ExpandDims { input, .. }
            | BackwardOp::Squeeze { input, .. }
            | BackwardOp::Split { input, .. }
            | BackwardOp::Unstack { input, .. }
            | BackwardOp::Sum { input, .. }
            | BackwardOp::AvgPool2d { input, .. }
            | BackwardOp::MaxPool2d { input, .. } => vec![input],
        }
    }

    /// Runs the rule: adds this node's contribution into every parent's gradient.
    ///
    /// * `output`: the node's own forward value (needed by sigmoid/tanh).
    /// * `grad`: the node's fully accumulated gradient.
    /// * `partition_index`: the node's slice index, for split/unstack children.
    pub(crate) fn backward(
        &self,
        output: &ArrayD<f32>,
        grad: &ArrayD<f32>,
        partition_index: Option<usize>,
    ) -> Result<(), QuillError> {
        match self {
            BackwardOp::Add { a, b } => ops::arithmetic::add::add_backward(a, b, grad),
            BackwardOp::Mul { a, b } => ops::arithmetic::mul::mul_backward(a, b, grad),
            BackwardOp::Sigmoid { input } => {
                ops::activation::sigmoid::sigmoid_backward(input, output, grad)
            }
            BackwardOp::Tanh { input } => ops::activation::tanh::tanh_backward(input, output, grad),
            BackwardOp::Relu { input } => ops::activation::relu::relu_backward(input, grad),
            BackwardOp::Matmul { a, b } => ops::linalg::matmul::matmul_backward(a, b, grad),
            BackwardOp::AddBias { input, bias, axis } => {
                ops::linalg::add_bias::add_bias_backward(input, bias, *axis, grad)
            }
            BackwardOp::Reshape { input } => ops::view::reshape::reshape_backward(input, grad),
            BackwardOp::ExpandDims { input, axis } => {
                ops::view::squeeze_unsqueeze::expand_dims_backward(input, *axis, grad)
            }
            BackwardOp::Squeeze { input, axis } => {
                ops::view::squeeze_unsqueeze::squeeze_backward(input, *axis, grad)
            }
            BackwardOp::Stack { inputs, axis } => {
                ops::partition::stack::stack_backward(inputs, *axis, grad)
            }
            BackwardOp::Concatenate { inputs, axis } => {
                ops::partition::concatenate::concatenate_backward(inputs, *axis, grad)
            }
            BackwardOp::Split {
                input,
                axis,
                sections,
            } => ops::partition::split::split_backward(
                input,
                *axis,
                *sections,
                partition_index,
                grad,
            ),
            BackwardOp::Unstack { input, axis } => {
                ops::partition::split::unstack_backward(input, *axis, partition_index, grad)
            }
            BackwardOp::Sum { input, axis } => ops::reduction::sum::sum_backward(input, *axis, grad),
            BackwardOp::MseLoss { prediction, target } => {
                ops::loss::mse::mse_loss_backward(prediction, target, grad)
            }
            BackwardOp::AvgPool2d {
                input,
                kernel,
                stride,
            } => ops::pool::avg_pool::avg_pool2d_backward(input, *kernel, *stride, grad),
            BackwardOp::MaxPool2d {
                input,
                kernel,
                stride,
            } => ops::pool::max_pool::max_pool2d_backward(input, *kernel, *stride, grad),
            BackwardOp::Conv2d {
                input,
                kernel,
                stride,
                padding,
            } => ops::conv::conv2d::conv2d_backward(input, kernel, *stride, *padding, grad),
        }
    }
}
