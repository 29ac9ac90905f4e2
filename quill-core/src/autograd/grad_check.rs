use ndarray::ArrayD;
use thiserror::Error;

use crate::error::QuillError;
use crate::tensor::Tensor;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input {input_index}, element {element_index}: analytical {analytical_grad} != numerical {numerical_grad} (difference {difference})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function failed during gradient check: {0}")]
    ForwardPassError(QuillError),
    #[error("Backward pass failed during gradient check: {0}")]
    BackwardPassError(QuillError),
    #[error("Gradient check input {input_index} must be a leaf tensor")]
    InputNotLeaf { input_index: usize },
    #[error("Output gradient has shape {actual:?} but the output has shape {expected:?}")]
    OutputGradShape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Numerical gradient is not finite for input {input_index}, element {element_index} (loss+ {loss_plus}, loss- {loss_minus})")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is not finite for input {input_index}, element {element_index}: {value}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Tensor error during gradient check: {0}")]
    TensorError(QuillError),
}

impl From<QuillError> for GradCheckError {
    fn from(err: QuillError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against central finite differences.
///
/// `func` builds the graph from `inputs` (all leaves). The scalar used for
/// differentiation is `sum(func(inputs) * output_grad)`, so the analytical pass is
/// seeded with `output_grad`. Every element of every input is perturbed by
/// `±epsilon`; an element fails when both the absolute and the relative
/// difference exceed `tolerance`.
///
/// Input gradients are reset before the analytical pass and left holding the
/// analytical result afterwards.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &ArrayD<f32>,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, QuillError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        input.zero_grad();
    }

    // --- Analytical pass ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::OutputGradShape {
            expected: output.shape(),
            actual: output_grad.shape().to_vec(),
        });
    }
    output
        .backward_with_grad(output_grad.clone())
        .map_err(GradCheckError::BackwardPassError)?;
    let analytical: Vec<Vec<f64>> = inputs
        .iter()
        .map(|t| t.grad_vec().into_iter().map(f64::from).collect())
        .collect();

    // --- Numerical pass ---
    for (i, original) in inputs.iter().enumerate() {
        let base: Vec<f64> = original.to_vec().into_iter().map(f64::from).collect();
        let shape = original.shape();

        for elem_idx in 0..base.len() {
            let perturbed_loss = |delta: f64| -> Result<f64, GradCheckError> {
                let mut data = base.clone();
                data[elem_idx] += delta;
                let perturbed = Tensor::new(data.iter().map(|&x| x as f32).collect(), shape.clone())?;
                let mut shifted: Vec<Tensor> = inputs.to_vec();
                shifted[i] = perturbed;
                let out = func(&shifted).map_err(GradCheckError::ForwardPassError)?;
                Ok(weighted_sum(&out.value(), output_grad))
            };
            let loss_plus = perturbed_loss(epsilon)?;
            let loss_minus = perturbed_loss(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical[i][elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }

            if !approx::relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
    }

    Ok(())
}

fn weighted_sum(output: &ArrayD<f32>, weights: &ArrayD<f32>) -> f64 {
    output
        .iter()
        .zip(weights.iter())
        .map(|(&o, &w)| f64::from(o) * f64::from(w))
        .sum()
}
