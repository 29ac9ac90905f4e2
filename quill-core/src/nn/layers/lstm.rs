use rand::Rng;

use crate::error::QuillError;
use crate::nn::layers::linear::Linear;
use crate::nn::module::Module;
use crate::nn::parameter::Parameters;
use crate::ops::{add_op, mul_op, sigmoid_op, split_op, squeeze_op, stack_op, tanh_op};
use crate::tensor::{self, Tensor};

/// One LSTM step: `U` maps the input, `W` the previous hidden state, each to the
/// four gate pre-activations laid side by side (forget, input, candidate, output).
#[derive(Debug, Clone)]
struct LstmCell {
    u: Linear,
    w: Linear,
}

impl LstmCell {
    fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        bias: bool,
        rng: &mut R,
    ) -> Result<Self, QuillError> {
        Ok(LstmCell {
            u: Linear::new(input_size, hidden_size * 4, bias, rng)?,
            w: Linear::new(hidden_size, hidden_size * 4, bias, rng)?,
        })
    }

    fn step(&self, x: &Tensor, h: &Tensor, c: &Tensor) -> Result<(Tensor, Tensor), QuillError> {
        let xs = split_op(&self.u.forward(x)?, 4, -1)?;
        let hs = split_op(&self.w.forward(h)?, 4, -1)?;
        let f = sigmoid_op(&add_op(&xs[0], &hs[0])?)?;
        let i = sigmoid_op(&add_op(&xs[1], &hs[1])?)?;
        let c_tilde = tanh_op(&add_op(&xs[2], &hs[2])?)?;
        let o = sigmoid_op(&add_op(&xs[3], &hs[3])?)?;

        let c_next = add_op(&mul_op(&f, c)?, &mul_op(&i, &c_tilde)?)?;
        let h_next = mul_op(&o, &tanh_op(&c_next)?)?;
        Ok((h_next, c_next))
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert_group("U", self.u.parameters());
        params.insert_group("W", self.w.parameters());
        params
    }
}

/// Multi-layer long short-term memory over sequences of shape `(..., T, input_size)`.
///
/// Every time step runs through all cells in order with a single `(h, c)` pair
/// threaded through the stack; the output collects the last cell's `h` of every
/// step, stacked along axis -2.
#[derive(Debug, Clone)]
pub struct Lstm {
    cells: Vec<LstmCell>,
    input_size: usize,
    hidden_size: usize,
}

impl Lstm {
    /// # Errors
    /// `ValueOutOfRange` if any size is zero.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        bias: bool,
        rng: &mut R,
    ) -> Result<Self, QuillError> {
        for (name, value) in [
            ("input_size", input_size),
            ("hidden_size", hidden_size),
            ("num_layers", num_layers),
        ] {
            if value == 0 {
                return Err(QuillError::ValueOutOfRange {
                    name: name.to_string(),
                    value: value.to_string(),
                    constraint: "a positive count".to_string(),
                });
            }
        }
        let mut cells = Vec::with_capacity(num_layers);
        cells.push(LstmCell::new(input_size, hidden_size, bias, rng)?);
        for _ in 1..num_layers {
            cells.push(LstmCell::new(hidden_size, hidden_size, bias, rng)?);
        }
        Ok(Lstm {
            cells,
            input_size,
            hidden_size,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.cells.len()
    }

    /// Runs the whole sequence, starting from `state` or from zeros.
    ///
    /// Returns the per-step outputs `(..., T, hidden)` and the final `(h, c)`,
    /// each of shape `(..., hidden)`.
    ///
    /// # Errors
    /// * `RankMismatch` if `x` has fewer than two axes.
    /// * `ShapeMismatch` if the last axis is not `input_size`, or a given state
    ///   does not have shape `(..., hidden)`.
    pub fn forward_with_state(
        &self,
        x: &Tensor,
        state: Option<(Tensor, Tensor)>,
    ) -> Result<(Tensor, (Tensor, Tensor)), QuillError> {
        let shape = x.shape();
        if shape.len() < 2 {
            return Err(QuillError::RankMismatch {
                operation: "lstm".to_string(),
                expected: vec![2, 3],
                actual: shape.len(),
            });
        }
        let (leading, tail) = shape.split_at(shape.len() - 2);
        if tail[1] != self.input_size {
            return Err(QuillError::ShapeMismatch {
                expected: [leading, &[tail[0], self.input_size][..]].concat(),
                actual: shape.clone(),
                operation: "lstm input".to_string(),
            });
        }
        let state_shape = [leading, &[self.hidden_size][..]].concat();
        let (mut h, mut c) = match state {
            Some((h, c)) => {
                for t in [&h, &c] {
                    if t.shape() != state_shape {
                        return Err(QuillError::ShapeMismatch {
                            expected: state_shape.clone(),
                            actual: t.shape(),
                            operation: "lstm state".to_string(),
                        });
                    }
                }
                (h, c)
            }
            None => (tensor::zeros(&state_shape), tensor::zeros(&state_shape)),
        };

        let steps = split_op(x, tail[0], -2)?;
        let mut outputs = Vec::with_capacity(steps.len());
        for step in &steps {
            let mut x_t = squeeze_op(step, -2)?;
            for cell in &self.cells {
                let (h_next, c_next) = cell.step(&x_t, &h, &c)?;
                h = h_next;
                c = c_next;
                x_t = h.clone();
            }
            outputs.push(x_t);
        }
        let y = stack_op(&outputs, -2)?;
        log::trace!(
            "lstm: {} steps through {} cells, output {:?}",
            steps.len(),
            self.cells.len(),
            y.shape()
        );
        Ok((y, (h, c)))
    }
}

impl Module for Lstm {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        self.forward_with_state(input, None).map(|(y, _)| y)
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        for (i, cell) in self.cells.iter().enumerate() {
            params.insert_group(format!("cell_{i}"), cell.parameters());
        }
        params
    }
}

#[cfg(test)]
#[path = "lstm_test.rs"]
mod tests;
