use crate::error::QuillError;
use crate::nn::module::Module;
use crate::nn::parameter::Parameters;
use crate::tensor::Tensor;

/// Runs its modules in insertion order, feeding each output to the next.
///
/// Parameters are grouped under the module's position (`"0.weight"`, `"2.bias"`).
#[derive(Debug, Default)]
pub struct Sequential {
    modules: Vec<Box<dyn Module>>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a module (builder style).
    pub fn add<M: Module + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn push(&mut self, module: Box<dyn Module>) {
        self.modules.push(module);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor) -> Result<Tensor, QuillError> {
        self.modules
            .iter()
            .try_fold(input.clone(), |x, module| module.forward(&x))
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        for (i, module) in self.modules.iter().enumerate() {
            params.insert_group(i.to_string(), module.parameters());
        }
        params
    }
}
