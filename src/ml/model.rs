use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        Relu,
    },
    prelude::*,
    tensor::activation::softmax,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LandmarkClassifierConfig {
    /// Width of a flattened landmark vector
    pub input_width: usize,
    pub num_classes: usize,
    #[config(default = 256)]
    pub hidden_1:    usize,
    #[config(default = 128)]
    pub hidden_2:    usize,
    #[config(default = 0.2)]
    pub dropout:     f64,
}

impl LandmarkClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LandmarkClassifier<B> {
        LandmarkClassifier {
            hidden_1:   LinearConfig::new(self.input_width, self.hidden_1).init(device),
            dropout:    DropoutConfig::new(self.dropout).init(),
            hidden_2:   LinearConfig::new(self.hidden_1, self.hidden_2).init(device),
            output:     LinearConfig::new(self.hidden_2, self.num_classes).init(device),
            activation: Relu::new(),
        }
    }
}

/// input → Dense(256, relu) → Dropout(0.2) → Dense(128, relu) → Dense(K) → softmax
///
/// Dropout is only active on autodiff backends, so the same module
/// behaves deterministically once moved to the inference backend.
#[derive(Module, Debug)]
pub struct LandmarkClassifier<B: Backend> {
    pub hidden_1:   Linear<B>,
    pub dropout:    Dropout,
    pub hidden_2:   Linear<B>,
    pub output:     Linear<B>,
    pub activation: Relu,
}

impl<B: Backend> LandmarkClassifier<B> {
    /// features: [batch, width] → logits: [batch, num_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.hidden_1.forward(features));
        let x = self.dropout.forward(x);
        let x = self.activation.forward(self.hidden_2.forward(x));
        self.output.forward(x)
    }

    /// Class probabilities — each row sums to 1
    pub fn forward_probs(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(features), 1)
    }

    /// Sparse categorical cross-entropy: softmax + negative log-likelihood
    /// against integer class targets, fused on the logits.
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(features);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}
