//! Support rules for layers gated only by element type.

use crate::tensor::DataType;

use super::{unsupported, Support};

pub const FLOAT16_REJECTED_REASON: &str = "Layer is not supported with float16 data type";
pub const QUANTISED_REJECTED_REASON: &str = "Layer is not supported with 8-bit data type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTypeRule {
    Accept,
    Reject(&'static str),
}

impl DataTypeRule {
    fn apply(self) -> Support {
        match self {
            DataTypeRule::Accept => Ok(()),
            DataTypeRule::Reject(reason) => unsupported(reason),
        }
    }
}

/// One rule per element type that has a capability path.
///
/// Element types without a row (`Signed32`) are unsupported without
/// consulting any rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTypeMatrix {
    pub float16: DataTypeRule,
    pub float32: DataTypeRule,
    pub quantised_asymm8: DataTypeRule,
}

impl DataTypeMatrix {
    /// Constant, Input, Output, Reshape, Splitter, Merger.
    pub const FLOAT_OR_QUANTISED: DataTypeMatrix =
        DataTypeMatrix::from_pair(DataTypeRule::Accept, DataTypeRule::Accept);

    /// Floor: the kernel only exists for Float32.
    pub const FLOAT32_ONLY: DataTypeMatrix = DataTypeMatrix {
        float16: DataTypeRule::Reject(FLOAT16_REJECTED_REASON),
        float32: DataTypeRule::Accept,
        quantised_asymm8: DataTypeRule::Reject(QUANTISED_REJECTED_REASON),
    };

    /// The float rule covers both floating-point types.
    pub const fn from_pair(float: DataTypeRule, quantised: DataTypeRule) -> Self {
        Self {
            float16: float,
            float32: float,
            quantised_asymm8: quantised,
        }
    }

    pub fn rule(&self, data_type: DataType) -> Option<DataTypeRule> {
        match data_type {
            DataType::Float16 => Some(self.float16),
            DataType::Float32 => Some(self.float32),
            DataType::QuantisedAsymm8 => Some(self.quantised_asymm8),
            DataType::Signed32 => None,
        }
    }

    pub fn check(&self, data_type: DataType) -> Support {
        match self.rule(data_type) {
            Some(rule) => rule.apply(),
            None => unsupported(format!("Unsupported data type {}", data_type)),
        }
    }
}
