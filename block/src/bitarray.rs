//! Voter bit array.
//!
//! Index `i` corresponds to committee member `i` in the epoch's member
//! ordering. The compact wire form is a JSON string of `x` (set) and `_`
//! (unset) characters, e.g. `"x_xx"`.

use crate::error::BlockError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitArray {
    bits: Vec<bool>,
}

impl BitArray {
    pub fn new(size: usize) -> Self {
        Self {
            bits: vec![false; size],
        }
    }

    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// Set or clear a bit. Out-of-range indices are ignored.
    pub fn set_index(&mut self, index: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = value;
        }
    }

    pub fn get_index(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Indices of set bits, ascending.
    pub fn set_indices(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.then_some(i))
            .collect()
    }

    /// The compact JSON-string wire form, quotes included.
    pub fn to_json_string(&self) -> String {
        let body: String = self
            .bits
            .iter()
            .map(|b| if *b { 'x' } else { '_' })
            .collect();
        serde_json::to_string(&body).expect("string is always encodable")
    }

    /// Parse the compact JSON-string wire form.
    pub fn from_json_string(raw: &str) -> Result<Self, BlockError> {
        let body: String =
            serde_json::from_str(raw).map_err(|e| BlockError::BadBitArray(e.to_string()))?;
        let mut bits = Vec::with_capacity(body.len());
        for c in body.chars() {
            match c {
                'x' => bits.push(true),
                '_' => bits.push(false),
                other => {
                    return Err(BlockError::BadBitArray(format!(
                        "unexpected character {other:?}"
                    )))
                }
            }
        }
        Ok(Self { bits })
    }
}
