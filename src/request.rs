//! Request types shared by the view model and the generation client

use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Slider positions per unit; granularity is 0.01
pub const SAMPLING_STEPS: f32 = 100.0;

/// Sampling knobs forwarded untouched to the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig
{   /// Randomness, in [0, 1]
    pub temperature: f32
  , /// Nucleus sampling mass, in [0, 1]
    pub top_p: f32
}

impl Default for SamplingConfig
{   fn default() -> Self
    {   SamplingConfig
        {   temperature: DEFAULT_TEMPERATURE
          , top_p: DEFAULT_TOP_P
        }
    }
}

impl SamplingConfig
{   /// Clamp to [0, 1] and round to the slider step.
    /// Returns None for NaN or infinities.
    pub fn snap(value: f32) -> Option<f32>
    {   if !value.is_finite()
        {   return None;
        }
        // divide the whole step count so 0.1 stays the f32 nearest 0.1
        let steps = (value.clamp(0.0, 1.0) * SAMPLING_STEPS).round();
        Some(steps / SAMPLING_STEPS)
    }

    /// Returns false when the value was rejected
    pub fn set_temperature(&mut self, value: f32) -> bool
    {   match Self::snap(value)
        {   Some(v) => { self.temperature = v; true }
          , None => false
        }
    }

    /// Returns false when the value was rejected
    pub fn set_top_p(&mut self, value: f32) -> bool
    {   match Self::snap(value)
        {   Some(v) => { self.top_p = v; true }
          , None => false
        }
    }
}

/// One humanize call: the text plus the sampling in force when submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizeRequest
{   pub text: String
  , pub sampling: SamplingConfig
}

impl HumanizeRequest
{   pub fn new(text: impl Into<String>, sampling: SamplingConfig) -> Self
    {   HumanizeRequest
        {   text: text.into()
          , sampling
        }
    }
}
