//! Super-resolution models.
//!
//! A model is driven in three steps per sample, mirroring how test loops
//! talk to a trained network:
//!
//! 1. [`SuperResolver::feed_data`] hands over the low-quality input and its
//!    ground truth.
//! 2. [`SuperResolver::test`] runs inference.
//! 3. [`SuperResolver::current_visuals`] returns the estimate and reference.
//!
//! Neural backends implement the trait outside this crate; the built-in
//! [`InterpolationModel`] provides classic upscaling baselines.

mod interpolation;

use std::path::Path;

use imgref::ImgVec;
use rgb::RGB8;

pub use interpolation::{Interpolation, InterpolationModel};

use crate::data::Sample;
use crate::error::{Error, Result};
use crate::options::Options;

/// Images produced by the last [`SuperResolver::test`] call.
#[derive(Debug, Clone)]
pub struct Visuals {
    /// Model output.
    pub estimated: ImgVec<RGB8>,
    /// Ground truth for the same sample.
    pub reference: ImgVec<RGB8>,
}

/// Model wrapper used by the evaluation loop.
pub trait SuperResolver {
    /// Model identifier for logs and errors.
    fn name(&self) -> &str;

    /// Restore weights. `None` means no checkpoint was found.
    fn load(&mut self, checkpoint: Option<&Path>) -> Result<()>;

    /// Set the current sample.
    fn feed_data(&mut self, sample: &Sample);

    /// Run inference on the current sample.
    fn test(&mut self) -> Result<()>;

    /// Estimate and reference for the current sample.
    fn current_visuals(&self) -> Result<Visuals>;
}

/// Model wrapper kinds this crate can drive.
pub const SUPPORTED_WRAPPERS: &[&str] = &["plain"];

/// Build the generator described by `options.netG`.
///
/// `options.model` selects the wrapper around the generator; only the
/// single-generator `"plain"` wrapper exists. The generator weights
/// (`pretrained_netG`) are loaded before returning.
pub fn define_model(options: &Options) -> Result<Box<dyn SuperResolver>> {
    if !SUPPORTED_WRAPPERS.contains(&options.model.as_str()) {
        return Err(Error::Model {
            model: options.model.clone(),
            message: format!("unsupported model wrapper, expected one of {SUPPORTED_WRAPPERS:?}"),
        });
    }

    let net_type = options.net_g.net_type.as_str();
    let mut model: Box<dyn SuperResolver> = match Interpolation::from_name(net_type) {
        Some(method) => Box::new(InterpolationModel::new(method, options.scale)),
        None => {
            return Err(Error::Model {
                model: net_type.to_string(),
                message: "unknown network type".to_string(),
            });
        }
    };
    model.load(options.path.pretrained_net_g.as_deref())?;
    Ok(model)
}
