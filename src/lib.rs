//! Checks whether an NVIDIA API key can reach the NIM inference API and pull
//! from the NGC container registry.

pub mod config;
pub mod error;
pub mod image;
pub mod inference;
pub mod menu;
pub mod prompt;
pub mod registry;

pub use config::Config;
pub use error::CheckError;
pub use image::ImageReference;
pub use inference::{check_inference, InferenceOutcome};
pub use menu::Session;
pub use registry::{check_container, RegistryOutcome};
