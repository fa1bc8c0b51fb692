//! Error types for texture resource management
//!
//! The descriptor and geometry code never returns these: contract violations
//! there are assertions. Errors surface at the layers that talk to a backend,
//! namely the texture pool and the wgpu translation.

use std::fmt;
use thiserror::Error;

use crate::format::TextureFormat;

/// Result type alias for texture operations
pub type Result<T> = std::result::Result<T, TextureError>;

/// Main error type for texture resource management
#[derive(Error, Debug)]
pub enum TextureError {
    // === Descriptor errors ===
    #[error("Invalid texture descriptor: {reason}")]
    InvalidDescriptor { reason: String },

    #[error("Format {format} has no backend equivalent")]
    UnsupportedFormat { format: TextureFormat },

    // === Resource errors ===
    #[error("Resource creation failed: {resource_type}: {reason}")]
    ResourceCreation {
        resource_type: String,
        reason: String,
    },

    // === Memory errors ===
    #[error("Out of GPU memory: {context}")]
    OutOfMemory { context: String },

    // === Parameter errors ===
    #[error("Invalid parameter: {parameter}: {reason}")]
    InvalidParameter { parameter: String, reason: String },
}

// Helper constructors for common error patterns
impl TextureError {
    /// Create an invalid descriptor error
    pub fn invalid_descriptor(reason: impl fmt::Display) -> Self {
        Self::InvalidDescriptor {
            reason: reason.to_string(),
        }
    }

    /// Create a resource creation error
    pub fn resource_creation(resource_type: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::ResourceCreation {
            resource_type: resource_type.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an out-of-memory error
    pub fn out_of_memory(context: impl fmt::Display) -> Self {
        Self::OutOfMemory {
            context: context.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TextureError::resource_creation("texture", "device lost");
        assert_eq!(
            err.to_string(),
            "Resource creation failed: texture: device lost"
        );

        let err = TextureError::UnsupportedFormat {
            format: TextureFormat::Undefined,
        };
        assert_eq!(err.to_string(), "Format Undefined has no backend equivalent");
    }
}
