//! Texture descriptors and mip geometry
//!
//! A `TextureDescriptor` is a pure description of a texture-like resource.
//! It never refers to a live GPU handle, which makes it usable as a cache key
//! by any backend and safe to share between threads.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use crate::error::{Result, TextureError};
use crate::format::TextureFormat;

bitflags! {
    /// Special usages a texture must support
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        /// Texture is used as a framebuffer attachment
        const RENDER_TARGET = 1 << 0;
        /// Texture is written from compute shaders
        const COMPUTE_IMAGE = 1 << 1;
        /// Texture is sampled as a cube map
        const CUBE_MAP = 1 << 2;
    }
}

/// How the layers of a texture are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TextureKind {
    /// 2D texture array, any layer count
    #[default]
    TwoDArray = 0,
    /// Plain 2D texture, conventionally a single layer
    TwoD = 1,
    /// Cube map, layers are a multiple of six
    CubeMap = 2,
}

const KIND_NAMES: [&str; 3] = ["2D Array", "2D", "Cubemap"];

impl TextureKind {
    pub fn name(self) -> &'static str {
        KIND_NAMES[self as usize]
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open texel rectangle `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TexelRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl TexelRect {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains(&self, other: &TexelRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
            && other.left <= other.right
            && other.top <= other.bottom
    }
}

impl fmt::Display for TexelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}}}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Round a row pitch up to `alignment` bytes
pub fn align_stride(stride: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two(), "alignment must be a power of two");
    (stride + alignment - 1) & !(alignment - 1)
}

/// Shape, format and capabilities of a texture
///
/// Descriptors compare structurally: two descriptors describe the same
/// resource iff all seven fields are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub levels: u32,
    pub layers: u32,
    pub samples: u32,
    pub format: TextureFormat,
    pub flags: TextureFlags,
    pub kind: TextureKind,
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            levels: 1,
            layers: 1,
            samples: 1,
            format: TextureFormat::Rgba8,
            flags: TextureFlags::empty(),
            kind: TextureKind::TwoDArray,
        }
    }
}

impl TextureDescriptor {
    /// Create a descriptor
    ///
    /// Invalid combinations are a caller error and trip a debug assertion;
    /// use `validate` to check untrusted input first.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: u32,
        height: u32,
        levels: u32,
        layers: u32,
        samples: u32,
        format: TextureFormat,
        flags: TextureFlags,
        kind: TextureKind,
    ) -> Self {
        let desc = Self {
            width,
            height,
            levels,
            layers,
            samples,
            format,
            flags,
            kind,
        };
        debug_assert!(
            desc.validate().is_ok(),
            "invalid texture descriptor: {}",
            desc
        );
        desc
    }

    /// Single-level, single-layer 2D texture
    pub fn new_2d(width: u32, height: u32, format: TextureFormat) -> Self {
        Self::new(
            width,
            height,
            1,
            1,
            1,
            format,
            TextureFlags::empty(),
            TextureKind::TwoD,
        )
    }

    /// Single-level render target
    pub fn new_render_target(width: u32, height: u32, format: TextureFormat, samples: u32) -> Self {
        Self::new(
            width,
            height,
            1,
            1,
            samples,
            format,
            TextureFlags::RENDER_TARGET,
            TextureKind::TwoDArray,
        )
    }

    /// Cube map with `levels` mips and six faces
    pub fn new_cube(size: u32, levels: u32, format: TextureFormat) -> Self {
        Self::new(
            size,
            size,
            levels,
            6,
            1,
            format,
            TextureFlags::CUBE_MAP,
            TextureKind::CubeMap,
        )
    }

    /// Check every descriptor invariant
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::invalid_descriptor(format!(
                "zero-sized texture {}x{}",
                self.width, self.height
            )));
        }
        if self.levels == 0 || self.layers == 0 || self.samples == 0 {
            return Err(TextureError::invalid_descriptor(format!(
                "levels ({}), layers ({}) and samples ({}) must be at least 1",
                self.levels, self.layers, self.samples
            )));
        }
        if self.format == TextureFormat::Undefined {
            return Err(TextureError::invalid_descriptor("format is undefined"));
        }
        if self.is_cube_map() != (self.kind == TextureKind::CubeMap) {
            return Err(TextureError::invalid_descriptor(format!(
                "cube map flag ({}) disagrees with kind {}",
                self.is_cube_map(),
                self.kind
            )));
        }
        if self.is_cube_map() && self.layers % 6 != 0 {
            return Err(TextureError::invalid_descriptor(format!(
                "cube map needs a multiple of 6 layers, got {}",
                self.layers
            )));
        }
        Ok(())
    }

    pub fn is_multisampled(&self) -> bool {
        self.samples > 1
    }

    pub fn is_render_target(&self) -> bool {
        self.flags.contains(TextureFlags::RENDER_TARGET)
    }

    pub fn is_compute_image(&self) -> bool {
        self.flags.contains(TextureFlags::COMPUTE_IMAGE)
    }

    pub fn is_cube_map(&self) -> bool {
        self.flags.contains(TextureFlags::CUBE_MAP)
    }

    /// Full rectangle of mip level 0
    pub fn rect(&self) -> TexelRect {
        TexelRect::new(0, 0, self.width, self.height)
    }

    /// Rectangle of a mip level; each axis halves and floors at one texel
    pub fn mip_rect(&self, level: u32) -> TexelRect {
        debug_assert!(
            level < self.levels,
            "mip level {} out of range for {} levels",
            level,
            self.levels
        );
        TexelRect::new(0, 0, mip_dimension(self.width, level), mip_dimension(self.height, level))
    }

    /// Bytes per row of mip level 0
    pub fn stride(&self) -> usize {
        self.format.stride_for_width(self.width)
    }

    /// Bytes per row of a mip level
    pub fn mip_stride(&self, level: u32) -> usize {
        self.format.stride_for_width(self.mip_rect(level).width())
    }

    /// Linear rows in a mip level; block rows for compressed formats
    pub fn mip_row_count(&self, level: u32) -> u32 {
        self.format.rows_for_height(self.mip_rect(level).height())
    }

    /// Tightly packed size of one layer of a mip level
    pub fn mip_byte_size(&self, level: u32) -> usize {
        debug_assert!(
            !self.is_multisampled(),
            "multisampled textures have no linear layout"
        );
        self.mip_stride(level) * self.mip_row_count(level) as usize
    }

    /// Tightly packed size of one layer including its whole mip chain
    pub fn layer_byte_size(&self) -> usize {
        (0..self.levels).map(|level| self.mip_byte_size(level)).sum()
    }

    /// Tightly packed size of every layer and mip level
    pub fn total_byte_size(&self) -> usize {
        self.layer_byte_size() * self.layers as usize
    }
}

fn mip_dimension(size: u32, level: u32) -> u32 {
    size.checked_shr(level).unwrap_or(0).max(1)
}

// Every field participates, in declaration order, so equal descriptors
// always produce equal hashes under any `Hasher`.
impl Hash for TextureDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.width);
        state.write_u32(self.height);
        state.write_u32(self.levels);
        state.write_u32(self.layers);
        state.write_u32(self.samples);
        state.write_u32(self.format as u32);
        state.write_u32(self.flags.bits());
        state.write_u32(self.kind as u32);
    }
}

impl fmt::Display for TextureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} {} levels={} layers={} samples={} kind={} flags={:?}",
            self.width,
            self.height,
            self.format,
            self.levels,
            self.layers,
            self.samples,
            self.kind,
            self.flags
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn render_target_1024x512() -> TextureDescriptor {
        TextureDescriptor::new(
            1024,
            512,
            4,
            1,
            1,
            TextureFormat::Rgba8,
            TextureFlags::RENDER_TARGET,
            TextureKind::TwoD,
        )
    }

    #[test]
    fn test_render_target_geometry() {
        let desc = render_target_1024x512();

        assert_eq!(desc.rect(), TexelRect::new(0, 0, 1024, 512));
        assert_eq!(desc.mip_rect(0), desc.rect());
        assert_eq!(desc.mip_rect(3), TexelRect::new(0, 0, 128, 64));
        assert_eq!(desc.stride(), 4096);
        assert_eq!(desc.mip_stride(3), 512);
        assert!(desc.is_render_target());
        assert!(!desc.is_compute_image());
        assert!(!desc.is_cube_map());
        assert!(!desc.is_multisampled());
    }

    #[test]
    fn test_mip_chain_floors_at_one() {
        let desc = TextureDescriptor {
            width: 8,
            height: 2,
            levels: 4,
            ..Default::default()
        };
        assert_eq!(desc.mip_rect(1), TexelRect::new(0, 0, 4, 1));
        assert_eq!(desc.mip_rect(2), TexelRect::new(0, 0, 2, 1));
        assert_eq!(desc.mip_rect(3), TexelRect::new(0, 0, 1, 1));
    }

    #[test]
    fn test_compressed_strides() {
        let desc = TextureDescriptor {
            width: 256,
            height: 256,
            levels: 9,
            format: TextureFormat::Dxt1,
            ..Default::default()
        };
        assert_eq!(desc.stride(), 512);
        // 2x2 and 1x1 mips still occupy a full 4x4 block
        assert_eq!(desc.mip_stride(7), 8);
        assert_eq!(desc.mip_stride(8), 8);
        assert_eq!(desc.mip_row_count(0), 64);
        assert_eq!(desc.mip_row_count(8), 1);
        assert_eq!(desc.mip_byte_size(0), 512 * 64);
    }

    #[test]
    fn test_byte_sizes() {
        let desc = TextureDescriptor {
            width: 4,
            height: 4,
            levels: 3,
            layers: 2,
            format: TextureFormat::R16,
            ..Default::default()
        };
        // 4x4 + 2x2 + 1x1 texels, 2 bytes each
        assert_eq!(desc.layer_byte_size(), (16 + 4 + 1) * 2);
        assert_eq!(desc.total_byte_size(), (16 + 4 + 1) * 2 * 2);
    }

    #[test]
    fn test_cube_map_validation() {
        let cube = TextureDescriptor::new_cube(64, 1, TextureFormat::Rgba8);
        assert!(cube.is_cube_map());
        assert_eq!(cube.layers % 6, 0);
        assert!(cube.validate().is_ok());

        let bad_layers = TextureDescriptor { layers: 4, ..cube };
        assert!(bad_layers.validate().is_err());

        let kind_mismatch = TextureDescriptor {
            kind: TextureKind::TwoDArray,
            ..cube
        };
        assert!(kind_mismatch.validate().is_err());

        let flag_missing = TextureDescriptor {
            flags: TextureFlags::empty(),
            ..cube
        };
        assert!(!flag_missing.is_cube_map());
        assert!(flag_missing.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zeroes_and_undefined() {
        let valid = TextureDescriptor::default();
        assert!(valid.validate().is_ok());
        assert!(TextureDescriptor { width: 0, ..valid }.validate().is_err());
        assert!(TextureDescriptor { levels: 0, ..valid }.validate().is_err());
        assert!(TextureDescriptor { samples: 0, ..valid }.validate().is_err());
        assert!(TextureDescriptor {
            format: TextureFormat::Undefined,
            ..valid
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_flag_predicates_are_independent() {
        let desc = TextureDescriptor {
            flags: TextureFlags::RENDER_TARGET | TextureFlags::COMPUTE_IMAGE,
            samples: 4,
            ..Default::default()
        };
        assert!(desc.is_render_target());
        assert!(desc.is_compute_image());
        assert!(!desc.is_cube_map());
        assert!(desc.is_multisampled());
    }

    #[test]
    fn test_equality_is_structural() {
        let a = render_target_1024x512();
        let b = render_target_1024x512();
        assert_eq!(a, b);
        assert_ne!(a, TextureDescriptor { samples: 2, ..a });
        assert_ne!(a, TextureDescriptor { kind: TextureKind::TwoDArray, ..a });
        assert_ne!(a, TextureDescriptor { flags: TextureFlags::empty(), ..a });
    }

    #[test]
    fn test_display_names() {
        assert_eq!(TextureKind::TwoDArray.to_string(), "2D Array");
        assert_eq!(TextureKind::CubeMap.to_string(), "Cubemap");
        assert_eq!(TexelRect::new(0, 0, 128, 64).to_string(), "{0, 0, 128, 64}");
    }

    #[test]
    fn test_align_stride() {
        assert_eq!(align_stride(1, 256), 256);
        assert_eq!(align_stride(256, 256), 256);
        assert_eq!(align_stride(4100, 256), 4352);
    }

    #[test]
    #[should_panic(expected = "has no memory layout")]
    fn test_undefined_format_has_no_stride() {
        let desc = TextureDescriptor {
            format: TextureFormat::Undefined,
            ..Default::default()
        };
        desc.stride();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_mip_rect_past_last_level() {
        render_target_1024x512().mip_rect(4);
    }

    proptest! {
        #[test]
        fn mip_rect_follows_halving_rule(
            width in 1u32..=16384,
            height in 1u32..=16384,
            levels in 1u32..=15,
        ) {
            let desc = TextureDescriptor { width, height, levels, ..Default::default() };
            prop_assert_eq!(desc.mip_rect(0), desc.rect());
            for level in 0..levels {
                let rect = desc.mip_rect(level);
                prop_assert_eq!(rect.width(), (width >> level).max(1));
                prop_assert_eq!(rect.height(), (height >> level).max(1));
                prop_assert_eq!(desc.mip_stride(level), rect.width() as usize * 4);
            }
        }
    }
}
