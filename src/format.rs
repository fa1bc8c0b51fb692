//! Backend-neutral texture format catalog
//!
//! Every format the renderer can ask a backend for is listed here, together
//! with a static memory layout table used for stride and transfer math.

use std::fmt;
use std::str::FromStr;

use wgpu_types as wgt;

use crate::error::TextureError;

/// Pixel and depth formats shared by every backend
///
/// `Undefined` marks a format that has not been resolved yet. It has no
/// layout and must never reach geometry computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum TextureFormat {
    Rgba8,
    Bgra8,
    Rgb10A2,
    Rgba16F,
    Dxt1,
    Dxt3,
    Dxt5,
    Bptc,
    R16,
    D16,
    D24S8,
    R32F,
    D32F,
    D32FS8,
    Undefined,
}

/// How a format lays out its bytes in linear memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatLayout {
    /// Fixed number of bytes per texel
    Texel { bytes: u32 },
    /// Fixed-size encoded blocks covering `width` x `height` texels
    Block { width: u32, height: u32, bytes: u32 },
}

const FORMAT_COUNT: usize = TextureFormat::Undefined as usize + 1;

/// Memory layouts, indexed by format ordinal
const FORMAT_LAYOUTS: [Option<FormatLayout>; FORMAT_COUNT] = [
    Some(FormatLayout::Texel { bytes: 4 }), // Rgba8
    Some(FormatLayout::Texel { bytes: 4 }), // Bgra8
    Some(FormatLayout::Texel { bytes: 4 }), // Rgb10A2
    Some(FormatLayout::Texel { bytes: 8 }), // Rgba16F
    Some(FormatLayout::Block { width: 4, height: 4, bytes: 8 }), // Dxt1
    Some(FormatLayout::Block { width: 4, height: 4, bytes: 16 }), // Dxt3
    Some(FormatLayout::Block { width: 4, height: 4, bytes: 16 }), // Dxt5
    Some(FormatLayout::Block { width: 4, height: 4, bytes: 16 }), // Bptc
    Some(FormatLayout::Texel { bytes: 2 }), // R16
    Some(FormatLayout::Texel { bytes: 2 }), // D16
    Some(FormatLayout::Texel { bytes: 4 }), // D24S8
    Some(FormatLayout::Texel { bytes: 4 }), // R32F
    Some(FormatLayout::Texel { bytes: 4 }), // D32F
    Some(FormatLayout::Texel { bytes: 8 }), // D32FS8
    None,                                   // Undefined
];

/// Diagnostic names, indexed by format ordinal
const FORMAT_NAMES: [&str; FORMAT_COUNT] = [
    "RGBA8", "BGRA8", "RGB10_A2", "RGBA16F", "DXT1", "DXT3", "DXT5", "BPTC", "R16", "D16",
    "D24_S8", "R32F", "D32F", "D32F_S8", "Undefined",
];

impl TextureFormat {
    /// All formats in ordinal order, `Undefined` last
    pub const ALL: [TextureFormat; FORMAT_COUNT] = [
        TextureFormat::Rgba8,
        TextureFormat::Bgra8,
        TextureFormat::Rgb10A2,
        TextureFormat::Rgba16F,
        TextureFormat::Dxt1,
        TextureFormat::Dxt3,
        TextureFormat::Dxt5,
        TextureFormat::Bptc,
        TextureFormat::R16,
        TextureFormat::D16,
        TextureFormat::D24S8,
        TextureFormat::R32F,
        TextureFormat::D32F,
        TextureFormat::D32FS8,
        TextureFormat::Undefined,
    ];

    /// Diagnostic name of the format
    pub fn name(self) -> &'static str {
        FORMAT_NAMES[self as usize]
    }

    /// Memory layout, `None` for `Undefined`
    pub fn layout(self) -> Option<FormatLayout> {
        FORMAT_LAYOUTS[self as usize]
    }

    fn defined_layout(self) -> FormatLayout {
        match self.layout() {
            Some(layout) => layout,
            None => panic!("format {} has no memory layout", self),
        }
    }

    pub fn is_compressed(self) -> bool {
        matches!(self.layout(), Some(FormatLayout::Block { .. }))
    }

    pub fn is_depth(self) -> bool {
        matches!(
            self,
            TextureFormat::D16 | TextureFormat::D24S8 | TextureFormat::D32F | TextureFormat::D32FS8
        )
    }

    pub fn is_stencil(self) -> bool {
        matches!(self, TextureFormat::D24S8 | TextureFormat::D32FS8)
    }

    /// Bytes per texel of an uncompressed format
    ///
    /// Panics for block-compressed formats and `Undefined`.
    pub fn texel_size(self) -> u32 {
        match self.defined_layout() {
            FormatLayout::Texel { bytes } => bytes,
            FormatLayout::Block { .. } => panic!("format {} is block-compressed", self),
        }
    }

    /// Bytes per block; uncompressed formats are 1x1 blocks
    pub fn block_size(self) -> u32 {
        match self.defined_layout() {
            FormatLayout::Texel { bytes } | FormatLayout::Block { bytes, .. } => bytes,
        }
    }

    /// Texel extent of one block as `(width, height)`
    pub fn block_extent(self) -> (u32, u32) {
        match self.defined_layout() {
            FormatLayout::Texel { .. } => (1, 1),
            FormatLayout::Block { width, height, .. } => (width, height),
        }
    }

    /// Bytes per row for a row of `width` texels
    pub fn stride_for_width(self, width: u32) -> usize {
        let (block_width, _) = self.block_extent();
        width.div_ceil(block_width) as usize * self.block_size() as usize
    }

    /// Number of linear rows covering `height` texels (block rows if compressed)
    pub fn rows_for_height(self, height: u32) -> u32 {
        let (_, block_height) = self.block_extent();
        height.div_ceil(block_height)
    }

    /// Color format that can hold a copy of this depth format's values
    pub fn color_format_for_depth(self) -> TextureFormat {
        match self {
            TextureFormat::D16 => TextureFormat::R16,
            TextureFormat::D24S8 => TextureFormat::Rgba8,
            TextureFormat::D32F | TextureFormat::D32FS8 => TextureFormat::R32F,
            other => other,
        }
    }

    /// Equivalent wgpu format, `None` for `Undefined`
    pub fn to_wgpu(self) -> Option<wgt::TextureFormat> {
        Some(match self {
            TextureFormat::Rgba8 => wgt::TextureFormat::Rgba8Unorm,
            TextureFormat::Bgra8 => wgt::TextureFormat::Bgra8Unorm,
            TextureFormat::Rgb10A2 => wgt::TextureFormat::Rgb10a2Unorm,
            TextureFormat::Rgba16F => wgt::TextureFormat::Rgba16Float,
            TextureFormat::Dxt1 => wgt::TextureFormat::Bc1RgbaUnorm,
            TextureFormat::Dxt3 => wgt::TextureFormat::Bc2RgbaUnorm,
            TextureFormat::Dxt5 => wgt::TextureFormat::Bc3RgbaUnorm,
            TextureFormat::Bptc => wgt::TextureFormat::Bc7RgbaUnorm,
            TextureFormat::R16 => wgt::TextureFormat::R16Unorm,
            TextureFormat::D16 => wgt::TextureFormat::Depth16Unorm,
            TextureFormat::D24S8 => wgt::TextureFormat::Depth24PlusStencil8,
            TextureFormat::R32F => wgt::TextureFormat::R32Float,
            TextureFormat::D32F => wgt::TextureFormat::Depth32Float,
            TextureFormat::D32FS8 => wgt::TextureFormat::Depth32FloatStencil8,
            TextureFormat::Undefined => return None,
        })
    }

    /// Catalog entry for a wgpu format; sRGB variants fold onto their linear entry
    pub fn from_wgpu(format: wgt::TextureFormat) -> TextureFormat {
        match format {
            wgt::TextureFormat::Rgba8Unorm | wgt::TextureFormat::Rgba8UnormSrgb => {
                TextureFormat::Rgba8
            }
            wgt::TextureFormat::Bgra8Unorm | wgt::TextureFormat::Bgra8UnormSrgb => {
                TextureFormat::Bgra8
            }
            wgt::TextureFormat::Rgb10a2Unorm => TextureFormat::Rgb10A2,
            wgt::TextureFormat::Rgba16Float => TextureFormat::Rgba16F,
            wgt::TextureFormat::Bc1RgbaUnorm | wgt::TextureFormat::Bc1RgbaUnormSrgb => {
                TextureFormat::Dxt1
            }
            wgt::TextureFormat::Bc2RgbaUnorm | wgt::TextureFormat::Bc2RgbaUnormSrgb => {
                TextureFormat::Dxt3
            }
            wgt::TextureFormat::Bc3RgbaUnorm | wgt::TextureFormat::Bc3RgbaUnormSrgb => {
                TextureFormat::Dxt5
            }
            wgt::TextureFormat::Bc7RgbaUnorm | wgt::TextureFormat::Bc7RgbaUnormSrgb => {
                TextureFormat::Bptc
            }
            wgt::TextureFormat::R16Unorm => TextureFormat::R16,
            wgt::TextureFormat::Depth16Unorm => TextureFormat::D16,
            wgt::TextureFormat::Depth24PlusStencil8 => TextureFormat::D24S8,
            wgt::TextureFormat::R32Float => TextureFormat::R32F,
            wgt::TextureFormat::Depth32Float => TextureFormat::D32F,
            wgt::TextureFormat::Depth32FloatStencil8 => TextureFormat::D32FS8,
            _ => TextureFormat::Undefined,
        }
    }

    /// Device features a wgpu backend must enable to create this format
    pub fn required_features(self) -> wgt::Features {
        match self {
            TextureFormat::Dxt1 | TextureFormat::Dxt3 | TextureFormat::Dxt5 | TextureFormat::Bptc => {
                wgt::Features::TEXTURE_COMPRESSION_BC
            }
            TextureFormat::R16 => wgt::Features::TEXTURE_FORMAT_16BIT_NORM,
            TextureFormat::D32FS8 => wgt::Features::DEPTH32FLOAT_STENCIL8,
            _ => wgt::Features::empty(),
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextureFormat {
    type Err = TextureError;

    /// Parses a diagnostic name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextureFormat::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TextureError::invalid_parameter("format", format!("unknown format '{}'", s)))
    }
}
