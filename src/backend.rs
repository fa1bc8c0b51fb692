//! Translation of texture descriptors into wgpu-types descriptors
//!
//! Backend factories built on wgpu call these helpers to turn a
//! backend-neutral `TextureDescriptor` into the `wgt` structures that
//! `device_create_texture` and the queue copy functions expect.

use std::borrow::Cow;

use wgpu_types as wgt;

use crate::error::{Result, TextureError};
use crate::texture::{align_stride, TextureDescriptor, TextureKind};

/// wgpu texture descriptor with owned label and view formats
pub type WgpuTextureDescriptor<'a> =
    wgt::TextureDescriptor<Option<Cow<'a, str>>, Vec<wgt::TextureFormat>>;

/// Usage flags a texture needs for its capability flags
///
/// Every texture can be sampled and copied; render targets and compute
/// images add the matching attachment or storage usage.
pub fn texture_usages(desc: &TextureDescriptor) -> wgt::TextureUsages {
    let mut usage = wgt::TextureUsages::TEXTURE_BINDING
        | wgt::TextureUsages::COPY_SRC
        | wgt::TextureUsages::COPY_DST;
    if desc.is_render_target() {
        usage |= wgt::TextureUsages::RENDER_ATTACHMENT;
    }
    if desc.is_compute_image() {
        usage |= wgt::TextureUsages::STORAGE_BINDING;
    }
    usage
}

/// View dimension used when binding the whole texture
///
/// A `TwoD` texture maps to a single-layer `D2` view, so it must have one
/// layer; `texture_descriptor` rejects anything else.
pub fn view_dimension(desc: &TextureDescriptor) -> wgt::TextureViewDimension {
    match desc.kind {
        TextureKind::TwoDArray => wgt::TextureViewDimension::D2Array,
        TextureKind::TwoD => wgt::TextureViewDimension::D2,
        TextureKind::CubeMap if desc.layers == 6 => wgt::TextureViewDimension::Cube,
        TextureKind::CubeMap => wgt::TextureViewDimension::CubeArray,
    }
}

/// Extent of a mip level, one entry per array layer
pub fn mip_extent(desc: &TextureDescriptor, level: u32) -> wgt::Extent3d {
    let rect = desc.mip_rect(level);
    wgt::Extent3d {
        width: rect.width(),
        height: rect.height(),
        depth_or_array_layers: desc.layers,
    }
}

/// Build the wgpu descriptor for a texture
pub fn texture_descriptor<'a>(
    desc: &TextureDescriptor,
    label: Option<&'a str>,
) -> Result<WgpuTextureDescriptor<'a>> {
    desc.validate()?;
    let format = desc
        .format
        .to_wgpu()
        .ok_or(TextureError::UnsupportedFormat {
            format: desc.format,
        })?;

    if desc.kind == TextureKind::TwoD && desc.layers > 1 {
        return Err(TextureError::invalid_descriptor(format!(
            "2D texture cannot have {} layers",
            desc.layers
        )));
    }

    if desc.is_multisampled() && desc.levels > 1 {
        return Err(TextureError::invalid_descriptor(format!(
            "multisampled texture cannot have {} mip levels",
            desc.levels
        )));
    }

    Ok(wgt::TextureDescriptor {
        label: label.map(Cow::Borrowed),
        size: wgt::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: desc.layers,
        },
        mip_level_count: desc.levels,
        sample_count: desc.samples,
        dimension: wgt::TextureDimension::D2,
        format,
        usage: texture_usages(desc),
        view_formats: vec![],
    })
}

/// Buffer layout for copying one mip level to or from a linear buffer
///
/// `row_alignment` is the backend's row pitch requirement, usually
/// `wgt::COPY_BYTES_PER_ROW_ALIGNMENT`.
pub fn copy_layout(desc: &TextureDescriptor, level: u32, row_alignment: u32) -> wgt::TexelCopyBufferLayout {
    let bytes_per_row = u32::try_from(align_stride(desc.mip_stride(level), row_alignment as usize));
    debug_assert!(
        bytes_per_row.is_ok(),
        "row pitch of mip level {} does not fit in 32 bits",
        level
    );
    wgt::TexelCopyBufferLayout {
        offset: 0,
        bytes_per_row: bytes_per_row.ok(),
        rows_per_image: Some(desc.mip_row_count(level)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TextureFormat;
    use crate::texture::TextureFlags;

    #[test]
    fn test_render_target_descriptor() {
        let desc = TextureDescriptor::new_render_target(1920, 1080, TextureFormat::Bgra8, 4);
        let wgpu_desc = texture_descriptor(&desc, Some("EFB color")).unwrap();

        assert_eq!(wgpu_desc.label.as_deref(), Some("EFB color"));
        assert_eq!(wgpu_desc.size.width, 1920);
        assert_eq!(wgpu_desc.size.height, 1080);
        assert_eq!(wgpu_desc.size.depth_or_array_layers, 1);
        assert_eq!(wgpu_desc.sample_count, 4);
        assert_eq!(wgpu_desc.format, wgt::TextureFormat::Bgra8Unorm);
        assert!(wgpu_desc
            .usage
            .contains(wgt::TextureUsages::RENDER_ATTACHMENT));
        assert!(!wgpu_desc.usage.contains(wgt::TextureUsages::STORAGE_BINDING));
    }

    #[test]
    fn test_compute_image_usage() {
        let desc = TextureDescriptor {
            flags: TextureFlags::COMPUTE_IMAGE,
            ..Default::default()
        };
        let usage = texture_usages(&desc);
        assert!(usage.contains(wgt::TextureUsages::STORAGE_BINDING));
        assert!(usage.contains(wgt::TextureUsages::TEXTURE_BINDING));
        assert!(!usage.contains(wgt::TextureUsages::RENDER_ATTACHMENT));
    }

    #[test]
    fn test_view_dimensions() {
        let cube = TextureDescriptor::new_cube(128, 1, TextureFormat::Rgba8);
        assert_eq!(view_dimension(&cube), wgt::TextureViewDimension::Cube);

        let cube_array = TextureDescriptor { layers: 12, ..cube };
        assert_eq!(view_dimension(&cube_array), wgt::TextureViewDimension::CubeArray);

        let plain = TextureDescriptor::new_2d(16, 16, TextureFormat::Rgba8);
        assert_eq!(view_dimension(&plain), wgt::TextureViewDimension::D2);
        assert_eq!(
            view_dimension(&TextureDescriptor::default()),
            wgt::TextureViewDimension::D2Array
        );
    }

    #[test]
    fn test_rejects_invalid_and_undefined() {
        let undefined = TextureDescriptor {
            format: TextureFormat::Undefined,
            ..Default::default()
        };
        assert!(matches!(
            texture_descriptor(&undefined, None),
            Err(TextureError::InvalidDescriptor { .. })
        ));

        let msaa_mips = TextureDescriptor {
            samples: 4,
            levels: 2,
            width: 64,
            height: 64,
            ..Default::default()
        };
        assert!(texture_descriptor(&msaa_mips, None).is_err());
    }

    #[test]
    fn test_rejects_layered_2d() {
        let layered = TextureDescriptor {
            layers: 4,
            ..TextureDescriptor::new_2d(64, 64, TextureFormat::Rgba8)
        };
        assert!(layered.validate().is_ok());
        assert!(matches!(
            texture_descriptor(&layered, None),
            Err(TextureError::InvalidDescriptor { .. })
        ));

        let array = TextureDescriptor {
            kind: TextureKind::TwoDArray,
            ..layered
        };
        assert!(texture_descriptor(&array, None).is_ok());
        assert_eq!(view_dimension(&array), wgt::TextureViewDimension::D2Array);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit in 32 bits")]
    fn test_copy_layout_rejects_oversized_rows() {
        let desc = TextureDescriptor::new_2d(1 << 30, 1, TextureFormat::Rgba8);
        copy_layout(&desc, 0, wgt::COPY_BYTES_PER_ROW_ALIGNMENT);
    }

    #[test]
    fn test_copy_layout_alignment() {
        let desc = TextureDescriptor {
            width: 100,
            height: 10,
            levels: 2,
            ..Default::default()
        };
        let layout = copy_layout(&desc, 0, wgt::COPY_BYTES_PER_ROW_ALIGNMENT);
        assert_eq!(layout.bytes_per_row, Some(512));
        assert_eq!(layout.rows_per_image, Some(10));

        let mip = mip_extent(&desc, 1);
        assert_eq!((mip.width, mip.height), (50, 5));
    }

    #[test]
    fn test_compressed_copy_layout_counts_block_rows() {
        let desc = TextureDescriptor {
            width: 256,
            height: 256,
            format: TextureFormat::Dxt1,
            ..Default::default()
        };
        let layout = copy_layout(&desc, 0, wgt::COPY_BYTES_PER_ROW_ALIGNMENT);
        assert_eq!(layout.bytes_per_row, Some(512));
        assert_eq!(layout.rows_per_image, Some(64));
    }
}
