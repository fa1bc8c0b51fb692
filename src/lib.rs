//! Backend-agnostic texture resources for the emulator renderer
//!
//! Every native backend creates, pools and transfers textures from the same
//! description:
//!
//! - [`TextureDescriptor`] says what a texture is (shape, format, flags, kind)
//!   and derives mip rectangles and linear strides from it.
//! - [`identity_hash`] / [`IdentityHasher`] turn a descriptor into a cache key.
//! - [`TexturePool`] reuses backend resources keyed by descriptor.
//! - [`StagingTexture`] is the host-visible side of a transfer, gated by its
//!   [`StagingMode`].
//! - [`backend`] translates descriptors into `wgpu-types` structures.

pub mod backend;
mod error;
mod format;
mod hash;
mod staging;
mod texture;
mod texture_pool;

use log::LevelFilter;

pub use crate::error::{Result, TextureError};
pub use crate::format::{FormatLayout, TextureFormat};
pub use crate::hash::{identity_hash, BuildIdentityHasher, IdentityHasher};
pub use crate::staging::{StagingMode, StagingTexture};
pub use crate::texture::{align_stride, TexelRect, TextureDescriptor, TextureFlags, TextureKind};
pub use crate::texture_pool::{PoolConfig, PoolStats, TexturePool};

/// Initialize logging for tools built on this crate
///
/// Logs at debug level when `EMU_TEXTURE_DEBUG` is set, info otherwise.
/// Safe to call more than once.
pub fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let log_level = if std::env::var("EMU_TEXTURE_DEBUG").is_ok() {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        env_logger::Builder::new()
            .filter_level(log_level)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_value_types_are_thread_safe() {
        assert_send_sync::<TextureDescriptor>();
        assert_send_sync::<TextureFormat>();
        assert_send_sync::<StagingMode>();
        assert_send_sync::<TexturePool<u64>>();
    }

    #[test]
    fn test_end_to_end_planning() {
        let desc = TextureDescriptor::new(
            1024,
            512,
            4,
            1,
            1,
            TextureFormat::Rgba8,
            TextureFlags::RENDER_TARGET,
            TextureKind::TwoD,
        );

        let pool: TexturePool<backend::WgpuTextureDescriptor<'static>> = TexturePool::default();
        let wgpu_desc = pool
            .acquire(&desc, |d| backend::texture_descriptor(d, Some("efb")))
            .unwrap();
        assert_eq!(wgpu_desc.mip_level_count, 4);

        let layout = backend::copy_layout(&desc, 3, wgpu_types::COPY_BYTES_PER_ROW_ALIGNMENT);
        assert_eq!(layout.bytes_per_row, Some(512));
        assert_eq!(layout.rows_per_image, Some(64));

        let staging = StagingTexture::new(
            StagingMode::Readback,
            TextureDescriptor::new_2d(128, 64, desc.format),
        )
        .unwrap();
        let staging_layout = staging.copy_layout();
        assert_eq!(staging_layout.bytes_per_row, layout.bytes_per_row);
        assert_eq!(staging_layout.rows_per_image, layout.rows_per_image);
    }
}
