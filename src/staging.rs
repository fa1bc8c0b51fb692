//! Staging textures for host/device transfers
//!
//! A staging texture is the host-visible half of a transfer. Its
//! `StagingMode` is fixed at creation and decides which host operations are
//! legal; using the wrong one is a programming error and panics.
//!
//! How a backend keeps the mapping coherent with the device (fences, partial
//! mapping) is its own business. `device_bytes` and `device_bytes_mut` give
//! it unrestricted access for that purpose.

use std::fmt;

use wgpu_types as wgt;

use crate::error::{Result, TextureError};
use crate::format::FormatLayout;
use crate::texture::{align_stride, TexelRect, TextureDescriptor};

/// Transfer direction a staging resource is optimized for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagingMode {
    /// Device writes, host reads; no host writes
    Readback,
    /// Host writes, device reads; no host reads
    Upload,
    /// Device writes, host reads, tolerating slow partial or repeated host
    /// access; host writes are also allowed
    Mutable,
}

const MODE_NAMES: [&str; 3] = ["Readback", "Upload", "Mutable"];

impl StagingMode {
    pub fn name(self) -> &'static str {
        MODE_NAMES[self as usize]
    }

    pub fn allows_host_read(self) -> bool {
        !matches!(self, StagingMode::Upload)
    }

    pub fn allows_host_write(self) -> bool {
        !matches!(self, StagingMode::Readback)
    }

    /// Buffer usages for a wgpu buffer backing this mode
    pub fn buffer_usages(self) -> wgt::BufferUsages {
        match self {
            StagingMode::Readback => wgt::BufferUsages::MAP_READ | wgt::BufferUsages::COPY_DST,
            StagingMode::Upload => wgt::BufferUsages::MAP_WRITE | wgt::BufferUsages::COPY_SRC,
            StagingMode::Mutable => {
                wgt::BufferUsages::MAP_READ
                    | wgt::BufferUsages::MAP_WRITE
                    | wgt::BufferUsages::COPY_DST
                    | wgt::BufferUsages::COPY_SRC
            }
        }
    }

    /// Device features needed for `buffer_usages`
    ///
    /// wgpu only allows MAP_READ and MAP_WRITE on the same buffer with
    /// mappable primary buffers.
    pub fn required_features(self) -> wgt::Features {
        match self {
            StagingMode::Mutable => wgt::Features::MAPPABLE_PRIMARY_BUFFERS,
            StagingMode::Readback | StagingMode::Upload => wgt::Features::empty(),
        }
    }
}

impl fmt::Display for StagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-side mapping of a single-level staging texture
pub struct StagingTexture {
    mode: StagingMode,
    desc: TextureDescriptor,
    stride: usize,
    data: Vec<u8>,
}

impl StagingTexture {
    /// Create a zero-filled staging texture
    ///
    /// Rows are padded to `wgt::COPY_BYTES_PER_ROW_ALIGNMENT` so the buffer
    /// can be the source or destination of a texture copy as-is.
    pub fn new(mode: StagingMode, desc: TextureDescriptor) -> Result<Self> {
        desc.validate()?;
        if desc.levels != 1 || desc.layers != 1 || desc.is_multisampled() {
            return Err(TextureError::invalid_descriptor(format!(
                "staging textures hold one level, one layer and one sample: {}",
                desc
            )));
        }

        let stride = align_stride(desc.stride(), wgt::COPY_BYTES_PER_ROW_ALIGNMENT as usize);
        if u32::try_from(stride).is_err() {
            return Err(TextureError::invalid_descriptor(format!(
                "staging row pitch of {} bytes does not fit in 32 bits",
                stride
            )));
        }
        let size = stride * desc.mip_row_count(0) as usize;

        log::debug!(
            "Created {} staging texture: {}x{} {}, {} bytes (stride {})",
            mode,
            desc.width,
            desc.height,
            desc.format,
            size,
            stride
        );

        Ok(Self {
            mode,
            desc,
            stride,
            data: vec![0; size],
        })
    }

    pub fn mode(&self) -> StagingMode {
        self.mode
    }

    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.desc
    }

    /// Row pitch of the mapping in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Layout of the mapping for texture/buffer copies
    pub fn copy_layout(&self) -> wgt::TexelCopyBufferLayout {
        let bytes_per_row = u32::try_from(self.stride);
        debug_assert!(bytes_per_row.is_ok(), "stride checked at creation");
        wgt::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: bytes_per_row.ok(),
            rows_per_image: Some(self.desc.mip_row_count(0)),
        }
    }

    /// Raw mapping, as seen by the device side of a transfer
    pub fn device_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw mapping, as written by the device side of a transfer
    pub fn device_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copy `rect` out of the mapping into `dst`, whose rows are `dst_stride` apart
    pub fn read_texels(&self, rect: &TexelRect, dst: &mut [u8], dst_stride: usize) {
        assert!(
            self.mode.allows_host_read(),
            "host reads are not allowed on {} staging textures",
            self.mode
        );
        let span = self.span(rect);
        check_host_buffer(&span, dst.len(), dst_stride);

        for row in 0..span.rows {
            let src_offset = (span.first_row + row) * self.stride + span.x_offset;
            let dst_offset = row * dst_stride;
            dst[dst_offset..dst_offset + span.row_bytes]
                .copy_from_slice(&self.data[src_offset..src_offset + span.row_bytes]);
        }
    }

    /// Copy `src`, whose rows are `src_stride` apart, into `rect` of the mapping
    pub fn write_texels(&mut self, rect: &TexelRect, src: &[u8], src_stride: usize) {
        assert!(
            self.mode.allows_host_write(),
            "host writes are not allowed on {} staging textures",
            self.mode
        );
        let span = self.span(rect);
        check_host_buffer(&span, src.len(), src_stride);

        for row in 0..span.rows {
            let dst_offset = (span.first_row + row) * self.stride + span.x_offset;
            let src_offset = row * src_stride;
            self.data[dst_offset..dst_offset + span.row_bytes]
                .copy_from_slice(&src[src_offset..src_offset + span.row_bytes]);
        }
    }

    /// Bytes of a single texel of an uncompressed format
    pub fn read_texel(&self, x: u32, y: u32) -> &[u8] {
        assert!(
            self.mode.allows_host_read(),
            "host reads are not allowed on {} staging textures",
            self.mode
        );
        assert!(
            x < self.desc.width && y < self.desc.height,
            "texel ({}, {}) outside {}x{} staging texture",
            x,
            y,
            self.desc.width,
            self.desc.height
        );
        let texel_size = self.desc.format.texel_size() as usize;
        let offset = y as usize * self.stride + x as usize * texel_size;
        &self.data[offset..offset + texel_size]
    }

    fn span(&self, rect: &TexelRect) -> RowSpan {
        assert!(
            self.desc.rect().contains(rect),
            "rect {} outside staging texture {}",
            rect,
            self.desc.rect()
        );

        let format = self.desc.format;
        let (block_width, block_height) = format.block_extent();
        if let Some(FormatLayout::Block { .. }) = format.layout() {
            debug_assert!(
                rect.left % block_width == 0 && rect.top % block_height == 0,
                "rect {} is not aligned to {}x{} blocks",
                rect,
                block_width,
                block_height
            );
        }

        RowSpan {
            first_row: (rect.top / block_height) as usize,
            rows: format.rows_for_height(rect.height()) as usize,
            x_offset: (rect.left / block_width) as usize * format.block_size() as usize,
            row_bytes: format.stride_for_width(rect.width()),
        }
    }
}

/// Rows of the mapping touched by a rectangle
struct RowSpan {
    first_row: usize,
    rows: usize,
    x_offset: usize,
    row_bytes: usize,
}

fn check_host_buffer(span: &RowSpan, len: usize, stride: usize) {
    if span.rows == 0 {
        return;
    }
    assert!(
        stride >= span.row_bytes,
        "host stride {} is smaller than a row of {} bytes",
        stride,
        span.row_bytes
    );
    let needed = (span.rows - 1) * stride + span.row_bytes;
    assert!(
        len >= needed,
        "host buffer of {} bytes cannot hold {} bytes",
        len,
        needed
    );
}
