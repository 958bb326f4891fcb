//! Tiled CPU worker.
//!
//! ```text
//! Created --prepare--> Prepared --process--> Prepared ... (dropped)
//! ```
//!
//! `prepare` sizes the source and target buffers and snapshots the node's
//! properties into a kernel. The host fills the source buffer and calls
//! `process` once per tile. The per-pixel transform reads one source pixel
//! and writes one target slot, so row-disjoint tiles are independent.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use fx_core::{Bgra, ColorMode, Error, PixelBuffer, Result, TiledRegion};

use crate::node::{EffectProperties, SharedConfig};

/// A pure per-pixel transform built from an effect's properties.
pub trait CpuKernel: Send + Sync + 'static {
    /// Property set of the owning effect.
    type Properties: EffectProperties;

    /// Kernel name used in logs.
    const NAME: &'static str;

    /// Builds the kernel from a property snapshot.
    fn from_properties(properties: &Self::Properties) -> Self;

    /// Transforms one pixel.
    fn apply(&self, px: Bgra) -> Bgra;
}

/// Host-facing CPU worker protocol.
pub trait TiledWorker: Send {
    /// Grows the buffers to at least the given byte lengths and snapshots
    /// the configuration.
    ///
    /// Capacity never shrinks; the logical lengths are always reset.
    /// Lengths must be whole pixels.
    fn prepare(&mut self, source_len: u32, target_len: u32) -> Result<()>;

    /// Transforms `region` of the source buffer into the start of the
    /// target buffer, packed at `pitch = width`.
    fn process(&mut self, region: TiledRegion) -> Result<()>;

    /// Same output as [`process`](TiledWorker::process), computed in bands
    /// of `band_rows` rows on the rayon pool.
    fn process_parallel(&mut self, region: TiledRegion, band_rows: u32) -> Result<()>;

    /// Pixel layout of both buffers.
    fn color_mode(&self) -> ColorMode;

    /// Source bytes.
    fn source_buffer(&self) -> &[u8];

    /// Source bytes, for the host to fill.
    fn source_buffer_mut(&mut self) -> &mut [u8];

    /// Target bytes.
    fn target_buffer(&self) -> &[u8];

    /// Source pixels, for the host to fill.
    fn source_pixels_mut(&mut self) -> &mut [Bgra];

    /// Target pixels.
    fn target_pixels(&self) -> &[Bgra];
}

/// CPU worker running kernel `K` over packed BGRA tiles.
pub struct CpuTiledWorker<K: CpuKernel> {
    config: SharedConfig<K::Properties>,
    kernel: Option<K>,
    source: PixelBuffer,
    target: PixelBuffer,
}

impl<K: CpuKernel> CpuTiledWorker<K> {
    /// Creates an unprepared worker bound to `config`.
    pub fn new(config: SharedConfig<K::Properties>) -> Self {
        Self {
            config,
            kernel: None,
            source: PixelBuffer::new(),
            target: PixelBuffer::new(),
        }
    }

    /// The owning node's configuration.
    pub fn configuration(&self) -> &SharedConfig<K::Properties> {
        &self.config
    }

    /// Rebinds the worker; it must be prepared again before processing.
    pub fn set_configuration(&mut self, config: SharedConfig<K::Properties>) {
        self.config = config;
        self.kernel = None;
    }

    /// Returns `true` once `prepare` has run.
    pub fn is_prepared(&self) -> bool {
        self.kernel.is_some()
    }
}

fn check_region(region: &TiledRegion, source_len: usize, target_len: usize) -> Result<()> {
    region.validate(source_len)?;
    let required = region.target_len();
    if required > target_len {
        return Err(Error::BufferTooSmall {
            required,
            available: target_len,
        });
    }
    Ok(())
}

/// Applies `kernel` to every row of `region`; `target` is packed at `pitch = width`.
fn run_rows<K: CpuKernel>(kernel: &K, source: &[Bgra], region: &TiledRegion, target: &mut [Bgra]) {
    let width = region.width as usize;
    for (y, row) in target.chunks_exact_mut(width).take(region.height as usize).enumerate() {
        let start = region.row_start(y as u32);
        for (dst, src) in row.iter_mut().zip(&source[start..start + width]) {
            *dst = kernel.apply(*src);
        }
    }
}

impl<K: CpuKernel> TiledWorker for CpuTiledWorker<K> {
    fn prepare(&mut self, source_len: u32, target_len: u32) -> Result<()> {
        let bpp = self.color_mode().bytes_per_pixel() as u32;
        for (name, len) in [("source_len", source_len), ("target_len", target_len)] {
            if len % bpp != 0 {
                return Err(Error::invalid_argument(
                    name,
                    format!("{len} bytes is not a whole number of {bpp}-byte pixels"),
                ));
            }
        }

        let grew_source = self.source.ensure_capacity(source_len as usize);
        let grew_target = self.target.ensure_capacity(target_len as usize);
        self.kernel = Some(K::from_properties(&self.config.properties()));
        debug!(
            kernel = K::NAME,
            source_len, target_len, grew_source, grew_target, "Prepared CPU worker"
        );
        Ok(())
    }

    fn process(&mut self, region: TiledRegion) -> Result<()> {
        let kernel = self.kernel.as_ref().ok_or(Error::NotPrepared)?;
        let source = self.source.pixels();
        let target = self.target.pixels_mut();
        check_region(&region, source.len(), target.len())?;
        trace!(kernel = K::NAME, ?region, "process");

        run_rows(kernel, source, &region, &mut target[..region.target_len()]);
        Ok(())
    }

    fn process_parallel(&mut self, region: TiledRegion, band_rows: u32) -> Result<()> {
        let kernel = self.kernel.as_ref().ok_or(Error::NotPrepared)?;
        let source = self.source.pixels();
        let target = self.target.pixels_mut();
        check_region(&region, source.len(), target.len())?;

        let rows = band_rows.max(1);
        let band_len = rows as usize * region.width as usize;
        trace!(kernel = K::NAME, ?region, band_rows = rows, "process_parallel");

        let run_band = |(i, chunk): (usize, &mut [Bgra])| {
            let band = TiledRegion {
                start: region.start + i as u32 * rows * region.pitch,
                height: (chunk.len() / region.width as usize) as u32,
                ..region
            };
            run_rows(kernel, source, &band, chunk);
        };

        let target = &mut target[..region.target_len()];
        #[cfg(feature = "parallel")]
        target.par_chunks_mut(band_len).enumerate().for_each(run_band);
        #[cfg(not(feature = "parallel"))]
        target.chunks_mut(band_len).enumerate().for_each(run_band);
        Ok(())
    }

    fn color_mode(&self) -> ColorMode {
        ColorMode::Bgra8888
    }

    fn source_buffer(&self) -> &[u8] {
        self.source.as_bytes()
    }

    fn source_buffer_mut(&mut self) -> &mut [u8] {
        self.source.as_bytes_mut()
    }

    fn target_buffer(&self) -> &[u8] {
        self.target.as_bytes()
    }

    fn source_pixels_mut(&mut self) -> &mut [Bgra] {
        self.source.pixels_mut()
    }

    fn target_pixels(&self) -> &[Bgra] {
        self.target.pixels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::NoProperties;

    /// Swaps red and blue, keeps the rest.
    struct SwapRb;

    impl CpuKernel for SwapRb {
        type Properties = NoProperties;
        const NAME: &'static str = "swap_rb";

        fn from_properties(_: &NoProperties) -> Self {
            SwapRb
        }

        fn apply(&self, px: Bgra) -> Bgra {
            Bgra::new(px.b(), px.g(), px.r(), px.a())
        }
    }

    fn worker(width: u32, height: u32) -> CpuTiledWorker<SwapRb> {
        let mut w = CpuTiledWorker::new(SharedConfig::new(NoProperties));
        let bytes = width * height * 4;
        w.prepare(bytes, bytes).unwrap();
        for (i, px) in w.source_pixels_mut().iter_mut().enumerate() {
            *px = Bgra::new(i as u8, 0, 255 - i as u8, 255);
        }
        w
    }

    #[test]
    fn test_process_before_prepare() {
        let mut w = CpuTiledWorker::<SwapRb>::new(SharedConfig::new(NoProperties));
        assert!(!w.is_prepared());
        assert_eq!(w.process(TiledRegion::full(1, 1)), Err(Error::NotPrepared));
    }

    #[test]
    fn test_process_pitch() {
        // 4x3 source, process the 2x2 block at (1, 1)
        let mut w = worker(4, 3);
        w.process(TiledRegion::new(5, 4, 2, 2)).unwrap();
        let out = &w.target_pixels()[..4];
        let expect = |i: u8| Bgra::new(255 - i, 0, i, 255);
        assert_eq!(out, &[expect(5), expect(6), expect(9), expect(10)]);
    }

    #[test]
    fn test_region_checked() {
        let mut w = worker(4, 3);
        let err = w.process(TiledRegion::new(9, 4, 2, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidRegion { .. }));
        assert!(w.process(TiledRegion::new(0, 1, 2, 1)).is_err());
    }

    #[test]
    fn test_target_too_small() {
        let mut w = CpuTiledWorker::<SwapRb>::new(SharedConfig::new(NoProperties));
        w.prepare(64, 8).unwrap();
        let err = w.process(TiledRegion::full(4, 4)).unwrap_err();
        assert_eq!(err, Error::BufferTooSmall { required: 16, available: 2 });
    }

    #[test]
    fn test_prepare_keeps_capacity() {
        let mut w = worker(8, 8);
        w.prepare(16, 16).unwrap();
        assert_eq!(w.source_buffer().len(), 16);
        assert_eq!(w.target_buffer().len(), 16);
        assert!(w.process(TiledRegion::full(8, 8)).is_err());
        assert!(w.process(TiledRegion::full(2, 2)).is_ok());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut w = worker(7, 9);
        let region = TiledRegion::full(7, 9);
        w.process(region).unwrap();
        let serial = w.target_pixels().to_vec();
        w.target.pixels_mut().fill(Bgra::TRANSPARENT);
        for rows in [1, 2, 4, 9, 20] {
            w.process_parallel(region, rows).unwrap();
            assert_eq!(w.target_pixels(), &serial[..], "band rows {rows}");
        }
    }

    #[test]
    fn test_prepare_rejects_partial_pixels() {
        let mut w = CpuTiledWorker::<SwapRb>::new(SharedConfig::new(NoProperties));
        assert!(w.prepare(6, 8).unwrap_err().is_invalid_argument());
        assert!(w.prepare(8, 7).is_err());
        assert!(!w.is_prepared());
    }

    #[test]
    fn test_set_configuration_requires_prepare() {
        let mut w = worker(2, 2);
        w.set_configuration(SharedConfig::new(NoProperties));
        assert_eq!(w.process(TiledRegion::full(2, 2)), Err(Error::NotPrepared));
    }
}
