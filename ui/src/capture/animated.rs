//! Looping snowfall animation built on top of a still capture.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

use super::snapshot::{straight_rgba, Raster};
use super::{CaptureError, ExportError, ExportLease, ExportLock};
use crate::core::config::ExportSettings;
use crate::core::platform::yield_now;
use crate::core::timing::FrameSchedule;

/// Flake colour: white at 80% alpha.
const FLAKE_RGBA: [u8; 4] = [255, 255, 255, 204];

/// Accepts composited frames in order and produces one encoded artifact.
pub trait FrameEncoder {
    fn push_frame(&mut self, frame: &Pixmap, delay_ms: u32) -> Result<(), ExportError>;
    fn finish(self) -> Result<Vec<u8>, ExportError>;
}

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Infinitely looping GIF.
pub struct GifFrameEncoder {
    buffer: SharedBuffer,
    encoder: GifEncoder<SharedBuffer>,
}

impl GifFrameEncoder {
    pub fn new() -> Result<Self, ExportError> {
        let buffer = SharedBuffer::default();
        let mut encoder = GifEncoder::new_with_speed(buffer.clone(), 10);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|err| ExportError::Encode(err.to_string()))?;
        Ok(Self { buffer, encoder })
    }
}

impl FrameEncoder for GifFrameEncoder {
    fn push_frame(&mut self, frame: &Pixmap, delay_ms: u32) -> Result<(), ExportError> {
        let image = RgbaImage::from_raw(frame.width(), frame.height(), straight_rgba(frame))
            .ok_or_else(|| ExportError::Encode("frame buffer size mismatch".into()))?;
        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        self.encoder
            .encode_frame(Frame::from_parts(image, 0, 0, delay))
            .map_err(|err| ExportError::Encode(err.to_string()))
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let Self { buffer, encoder } = self;
        // Dropping the encoder writes the GIF trailer.
        drop(encoder);
        Ok(buffer.take())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
}

/// Falling particles over a `width` x `height` frame.
pub struct SnowField {
    flakes: Vec<Snowflake>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl SnowField {
    /// Sizes and speeds grow with `scale` so the effect looks the same at
    /// any capture resolution.
    pub fn new(count: usize, width: f32, height: f32, scale: f32, mut rng: StdRng) -> Self {
        let unit = scale * 0.7;
        let flakes = (0..count)
            .map(|_| Snowflake {
                x: rng.gen::<f32>() * width,
                y: rng.gen::<f32>() * height,
                radius: (rng.gen::<f32>() * 2.0 + 1.0) * unit,
                speed: (rng.gen::<f32>() * 2.0 + 3.0) * unit,
            })
            .collect();
        Self {
            flakes,
            width,
            height,
            rng,
        }
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn advance(&mut self) {
        for flake in &mut self.flakes {
            flake.y += flake.speed;
            if flake.y > self.height {
                flake.y = -flake.radius;
                flake.x = self.rng.gen::<f32>() * self.width;
            }
        }
    }

    pub fn draw(&self, pixmap: &mut Pixmap) {
        let mut paint = Paint::default();
        let [r, g, b, a] = FLAKE_RGBA;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        for flake in &self.flakes {
            if let Some(circle) = PathBuilder::from_circle(flake.x, flake.y, flake.radius) {
                pixmap.fill_path(
                    &circle,
                    &paint,
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
    }
}

pub struct AnimatedExporter {
    lock: ExportLock,
    schedule: FrameSchedule,
    snowflakes: usize,
}

impl AnimatedExporter {
    pub fn new(settings: &ExportSettings, lock: ExportLock) -> Self {
        Self::with_schedule(settings.schedule(), settings.snowflakes, lock)
    }

    pub fn with_schedule(schedule: FrameSchedule, snowflakes: usize, lock: ExportLock) -> Self {
        Self {
            lock,
            schedule,
            snowflakes,
        }
    }

    pub fn schedule(&self) -> FrameSchedule {
        self.schedule
    }

    /// Claims `region` for one build; `Busy` while another build holds it.
    pub fn try_begin(&self, region: &str) -> Result<ExportLease, ExportError> {
        self.lock.try_acquire(region)
    }

    pub async fn build<E: FrameEncoder>(
        &self,
        lease: ExportLease,
        raster: &Raster,
        encoder: E,
    ) -> Result<Vec<u8>, ExportError> {
        self.build_with_rng(lease, raster, encoder, StdRng::from_entropy())
            .await
    }

    /// Composites and encodes every frame in order. The lease is held until
    /// the future completes or is dropped.
    pub async fn build_with_rng<E: FrameEncoder>(
        &self,
        lease: ExportLease,
        raster: &Raster,
        mut encoder: E,
        rng: StdRng,
    ) -> Result<Vec<u8>, ExportError> {
        let total = self.schedule.total_frames();
        if total == 0 {
            return Err(ExportError::Encode("animation has no frames".into()));
        }
        let delay_ms = self.schedule.frame_delay_ms();
        let (width, height) = (raster.width(), raster.height());
        let mut frame = Pixmap::new(width, height).ok_or(CaptureError::Surface { width, height })?;
        let mut field = SnowField::new(
            self.snowflakes,
            width as f32,
            height as f32,
            raster.scale(),
            rng,
        );

        tracing::info!(region = lease.region(), total, width, height, "building animation");
        for index in 0..total {
            if index > 0 {
                yield_now().await;
            }
            frame.fill(Color::TRANSPARENT);
            frame.draw_pixmap(
                0,
                0,
                raster.pixmap().as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
            field.advance();
            field.draw(&mut frame);
            encoder.push_frame(&frame, delay_ms)?;
            tracing::debug!(frame = index + 1, total, "animation frame encoded");
        }

        let bytes = encoder.finish()?;
        tracing::info!(region = lease.region(), bytes = bytes.len(), "animation complete");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use futures::FutureExt;
    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;

    use super::*;

    /// Keeps a copy of every pushed frame.
    #[derive(Clone, Default)]
    struct RecordingEncoder {
        frames: Rc<RefCell<Vec<(Vec<u8>, u32)>>>,
    }

    impl FrameEncoder for RecordingEncoder {
        fn push_frame(&mut self, frame: &Pixmap, delay_ms: u32) -> Result<(), ExportError> {
            self.frames
                .borrow_mut()
                .push((frame.data().to_vec(), delay_ms));
            Ok(())
        }

        fn finish(self) -> Result<Vec<u8>, ExportError> {
            Ok(vec![self.frames.borrow().len() as u8])
        }
    }

    fn dark_raster(width: u32, height: u32, scale: f32) -> Raster {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        pixmap.fill(Color::from_rgba8(0x2d, 0x3e, 0x50, 255));
        Raster::new(pixmap, scale)
    }

    #[tokio::test]
    async fn default_schedule_encodes_thirty_frames() {
        let exporter = AnimatedExporter::new(&ExportSettings::default(), ExportLock::new());
        let encoder = RecordingEncoder::default();
        let lease = exporter.try_begin("card").unwrap();

        let bytes = exporter
            .build_with_rng(
                lease,
                &dark_raster(48, 32, 1.5),
                encoder.clone(),
                StdRng::seed_from_u64(7),
            )
            .await
            .unwrap();

        assert_eq!(bytes, vec![30]);
        let frames = encoder.frames.borrow();
        assert_eq!(frames.len(), 30);
        assert!(frames.iter().all(|(_, delay)| *delay == 70));
    }

    #[tokio::test]
    async fn frames_show_snow_over_the_capture() {
        let exporter =
            AnimatedExporter::with_schedule(FrameSchedule::new(1, 4), 60, ExportLock::new());
        let raster = dark_raster(40, 40, 1.0);
        let encoder = RecordingEncoder::default();
        let lease = exporter.try_begin("card").unwrap();

        exporter
            .build_with_rng(lease, &raster, encoder.clone(), StdRng::seed_from_u64(3))
            .await
            .unwrap();

        let frames = encoder.frames.borrow();
        let background = raster.pixmap().data();
        assert!(frames.iter().all(|(data, _)| data.len() == background.len()));
        assert!(frames[0].0 != background);
        assert!(frames[0].0 != frames[1].0);
    }

    #[tokio::test]
    async fn concurrent_build_for_same_region_is_busy() {
        let lock = ExportLock::new();
        let exporter = AnimatedExporter::with_schedule(FrameSchedule::new(1, 2), 5, lock.clone());
        let lease = exporter.try_begin("card").unwrap();

        assert!(matches!(
            exporter.try_begin("card"),
            Err(ExportError::Busy { .. })
        ));

        exporter
            .build(lease, &dark_raster(8, 8, 1.0), RecordingEncoder::default())
            .await
            .unwrap();
        assert!(!lock.is_busy("card"));
        assert!(exporter.try_begin("card").is_ok());
    }

    #[tokio::test]
    async fn abandoned_build_releases_the_region() {
        let lock = ExportLock::new();
        let exporter = AnimatedExporter::with_schedule(FrameSchedule::new(2, 15), 5, lock.clone());
        let encoder = RecordingEncoder::default();
        let lease = exporter.try_begin("card").unwrap();
        let raster = dark_raster(8, 8, 1.0);

        let mut build = Box::pin(exporter.build_with_rng(
            lease,
            &raster,
            encoder.clone(),
            StdRng::seed_from_u64(1),
        ));
        assert!((&mut build).now_or_never().is_none());
        assert!(lock.is_busy("card"));

        drop(build);
        assert!(!lock.is_busy("card"));
        assert!(encoder.frames.borrow().len() < 30);
    }

    #[tokio::test]
    async fn zero_length_schedule_is_rejected() {
        let lock = ExportLock::new();
        let exporter = AnimatedExporter::with_schedule(FrameSchedule::new(0, 15), 5, lock.clone());
        let lease = exporter.try_begin("card").unwrap();

        let err = exporter
            .build(lease, &dark_raster(8, 8, 1.0), RecordingEncoder::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Encode(_)));
        assert!(!lock.is_busy("card"));
    }

    #[test]
    fn flakes_fall_monotonically_and_wrap_above_the_top() {
        let mut field = SnowField::new(60, 60.0, 30.0, 1.5, StdRng::seed_from_u64(11));
        let mut wraps = 0;

        for _ in 0..40 {
            let before = field.flakes().to_vec();
            field.advance();
            for (old, new) in before.iter().zip(field.flakes()) {
                if new.y < old.y {
                    wraps += 1;
                    assert_eq!(new.y, -new.radius);
                    assert!(new.y < 0.0);
                } else {
                    assert_eq!(new.y, old.y + old.speed);
                    assert_eq!(new.x, old.x);
                }
                assert!((0.0..60.0).contains(&new.x));
            }
        }
        assert!(wraps > 0);
    }

    #[test]
    fn flake_sizes_follow_capture_scale() {
        let field = SnowField::new(200, 100.0, 100.0, 2.0, StdRng::seed_from_u64(5));
        let unit = 2.0 * 0.7;
        for flake in field.flakes() {
            assert!(flake.radius >= unit && flake.radius <= 3.0 * unit);
            assert!(flake.speed >= 3.0 * unit && flake.speed <= 5.0 * unit);
            assert!((0.0..100.0).contains(&flake.y));
        }
    }

    #[tokio::test]
    async fn gif_encoder_writes_a_looping_animation() {
        let exporter = AnimatedExporter::with_schedule(FrameSchedule::new(1, 3), 4, ExportLock::new());
        let lease = exporter.try_begin("card").unwrap();

        let bytes = exporter
            .build(lease, &dark_raster(12, 10, 1.0), GifFrameEncoder::new().unwrap())
            .await
            .unwrap();

        assert_eq!(&bytes[..6], b"GIF89a");
        let frames = GifDecoder::new(Cursor::new(bytes))
            .unwrap()
            .into_frames()
            .collect_frames()
            .unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].buffer().dimensions(), (12, 10));
        // 3 fps is 333 ms; stored as 33 cs without drift.
        assert_eq!(frames[0].delay().numer_denom_ms(), (330, 1));
    }
}
