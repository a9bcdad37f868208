//! The feature pyramid + pdf pipeline facade.
//!
//! [`FeaturePipeline`] owns the scale planner, one feature family and the
//! convolution engine, and exposes the operations a sliding-window
//! detector needs:
//!
//! - `binsize`, `nscales`, `scales` describe the configured pyramid,
//! - `pyramid` turns an image into index-aligned feature arrays,
//! - `set_filters` prepares the filter bank once,
//! - `pdf` scores a pyramid against every filter.
//!
//! `pyramid` and `pdf` take `&self` and may run concurrently from several
//! threads; `set_filters` takes `&mut self`, so replacing filters is
//! serialised against scoring by the borrow checker.

pub mod params;

pub use params::PipelineParams;

use crate::convolve::{ConvolutionEngine, Filter, ResponseGrid};
use crate::diagnostics::timing::Stopwatch;
use crate::diagnostics::{InputDescriptor, PipelineReport, PyramidStage, ResponseStage};
use crate::error::{PyramidError, Result};
use crate::features::{FeatureArray, FeatureExtractor};
use crate::image::{ImageF32, ImageU8};
use crate::pyramid::{
    build_pyramid, FeaturePyramid, LevelGeometry, Padding, PyramidOptions, ScalePlan,
    ScalePlanner,
};
use log::debug;

/// Output of [`FeaturePipeline::process`].
#[derive(Clone, Debug)]
pub struct PipelineRun {
    pub pyramid: FeaturePyramid,
    pub responses: ResponseGrid,
    pub report: PipelineReport,
}

pub struct FeaturePipeline {
    planner: ScalePlanner,
    extractor: Box<dyn FeatureExtractor>,
    padding: Padding,
    engine: ConvolutionEngine,
}

impl FeaturePipeline {
    /// Build a pipeline with the feature family named in `params`.
    pub fn new(params: PipelineParams) -> Result<Self> {
        let extractor = params.features.build()?;
        Self::from_parts(params.pyramid, params.padding, extractor)
    }

    /// Build a pipeline around a caller-provided feature family.
    pub fn with_extractor<E>(pyramid: PyramidOptions, padding: Padding, extractor: E) -> Result<Self>
    where
        E: FeatureExtractor + 'static,
    {
        Self::from_parts(pyramid, padding, Box::new(extractor))
    }

    fn from_parts(
        pyramid: PyramidOptions,
        padding: Padding,
        extractor: Box<dyn FeatureExtractor>,
    ) -> Result<Self> {
        if extractor.binsize() == 0 || extractor.channels() == 0 {
            return Err(PyramidError::InvalidConfig {
                reason: format!(
                    "feature family {} reports binsize {} and {} channels",
                    extractor.name(),
                    extractor.binsize(),
                    extractor.channels()
                ),
            });
        }
        let planner = ScalePlanner::new(pyramid)?;
        let engine = ConvolutionEngine::new(extractor.channels());
        Ok(Self {
            planner,
            extractor,
            padding,
            engine,
        })
    }

    pub fn binsize(&self) -> usize {
        self.extractor.binsize()
    }

    pub fn channels(&self) -> usize {
        self.extractor.channels()
    }

    /// Number of scheduled scales.
    pub fn nscales(&self) -> usize {
        self.planner.nscales()
    }

    /// Scheduled scales, largest first.
    pub fn scales(&self) -> &[f32] {
        self.planner.scales()
    }

    pub fn extractor(&self) -> &dyn FeatureExtractor {
        self.extractor.as_ref()
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Level plan for a `width × height` image.
    pub fn plan(&self, width: usize, height: usize) -> Result<ScalePlan> {
        self.planner.plan(width, height, self.extractor.as_ref())
    }

    /// Feature arrays at every scale, index-aligned with `scales()`.
    ///
    /// When levels are dropped for a small image the result is a prefix of
    /// the schedule; `FeaturePyramid::scales` always reports what was built.
    pub fn pyramid(&self, image: &ImageF32) -> Result<FeaturePyramid> {
        image.validate()?;
        let plan = self.plan(image.w, image.h)?;
        build_pyramid(image, &plan, self.extractor.as_ref(), self.padding)
    }

    /// [`pyramid`](Self::pyramid) for an 8-bit view, converted to `[0, 1]`.
    pub fn pyramid_u8(&self, gray: &ImageU8<'_>) -> Result<FeaturePyramid> {
        gray.validate()?;
        self.pyramid(&ImageF32::from_u8(gray))
    }

    /// Validate and prepare `filters`; replaces the previous bank on success.
    pub fn set_filters(&mut self, filters: &[Filter]) -> Result<()> {
        self.engine.set_filters(filters)
    }

    pub fn has_filters(&self) -> bool {
        self.engine.has_filters()
    }

    pub fn filter_count(&self) -> usize {
        self.engine.filter_count()
    }

    pub fn filter_names(&self) -> Vec<Option<String>> {
        self.engine.filter_names()
    }

    /// Response maps `[scale][filter]` for `pyramid`.
    pub fn pdf<P>(&self, pyramid: &P) -> Result<ResponseGrid>
    where
        P: AsRef<[FeatureArray]> + ?Sized,
    {
        self.engine.pdf(pyramid)
    }

    /// Geometry mapping cells of `pyramid` level `index` to image pixels.
    pub fn level_geometry(&self, pyramid: &FeaturePyramid, index: usize) -> Option<LevelGeometry> {
        pyramid.scales().get(index).map(|&scale| LevelGeometry {
            scale,
            binsize: self.binsize(),
            border_cells: self.extractor.border_cells(),
            pad_x: self.padding.x,
            pad_y: self.padding.y,
        })
    }

    /// Pyramid and pdf in one call, with a diagnostics report.
    pub fn process(&self, image: &ImageF32) -> Result<PipelineRun> {
        let mut watch = Stopwatch::start();
        if !self.has_filters() {
            return Err(PyramidError::FiltersNotSet);
        }
        image.validate()?;

        let plan = watch.stage("plan", || self.plan(image.w, image.h))?;
        let pyramid = watch.stage("pyramid", || {
            build_pyramid(image, &plan, self.extractor.as_ref(), self.padding)
        })?;
        let pyramid_ms = watch.last_ms();
        let responses = watch.stage("pdf", || self.pdf(&pyramid))?;
        let pdf_ms = watch.last_ms();

        let geometry: Vec<LevelGeometry> = (0..pyramid.len())
            .filter_map(|i| self.level_geometry(&pyramid, i))
            .collect();
        let timings = watch.finish();
        debug!(
            "FeaturePipeline::process {}x{}: {} level(s), {} map(s), {:.3} ms",
            image.w,
            image.h,
            pyramid.len(),
            responses.maps().len(),
            timings.total_ms
        );

        let report = PipelineReport {
            input: InputDescriptor {
                width: image.w,
                height: image.h,
                feature_family: self.extractor.name().to_string(),
                binsize: self.binsize(),
                channels: self.channels(),
                scheduled_levels: self.nscales(),
            },
            pyramid: PyramidStage::from_pyramid(&plan, &pyramid, pyramid_ms),
            responses: ResponseStage::from_grid(
                &responses,
                &geometry,
                &self.filter_names(),
                pdf_ms,
            ),
            timings,
        };
        Ok(PipelineRun {
            pyramid,
            responses,
            report,
        })
    }
}

impl std::fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("planner", &self.planner)
            .field("extractor", &self.extractor.name())
            .field("padding", &self.padding)
            .field("engine", &self.engine)
            .finish()
    }
}
