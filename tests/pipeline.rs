mod common;

use common::synthetic_image::{ripple_f32, square_f32};
use feature_pyramid::convolve::{correlate_valid, Filter};
use feature_pyramid::features::{FeatureArray, FeatureKind};
use feature_pyramid::image::ImageF32;
use feature_pyramid::pipeline::{FeaturePipeline, PipelineParams};
use feature_pyramid::pyramid::{Padding, PyramidOptions};
use feature_pyramid::PyramidError;

fn intensity_pipeline(interval: usize, min_scale: f32) -> FeaturePipeline {
    FeaturePipeline::new(PipelineParams {
        pyramid: PyramidOptions::new(interval, min_scale),
        features: FeatureKind::Intensity,
        padding: Padding::default(),
    })
    .unwrap()
}

/// Deterministic pseudo-random filter with values in `[-1, 1)`.
fn noise_filter(w: usize, h: usize, channels: usize, seed: u32) -> Filter {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let data = (0..w * h * channels)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 8) as f32 / (1u32 << 23) as f32 - 1.0
        })
        .collect();
    Filter::new(w, h, channels, data).unwrap()
}

#[test]
fn two_scale_intensity_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pipeline = intensity_pipeline(1, 0.5);
    assert_eq!(pipeline.binsize(), 1);
    assert_eq!(pipeline.scales(), &[1.0, 0.5]);

    let pyramid = pipeline.pyramid(&ripple_f32(100, 100)).unwrap();
    assert_eq!(pyramid.levels()[0].dims(), (100, 100));
    assert_eq!(pyramid.levels()[1].dims(), (50, 50));

    pipeline.set_filters(&[noise_filter(10, 10, 1, 7)]).unwrap();
    let grid = pipeline.pdf(&pyramid).unwrap();
    assert_eq!((grid.nscales(), grid.nfilters()), (2, 1));
    let first = grid.get(0, 0).unwrap();
    let second = grid.get(1, 0).unwrap();
    assert_eq!((first.w, first.h), (91, 91));
    assert_eq!((second.w, second.h), (41, 41));
}

#[test]
fn grid_shape_follows_level_and_filter_sizes() {
    let mut pipeline = intensity_pipeline(2, 0.25);
    let filters = vec![
        noise_filter(3, 5, 1, 1),
        noise_filter(7, 2, 1, 2),
        noise_filter(1, 1, 1, 3),
    ];
    pipeline.set_filters(&filters).unwrap();
    let pyramid = pipeline.pyramid(&ripple_f32(64, 48)).unwrap();
    let grid = pipeline.pdf(&pyramid).unwrap();

    assert_eq!(grid.nscales(), pipeline.nscales());
    assert_eq!(grid.nfilters(), filters.len());
    for (s, f, map) in grid.iter() {
        let level = &pyramid.levels()[s];
        let filter = &filters[f];
        assert_eq!(map.w, level.w - filter.width() + 1);
        assert_eq!(map.h, level.h - filter.height() + 1);
    }
}

#[test]
fn pdf_matches_direct_correlation() {
    let mut pipeline = FeaturePipeline::new(PipelineParams {
        pyramid: PyramidOptions::new(2, 0.5).with_min_cells(3),
        features: FeatureKind::Hog { binsize: 4 },
        padding: Padding::default(),
    })
    .unwrap();
    let filters = vec![noise_filter(3, 3, 31, 11), noise_filter(2, 3, 31, 12)];
    pipeline.set_filters(&filters).unwrap();

    let pyramid = pipeline.pyramid(&square_f32(80, 64, 20, 16, 24)).unwrap();
    let grid = pipeline.pdf(&pyramid).unwrap();
    for (s, f, map) in grid.iter() {
        let direct = correlate_valid(&pyramid.levels()[s], &filters[f]).unwrap();
        assert_eq!(map, &direct, "scale {s} filter {f}");
    }
}

#[test]
fn repeated_set_filters_gives_identical_grids() {
    let mut pipeline = intensity_pipeline(3, 0.3);
    let filters = vec![noise_filter(4, 4, 1, 5), noise_filter(6, 3, 1, 6)];
    let pyramid = pipeline.pyramid(&ripple_f32(72, 60)).unwrap();

    pipeline.set_filters(&filters).unwrap();
    let once = pipeline.pdf(&pyramid).unwrap();
    pipeline.set_filters(&filters).unwrap();
    pipeline.set_filters(&filters).unwrap();
    let thrice = pipeline.pdf(&pyramid).unwrap();
    assert_eq!(once, thrice);
}

#[test]
fn shuffled_filters_permute_grid_columns() {
    let mut pipeline = intensity_pipeline(2, 0.5);
    let filters = vec![
        noise_filter(5, 5, 1, 21),
        noise_filter(3, 4, 1, 22),
        noise_filter(2, 6, 1, 23),
    ];
    let order = [2usize, 0, 1];
    let shuffled: Vec<Filter> = order.iter().map(|&i| filters[i].clone()).collect();
    let pyramid = pipeline.pyramid(&ripple_f32(40, 40)).unwrap();

    pipeline.set_filters(&filters).unwrap();
    let base = pipeline.pdf(&pyramid).unwrap();
    pipeline.set_filters(&shuffled).unwrap();
    let permuted = pipeline.pdf(&pyramid).unwrap();

    for s in 0..base.nscales() {
        for (j, &i) in order.iter().enumerate() {
            assert_eq!(permuted.get(s, j), base.get(s, i));
        }
    }
}

#[test]
fn pdf_before_set_filters_fails() {
    let pipeline = intensity_pipeline(1, 0.5);
    let pyramid = pipeline.pyramid(&ripple_f32(20, 20)).unwrap();
    assert!(!pipeline.has_filters());
    assert_eq!(pipeline.pdf(&pyramid), Err(PyramidError::FiltersNotSet));
}

#[test]
fn channel_mismatch_keeps_previous_bank() {
    let mut pipeline = FeaturePipeline::new(PipelineParams::default()).unwrap();
    let good = noise_filter(2, 2, 31, 1).with_name("good");
    pipeline.set_filters(&[good]).unwrap();

    let err = pipeline
        .set_filters(&[noise_filter(2, 2, 31, 2), noise_filter(2, 2, 1, 3)])
        .unwrap_err();
    assert_eq!(
        err,
        PyramidError::FilterChannelMismatch {
            filter: 1,
            expected: 31,
            actual: 1
        }
    );
    assert_eq!(pipeline.filter_count(), 1);
    assert_eq!(pipeline.filter_names(), vec![Some("good".to_string())]);
    assert_eq!(pipeline.set_filters(&[]), Err(PyramidError::NoFilters));
    assert_eq!(pipeline.filter_count(), 1);
}

#[test]
fn oversized_filter_is_reported_before_scoring() {
    let mut pipeline = intensity_pipeline(1, 0.5);
    pipeline.set_filters(&[noise_filter(60, 60, 1, 4)]).unwrap();
    let pyramid = pipeline.pyramid(&ripple_f32(100, 100)).unwrap();
    assert_eq!(
        pipeline.pdf(&pyramid),
        Err(PyramidError::FilterLargerThanFeature {
            scale: 1,
            filter: 0,
            filter_size: (60, 60),
            feature_size: (50, 50),
        })
    );
}

#[test]
fn pdf_accepts_plain_feature_slices() {
    let mut pipeline = intensity_pipeline(1, 0.5);
    pipeline
        .set_filters(&[Filter::new(2, 1, 1, vec![1.0, -1.0]).unwrap()])
        .unwrap();
    let levels = vec![
        FeatureArray::from_vec(3, 1, 1, vec![4.0, 1.0, 3.0]).unwrap(),
        FeatureArray::from_vec(2, 2, 1, vec![0.5, 0.25, 2.0, 2.0]).unwrap(),
    ];
    let grid = pipeline.pdf(levels.as_slice()).unwrap();
    assert_eq!(grid.get(0, 0).unwrap().data, vec![3.0, -2.0]);
    assert_eq!(grid.get(1, 0).unwrap().data, vec![0.25, 0.0]);
}

#[test]
fn concurrent_pdf_calls_agree() {
    let mut pipeline = intensity_pipeline(2, 0.25);
    pipeline
        .set_filters(&[noise_filter(5, 5, 1, 31), noise_filter(8, 3, 1, 32)])
        .unwrap();
    let pyramid = pipeline.pyramid(&ripple_f32(96, 80)).unwrap();
    let expected = pipeline.pdf(&pyramid).unwrap();

    let pipeline = &pipeline;
    let pyramid = &pyramid;
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || pipeline.pdf(pyramid).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for grid in results {
        assert_eq!(grid, expected);
    }
}

#[test]
fn process_locates_square_template() {
    let mut pipeline = intensity_pipeline(1, 0.5);
    let template = Filter::from_features(
        FeatureArray::from_image(&ImageF32::from_fn(8, 8, |_, _| 1.0)),
    )
    .unwrap()
    .with_name("square");
    pipeline.set_filters(&[template]).unwrap();

    let run = pipeline.process(&square_f32(64, 64, 20, 30, 8)).unwrap();
    let best = &run.report.responses.maps[0];
    assert_eq!(best.filter_name.as_deref(), Some("square"));
    assert_eq!(best.max_at, [20, 30]);
    assert_eq!(best.max_at_image, [20.0, 30.0]);
    assert_eq!(run.report.input.scheduled_levels, 2);

    let json = serde_json::to_value(&run.report).unwrap();
    assert_eq!(json["input"]["featureFamily"], "intensity");
    assert_eq!(json["responses"]["maps"].as_array().unwrap().len(), 2);
}
