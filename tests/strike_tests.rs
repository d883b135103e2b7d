//! End-to-end tests for bolt generation, thunder rendering and convolution.
//!
//! These go through the public API only, the same way an application would.

use thunderclap::prelude::*;
use thunderclap::{Result, SPEED_OF_SOUND_IN_AIR};

/// Random source with no displacement, for bolts of known shape.
struct Straight;

impl BoltRandom for Straight {
    fn gaussian(&mut self) -> f64 {
        0.0
    }

    fn coin(&mut self) -> bool {
        false
    }
}

fn stereo_ears() -> [Point3; 2] {
    [Point3::new(2500.0, 0.1, 0.0), Point3::new(2500.0, -0.1, 0.0)]
}

// ============================================================================
// Bolt Generation
// ============================================================================

#[test]
fn test_seed_42_four_segment_bolt_is_reproducible() {
    let run = || -> Result<Vec<Segment>> {
        let mut bolt = LightningBolt::new(4, 42);
        bolt.generate(3000.0, 1000.0, 1.0)?;
        Ok(bolt.segments().to_vec())
    };

    let first = run().unwrap();
    let second = run().unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(first, second);

    assert_eq!(first[0].a.z, 3000.0);
    assert_eq!(first[3].b.z, 0.0);
    for pair in first.windows(2) {
        assert_eq!(pair[0].b, pair[1].a);
    }
}

#[test]
fn test_seed_42_four_segment_bolt_matches_recorded_output() {
    // Recorded from the default ChaCha8 engine with the default parameters.
    let expected = [
        Point3::new(337.9837749179509, 943.3303750765867, 3000.0),
        Point3::new(393.39152909204125, 1260.176622828984, 1784.8151152812172),
        Point3::new(-143.622175932338, 205.88999872818283, 1034.0131311498458),
        Point3::new(-141.45786127575175, 434.73413803844795, 834.7237905355336),
        Point3::new(-149.1052616672614, 336.8281400225692, 0.0),
    ];

    let mut bolt = LightningBolt::new(4, 42);
    bolt.generate_with(&BoltConfig::default()).unwrap();
    let segments = bolt.segments();
    assert_eq!(segments.len(), 4);

    for (i, segment) in segments.iter().enumerate() {
        for (got, want) in [(segment.a, expected[i]), (segment.b, expected[i + 1])] {
            assert!(
                (got - want).length() < 1e-6,
                "segment {}: got {:?}, expected {:?}",
                i,
                got,
                want
            );
        }
    }
}

#[test]
fn test_segment_count_matches_budget() {
    for max in [0usize, 1, 2, 7, 64, 999] {
        let mut bolt = LightningBolt::new(max, 1);
        bolt.generate_with(&BoltConfig::default()).unwrap();
        assert_eq!(bolt.segments().len(), max);
    }
}

#[test]
fn test_regeneration_never_exceeds_budget() {
    let mut bolt = LightningBolt::new(33, 8);
    for _ in 0..20 {
        bolt.generate(3000.0, 1000.0, 2.5).unwrap();
        assert_eq!(bolt.segments().len(), 33);
    }
}

#[test]
fn test_ends_spread_around_the_axis() {
    // Horizontal offsets of the ground end have a standard deviation of
    // roughly the requested radius.
    let mut bolt = LightningBolt::new(1, 123);
    let n = 2000;
    let mut sum_sq = 0.0;
    for _ in 0..n {
        bolt.generate(3000.0, 1000.0, 1.0).unwrap();
        let end = bolt.bottom().unwrap();
        sum_sq += end.x * end.x + end.y * end.y;
    }
    let rms = (sum_sq / n as f64).sqrt();
    assert!((rms - 1000.0).abs() < 100.0, "rms offset was {}", rms);
}

// ============================================================================
// Thunder Rendering
// ============================================================================

#[test]
fn test_single_vertical_segment_between_two_ears() {
    let mut bolt = LightningBolt::with_rng(1, Straight);
    bolt.generate(100.0, 0.0, 1.0).unwrap();
    assert_eq!(bolt.segments()[0].length(), 100.0);

    let mut thunder = Thunder::new(&stereo_ears(), 1);
    thunder.start(&bolt).unwrap();

    let rate = 44_100u32;
    let audio = thunder.render_audio(rate);
    assert_eq!(audio.channels(), 2);

    let near = (2500.0f64 * 2500.0 + 0.01).sqrt();
    let far = (2500.0f64 * 2500.0 + 0.01 + 100.0 * 100.0).sqrt();
    let seconds = (far - near) / SPEED_OF_SOUND_IN_AIR;
    let expected_frames = (seconds * rate as f64).ceil() as usize;
    let last_loud = (seconds * rate as f64).round() as isize;
    assert_eq!(audio.frames(), expected_frames);

    for c in 0..2 {
        for f in 0..audio.frames() as isize {
            let s = audio.get(c, f);
            if f < last_loud {
                assert!(s > 0.0, "channel {} frame {} silent", c, f);
            } else {
                assert_eq!(s, 0.0, "channel {} frame {} should be silent", c, f);
            }
        }
    }

    // Symmetric ears hear the same thing.
    for f in 0..audio.frames() as isize {
        assert_eq!(audio.get(0, f), audio.get(1, f));
    }
}

#[test]
fn test_every_pair_is_near_then_far() {
    let mut bolt = LightningBolt::new(500, 77);
    bolt.generate(3000.0, 1000.0, 1.0).unwrap();
    let ears = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(800.0, -900.0, 2.0),
        Point3::new(-5000.0, 10.0, 0.0),
    ];
    let mut thunder = Thunder::new(&ears, 500);
    thunder.start(&bolt).unwrap();

    for ear in 0..thunder.num_ears() {
        let table = thunder.segments(ear);
        assert_eq!(table.len(), 500);
        assert!(table.iter().all(|p| p.near() <= p.far()));
    }
    assert!(thunder.try_segments(3).is_none());
}

#[test]
fn test_oversized_bolt_is_range_error() {
    let mut small = LightningBolt::new(10, 0);
    small.generate(3000.0, 1000.0, 1.0).unwrap();
    let mut thunder = Thunder::new(&stereo_ears(), 10);
    thunder.start(&small).unwrap();
    let before: Vec<_> = (0..2).map(|e| thunder.segments(e).to_vec()).collect();

    let mut big = LightningBolt::new(11, 0);
    big.generate(3000.0, 1000.0, 1.0).unwrap();
    match thunder.start(&big) {
        Err(LightningError::CapacityExceeded { bolt, renderer }) => {
            assert_eq!(bolt, 11);
            assert_eq!(renderer, 10);
        }
        other => panic!("expected capacity error, got {:?}", other),
    }

    for (e, table) in before.iter().enumerate() {
        assert_eq!(thunder.segments(e), table.as_slice());
    }
}

#[test]
fn test_zero_segment_bolt_renders_nothing() {
    let mut bolt = LightningBolt::new(0, 0);
    bolt.generate(3000.0, 1000.0, 1.0).unwrap();
    let mut thunder = Thunder::new(&stereo_ears(), 0);
    thunder.start(&bolt).unwrap();
    assert!(thunder.render_audio(44_100).is_empty());
}

#[test]
fn test_onset_delay_matches_nearest_distance() {
    let mut bolt = LightningBolt::new(64, 5);
    bolt.generate(3000.0, 1000.0, 1.0).unwrap();
    let mut thunder = Thunder::new(&stereo_ears(), 64);
    thunder.start(&bolt).unwrap();

    let nearest = (0..2)
        .flat_map(|e| thunder.segments(e).iter().map(|p| p.near()))
        .fold(f64::INFINITY, f64::min);
    let delay = thunder.onset_delay().unwrap();
    assert!((delay - nearest / SPEED_OF_SOUND_IN_AIR).abs() < 1e-12);
}

// ============================================================================
// Convolution
// ============================================================================

#[test]
fn test_stereo_thunder_through_mono_response() {
    let mut storm = Storm::new(ThunderConfig::default().with_max_segments(8));
    let thunder = storm.strike().unwrap();
    let response = AudioBuffer::from_samples(vec![1.0, 0.5, 0.25], 1).unwrap();

    let wet = convolve(&thunder, &response).unwrap();
    assert_eq!(wet.channels(), 2);
    assert_eq!(wet.frames(), thunder.frames() + 3);
}

#[test]
fn test_stereo_with_three_channels_fails() {
    let f = AudioBuffer::new(10, 2).unwrap();
    let g = AudioBuffer::new(10, 3).unwrap();
    assert!(matches!(
        convolve(&f, &g),
        Err(LightningError::IncompatibleChannels { .. })
    ));
}

// ============================================================================
// Storm
// ============================================================================

#[test]
fn test_storm_from_json() {
    let config = ThunderConfig::from_json_str(
        r#"{
            "max_segments": 12,
            "seed": 99,
            "bolt": { "height_meters": 1500.0, "radius_meters": 200.0, "jaggedness": 0.5 },
            "ears": [[300.0, 0.0, 0.0]],
            "sample_rate_hz": 8000,
            "peak_level": 1.0
        }"#,
    )
    .unwrap();

    let mut storm = Storm::new(config);
    let slot = storm.slot();
    let frames = storm.strike_and_publish().unwrap();

    assert_eq!(storm.bolt().segments().len(), 12);
    assert_eq!(slot.channels(), 1);
    assert_eq!(slot.remaining(), frames);

    let mut out = vec![0.0f32; frames];
    assert_eq!(slot.fill(&mut out), frames);
    let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!((peak - 1.0).abs() < 1e-6);
}
