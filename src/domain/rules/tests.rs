// Unit tests for business rules

use super::*;

fn crop(x: u32, y: u32, width: u32, height: u32) -> CropRegion {
    CropRegion::new(x, y, width, height).unwrap()
}

#[test]
fn test_crop_inside_frame_is_unchanged() {
    let fitted = CropFitter::fit(&crop(10, 20, 100, 50), 640, 480).unwrap();
    assert_eq!(fitted.region, crop(10, 20, 100, 50));
    assert!(!fitted.clamped);
}

#[test]
fn test_crop_covering_whole_frame_is_unchanged() {
    let fitted = CropFitter::fit(&crop(0, 0, 640, 480), 640, 480).unwrap();
    assert!(!fitted.clamped);
}

#[test]
fn test_crop_overhanging_frame_is_clamped() {
    let fitted = CropFitter::fit(&crop(600, 400, 100, 100), 640, 480).unwrap();
    assert_eq!(fitted.region, crop(600, 400, 40, 80));
    assert!(fitted.clamped);
}

#[test]
fn test_crop_outside_frame_is_rejected() {
    assert!(matches!(
        CropFitter::fit(&crop(640, 0, 10, 10), 640, 480),
        Err(DomainError::InvalidCrop(_))
    ));
    assert!(matches!(
        CropFitter::fit(&crop(0, 500, 10, 10), 640, 480),
        Err(DomainError::InvalidCrop(_))
    ));
}

#[test]
fn test_crop_with_huge_extent_does_not_overflow() {
    let fitted = CropFitter::fit(&crop(1, 1, u32::MAX, u32::MAX), 640, 480).unwrap();
    assert_eq!(fitted.region, crop(1, 1, 639, 479));
}

#[test]
fn test_policy_duration_only() {
    let resolution = SplitPolicyResolver::resolve(Some(5.0), None).unwrap();
    assert_eq!(resolution.policy, SplitPolicy::ByDuration { segment_seconds: 5.0 });
    assert!(resolution.notice.is_none());
}

#[test]
fn test_policy_count_only() {
    let resolution = SplitPolicyResolver::resolve(None, Some(4)).unwrap();
    assert_eq!(resolution.policy, SplitPolicy::ByCount { segment_count: 4 });
    assert!(resolution.notice.is_none());
}

#[test]
fn test_policy_duration_wins_with_notice() {
    let resolution = SplitPolicyResolver::resolve(Some(2.5), Some(7)).unwrap();
    assert_eq!(resolution.policy, SplitPolicy::ByDuration { segment_seconds: 2.5 });
    assert!(resolution.notice.unwrap().contains("using split duration"));
}

#[test]
fn test_policy_missing_is_invalid() {
    assert!(matches!(
        SplitPolicyResolver::resolve(None, None),
        Err(DomainError::InvalidPolicy(_))
    ));
}

#[test]
fn test_policy_bad_values_are_invalid() {
    assert!(SplitPolicyResolver::resolve(Some(-1.0), None).is_err());
    assert!(SplitPolicyResolver::resolve(None, Some(0)).is_err());
}

#[test]
fn test_segment_output_path() {
    let segment = Segment {
        index: 2,
        start: 10.0,
        end: 12.0,
    };
    let path = OutputNaming::segment_path(
        Path::new("/out"),
        Path::new("/videos/holiday.mp4"),
        &segment,
        OutputFormat::Gif,
    );
    assert_eq!(path, PathBuf::from("/out/holiday/3.gif"));
}

#[test]
fn test_normalize_extensions() {
    let normalized = normalize_extensions(&[".MP4", "mov", "mp4", " .avi ", ""]);
    assert_eq!(normalized, vec!["mp4", "mov", "avi"]);
}
