// Unit tests for domain models

use super::*;

#[test]
fn test_time_spec_parse_seconds() {
    let time = TimeSpec::parse("123.456").unwrap();
    assert_eq!(time.seconds, 123.456);
}

#[test]
fn test_time_spec_parse_mm_ss() {
    let time = TimeSpec::parse("01:30.5").unwrap();
    assert_eq!(time.seconds, 90.5);
}

#[test]
fn test_time_spec_parse_hh_mm_ss() {
    let time = TimeSpec::parse("01:02:03.5").unwrap();
    assert_eq!(time.seconds, 3723.5);
}

#[test]
fn test_time_spec_parse_invalid() {
    assert!(TimeSpec::parse("invalid").is_err());
    assert!(TimeSpec::parse("00:60").is_err());
    assert!(TimeSpec::parse("1:60:00").is_err());
    assert!(TimeSpec::parse("-10").is_err());
    assert!(TimeSpec::parse("inf").is_err());
}

#[test]
fn test_time_spec_display() {
    let time = TimeSpec::from_seconds(3723.456);
    assert_eq!(format!("{}", time), "1:02:03.456");

    let time_no_hours = TimeSpec::from_seconds(123.456);
    assert_eq!(format!("{}", time_no_hours), "2:03.456");
}

#[test]
fn test_crop_region_parse() {
    let crop: CropRegion = "10, 20, 320,240".parse().unwrap();
    assert_eq!(crop, CropRegion::new(10, 20, 320, 240).unwrap());
    assert_eq!(crop.right(), 330);
    assert_eq!(crop.bottom(), 260);
    assert_eq!(crop.to_string(), "320x240+10+20");
}

#[test]
fn test_crop_region_invalid() {
    assert!("10,20,0,240".parse::<CropRegion>().is_err());
    assert!("10,20,320".parse::<CropRegion>().is_err());
    assert!("-1,0,10,10".parse::<CropRegion>().is_err());
    assert!("a,b,c,d".parse::<CropRegion>().is_err());
}

#[test]
fn test_split_policy_constructors() {
    assert_eq!(
        SplitPolicy::by_duration(5.0).unwrap(),
        SplitPolicy::ByDuration { segment_seconds: 5.0 }
    );
    assert_eq!(
        SplitPolicy::by_count(3).unwrap(),
        SplitPolicy::ByCount { segment_count: 3 }
    );
    assert!(matches!(
        SplitPolicy::by_duration(0.0),
        Err(DomainError::InvalidPolicy(_))
    ));
    assert!(SplitPolicy::by_duration(f64::NAN).is_err());
    assert!(matches!(
        SplitPolicy::by_count(0),
        Err(DomainError::InvalidPolicy(_))
    ));
}

#[test]
fn test_segment_numbering() {
    let segment = Segment {
        index: 0,
        start: 10.0,
        end: 12.5,
    };
    assert_eq!(segment.number(), 1);
    assert_eq!(segment.duration(), 2.5);
}

#[test]
fn test_video_source_validation() {
    let source = VideoSource::new(PathBuf::from("/videos/clip.final.mp4"), 12.0, 640, 480)
        .unwrap()
        .with_frame_rate(29.97);
    assert_eq!(source.base_name(), "clip.final");
    assert_eq!(source.frame_rate, Some(29.97));

    assert!(VideoSource::new(PathBuf::from("a.mp4"), 0.0, 640, 480).is_err());
    assert!(VideoSource::new(PathBuf::from("a.mp4"), 5.0, 0, 480).is_err());
}

#[test]
fn test_output_format_parse() {
    assert_eq!(OutputFormat::parse("GIF").unwrap(), OutputFormat::Gif);
    assert_eq!(OutputFormat::parse("webp").unwrap().extension(), "webp");
    assert_eq!(OutputFormat::parse("apng").unwrap().extension(), "png");
    assert!(OutputFormat::parse("mp4").is_err());
}

#[test]
fn test_batch_request_validation() {
    let policy = SplitPolicy::by_count(2).unwrap();
    let request = BatchRequest::new("in", "out", TimeSpec::zero(), policy).unwrap();
    assert_eq!(request.render, RenderSettings::default());
    assert_eq!(request.extensions.len(), DEFAULT_VIDEO_EXTENSIONS.len());
    assert!(request.crop.is_none());

    assert!(BatchRequest::new("", "out", TimeSpec::zero(), policy).is_err());
    assert!(BatchRequest::new("in", "out", TimeSpec::from_seconds(-1.0), policy).is_err());
}

#[test]
fn test_render_job_seeks_in_untrimmed_source() {
    let source = VideoSource::new(PathBuf::from("a.mp4"), 30.0, 640, 480).unwrap();
    let segment = Segment {
        index: 1,
        start: 5.0,
        end: 10.0,
    };
    let job = RenderJob::new(
        &source,
        segment,
        2.5,
        None,
        PathBuf::from("out/a/2.gif"),
        RenderSettings::default(),
    );
    assert_eq!(job.seek, 7.5);
    assert_eq!(job.duration, 5.0);
}

#[test]
fn test_batch_summary_record() {
    let mut summary = BatchSummary::default();
    summary.record(&VideoOutcome::Completed {
        rendered: 3,
        failed: 1,
    });
    summary.record(&VideoOutcome::Skipped {
        reason: "too short".to_string(),
    });
    summary.record(&VideoOutcome::Failed {
        error: DomainError::InternalError("boom".to_string()),
    });

    assert_eq!(summary.videos_completed, 1);
    assert_eq!(summary.videos_skipped, 1);
    assert_eq!(summary.videos_failed, 1);
    assert_eq!(summary.segments_rendered, 3);
    assert_eq!(summary.segments_failed, 1);
    assert!(!summary.cancelled);
}
