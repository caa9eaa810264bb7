//! Command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{FileLogAdapter, TracingLogAdapter};
use crate::app::AppContainer;
use crate::cli::args::{ConvertArgs, FrameArgs, InspectArgs, PlanArgs, SelectionArgs};
use crate::config::Settings;
use crate::domain::model::{BatchRequest, BatchSummary, TimeSpec, VideoPlan};
use crate::ports::{BatchEvent, LogEvent, LogLevel, LogPort};

/// Build the batch request for `selection` from the effective settings
fn build_request(settings: &Settings, selection: &SelectionArgs) -> Result<BatchRequest> {
    let resolution = settings
        .resolve_policy()
        .context("A split mode is required: pass --duration or --count")?;

    let request = BatchRequest::new(
        selection.input.clone(),
        selection.output.clone(),
        selection.start,
        resolution.policy,
    )?
    .with_crop(selection.crop)
    .with_render_settings(settings.render_settings())
    .with_extensions(settings.video_extensions.clone())
    .with_policy_notice(resolution.notice);

    Ok(request)
}

/// Execute the convert command
pub async fn convert(
    container: &dyn AppContainer,
    settings: &Settings,
    args: ConvertArgs,
) -> Result<BatchSummary> {
    let request = build_request(settings, &args.selection)?.with_clean_output(args.clean_output);

    let mut sinks: Vec<Arc<dyn LogPort>> = Vec::new();
    sinks.push(Arc::new(TracingLogAdapter::new()));
    if let Some(log_file) = &args.log_file {
        let file_log = FileLogAdapter::new(log_file)
            .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
        sinks.push(Arc::new(file_log));
    }

    info!(
        "Converting {} into {}",
        request.input_dir.display(),
        request.output_dir.display()
    );
    let mut handle = container.spawn_batch(request);

    let token = handle.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current segment");
            token.cancel();
        }
    });

    let mut summary = None;
    let mut failure = None;
    while let Some(event) = handle.next_event().await {
        match event {
            BatchEvent::Log(event) => {
                for sink in &sinks {
                    sink.log_event(&event).await;
                }
            }
            BatchEvent::Finished(done) => summary = Some(done),
            BatchEvent::Failed(message) => {
                let event = LogEvent::new(LogLevel::Error, message.clone());
                for sink in &sinks {
                    sink.log_event(&event).await;
                }
                failure = Some(message);
            }
        }
    }

    interrupt.abort();
    for sink in &sinks {
        sink.flush().await;
    }
    handle.join().await.context("Batch worker panicked")?;

    if let Some(message) = failure {
        anyhow::bail!("Batch failed: {}", message);
    }
    let summary = summary.context("Batch worker stopped without a result")?;

    println!(
        "Videos: {} found, {} completed, {} skipped, {} failed",
        summary.videos_found,
        summary.videos_completed,
        summary.videos_skipped,
        summary.videos_failed
    );
    println!(
        "Segments: {} rendered, {} failed{}",
        summary.segments_rendered,
        summary.segments_failed,
        if summary.cancelled { " (cancelled)" } else { "" }
    );

    Ok(summary)
}

/// Execute the plan command
pub async fn plan(container: &dyn AppContainer, settings: &Settings, args: PlanArgs) -> Result<()> {
    let request = build_request(settings, &args.selection)?;
    let plans = container
        .convert_interactor()
        .plan_batch(&request)
        .await
        .context("Failed to plan batch")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else {
        print!("{}", format_plans(&plans));
    }
    Ok(())
}

fn format_plans(plans: &[VideoPlan]) -> String {
    let mut text = String::new();
    for plan in plans {
        text.push_str(&format!(
            "{} ({}, {}x{})",
            plan.source.path.display(),
            TimeSpec::from_seconds(plan.source.duration),
            plan.source.width,
            plan.source.height
        ));
        if let Some(crop) = &plan.crop {
            text.push_str(&format!(" crop {}", crop));
        }
        text.push('\n');

        for (segment, output) in plan.segments.iter().zip(&plan.outputs) {
            text.push_str(&format!(
                "  {:>4}  {} - {}  -> {}\n",
                segment.number(),
                TimeSpec::from_seconds(segment.start),
                TimeSpec::from_seconds(segment.end),
                output.display()
            ));
        }
    }
    text
}

/// Execute the inspect command
pub async fn inspect(container: &dyn AppContainer, args: InspectArgs) -> Result<()> {
    let source = container
        .inspect_interactor()
        .inspect_file(&args.input)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&source)?);
    } else {
        println!("File:       {}", source.path.display());
        println!("Duration:   {}", TimeSpec::from_seconds(source.duration));
        println!("Frame size: {}x{}", source.width, source.height);
        match source.frame_rate {
            Some(fps) => println!("Frame rate: {:.3} fps", fps),
            None => println!("Frame rate: unknown"),
        }
    }
    Ok(())
}

/// Execute the frame command
pub async fn frame(container: &dyn AppContainer, args: FrameArgs) -> Result<()> {
    container
        .inspect_interactor()
        .extract_frame(&args.input, args.at, args.crop, &args.output)
        .await
        .with_context(|| format!("Failed to extract frame from {}", args.input.display()))?;

    println!("{}", args.output.display());
    Ok(())
}
