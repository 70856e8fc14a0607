//! Screen reader hints for highlighted and struck-out spans
//!
//! After the text layer of a page has been rendered, every highlight and
//! strikeout gets an invisible "Begin {type} {n}" marker in the text node
//! under its first rectangle and an "End {type} {n}" marker in the node under
//! its last rectangle. `n` counts annotations of that type within one pass.
//!
//! The pass runs detached from `render`. It re-locates the page surface by
//! its page attribute when it fires, since the page may have been
//! re-rendered or removed in the meantime.

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::annotations::{Annotation, AnnotationType};
use crate::error::HintError;
use crate::geometry::Point;
use crate::text_layer::{NodeId, ScreenReaderHint};
use crate::viewer::{SharedViewer, Viewer};
use crate::viewport::scale_up;

/// When the deferred pass may start probing the text layer
#[derive(Debug)]
pub enum HintTrigger {
    /// Run as soon as the task is polled
    Immediate,
    /// Wait a fixed time and hope the text layer is done
    Delay(Duration),
    /// Wait for the text layer renderer to signal completion
    Ready(oneshot::Receiver<()>),
    /// Wait for the signal, but give up waiting after the timeout
    ReadyOrTimeout(oneshot::Receiver<()>, Duration),
}

impl HintTrigger {
    /// A readiness trigger and the sender the text layer renderer fires
    pub fn ready() -> (oneshot::Sender<()>, HintTrigger) {
        let (tx, rx) = oneshot::channel();
        (tx, HintTrigger::Ready(rx))
    }

    /// Like `ready`, bounded by `timeout`
    pub fn ready_or_timeout(timeout: Duration) -> (oneshot::Sender<()>, HintTrigger) {
        let (tx, rx) = oneshot::channel();
        (tx, HintTrigger::ReadyOrTimeout(rx, timeout))
    }

    async fn wait(self, page_number: u32) -> Result<(), HintError> {
        match self {
            HintTrigger::Immediate => Ok(()),
            HintTrigger::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            HintTrigger::Ready(rx) => rx
                .await
                .map_err(|_| HintError::SignalDropped(page_number)),
            HintTrigger::ReadyOrTimeout(rx, timeout) => {
                match tokio::time::timeout(timeout, rx).await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(_)) => Err(HintError::SignalDropped(page_number)),
                    Err(_) => {
                        tracing::warn!(
                            "Text layer for page {} not ready after {:?}, probing anyway",
                            page_number,
                            timeout
                        );
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Per-type running count, local to one pass
#[derive(Debug, Default)]
struct HintCounter {
    counts: HashMap<AnnotationType, u32>,
}

impl HintCounter {
    fn next(&mut self, annotation_type: &AnnotationType) -> u32 {
        let count = self.counts.entry(annotation_type.clone()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Why a marker could not be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// The annotation has no rectangles to probe
    NoRectangles,
    /// No discoverable text node contains the probe point
    NoTextNode,
}

/// A marker that was skipped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissedHint {
    pub uuid: Option<String>,
    pub label: String,
    pub reason: MissReason,
}

/// Outcome of one hint pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HintReport {
    pub page_number: u32,
    pub inserted: usize,
    pub missed: Vec<MissedHint>,
}

impl HintReport {
    fn miss(&mut self, annotation: &Annotation, label: String, reason: MissReason) {
        tracing::warn!(
            "Skipping \"{}\" for annotation {} on page {}: {:?}",
            label,
            annotation.label(),
            self.page_number,
            reason
        );
        self.missed.push(MissedHint {
            uuid: annotation.uuid.clone(),
            label,
            reason,
        });
    }
}

/// Text-layer nodes of `page_number` under the content-space point `(x, y)`
///
/// The point is nudged inward by `probe_offset` on both axes, scaled with
/// the viewport stamped on the page's surface, then moved into screen space
/// by the surface's on-screen position.
pub fn elements_from_point(
    viewer: &Viewer,
    x: f64,
    y: f64,
    page_number: u32,
    probe_offset: f64,
) -> Result<Vec<NodeId>, HintError> {
    let page = viewer
        .find_page(page_number)
        .ok_or(HintError::SurfaceNotFound(page_number))?;

    let rect = page.surface.bounding_client_rect();
    let scaled = scale_up(
        &page.surface,
        Point::new(x, y).offset(probe_offset, probe_offset),
    )?;

    Ok(page
        .text_layer
        .nodes_at(scaled.x + rect.left, scaled.y + rect.top))
}

/// Insert boundary markers for every highlight and strikeout on a page
///
/// A marker whose probe point hits no text node is skipped and recorded in
/// the report. A missing surface aborts the pass.
pub fn insert_screen_reader_hints(
    viewer: &mut Viewer,
    page_number: u32,
    annotations: &[Annotation],
    probe_offset: f64,
) -> Result<HintReport, HintError> {
    let mut counter = HintCounter::default();
    let mut report = HintReport {
        page_number,
        ..HintReport::default()
    };

    for annotation in annotations {
        let count = counter.next(&annotation.annotation_type);
        if !annotation.annotation_type.is_hinted() {
            continue;
        }

        let kind = &annotation.annotation_type;
        let begin = format!("Begin {} {}", kind, count);
        let end = format!("End {} {}", kind, count);

        let (Some(first), Some(last)) = (annotation.first_rect(), annotation.last_rect()) else {
            report.miss(annotation, begin, MissReason::NoRectangles);
            report.miss(annotation, end, MissReason::NoRectangles);
            continue;
        };

        let start_node = elements_from_point(viewer, first.x, first.y, page_number, probe_offset)?
            .first()
            .copied();
        let end_node = elements_from_point(viewer, last.x, last.y, page_number, probe_offset)?
            .first()
            .copied();

        let page = viewer
            .find_page_mut(page_number)
            .ok_or(HintError::SurfaceNotFound(page_number))?;

        match start_node.and_then(|id| page.text_layer.node_mut(id)) {
            Some(node) => {
                node.prepend_hint(ScreenReaderHint::new(begin));
                report.inserted += 1;
            }
            None => report.miss(annotation, begin, MissReason::NoTextNode),
        }

        match end_node.and_then(|id| page.text_layer.node_mut(id)) {
            Some(node) => {
                node.append_hint(ScreenReaderHint::new(end));
                report.inserted += 1;
            }
            None => report.miss(annotation, end, MissReason::NoTextNode),
        }
    }

    Ok(report)
}

/// Spawn the hint pass for a page once `trigger` fires
///
/// Must be called from within a Tokio runtime. Failures are logged; the
/// join handle is the only other place they show up.
pub fn schedule_hints(
    viewer: SharedViewer,
    page_number: u32,
    annotations: Vec<Annotation>,
    trigger: HintTrigger,
    probe_offset: f64,
) -> JoinHandle<Result<HintReport, HintError>> {
    tokio::spawn(async move {
        let result = run_hint_pass(viewer, page_number, &annotations, trigger, probe_offset).await;

        match &result {
            Ok(report) => tracing::debug!(
                "Inserted {} screen reader hints on page {} ({} skipped)",
                report.inserted,
                page_number,
                report.missed.len()
            ),
            Err(e) => tracing::error!("Hint pass for page {} failed: {}", page_number, e),
        }

        result
    })
}

async fn run_hint_pass(
    viewer: SharedViewer,
    page_number: u32,
    annotations: &[Annotation],
    trigger: HintTrigger,
    probe_offset: f64,
) -> Result<HintReport, HintError> {
    trigger.wait(page_number).await?;

    let mut viewer = viewer.lock();
    insert_screen_reader_hints(&mut viewer, page_number, annotations, probe_offset)
}
