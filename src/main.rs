//! annotate-render
//!
//! Renders one page of stored annotations to SVG and, given the page's text
//! layer, runs the screen reader hint pass over it.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use annotation_layer::{
    AnnotationResponse, AnnotationSource, ClientRect, DrawerRegistry, HintTrigger, MemorySource,
    PageRenderer, PageView, RenderConfig, Surface, TextLayer, Viewer, Viewport,
};

#[derive(Parser)]
#[command(name = "annotate-render")]
#[command(about = "Render page annotations to SVG with screen reader hints")]
#[command(version)]
struct Cli {
    /// Annotation response JSON ({documentId, pageNumber, annotations})
    #[arg(long)]
    annotations: PathBuf,

    /// Viewport JSON; defaults to an unrotated viewport at --scale
    #[arg(long)]
    viewport: Option<PathBuf>,

    /// Scale used when no viewport file is given
    #[arg(long, default_value = "1.0")]
    scale: f64,

    /// Text layer JSON; enables the hint pass
    #[arg(long)]
    text_layer: Option<PathBuf>,

    /// On-screen left edge of the surface
    #[arg(long, default_value = "0")]
    left: f64,

    /// On-screen top edge of the surface
    #[arg(long, default_value = "0")]
    top: f64,

    /// Leave annotations of unknown types undrawn instead of failing
    #[arg(long)]
    skip_unknown: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "annotation_layer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = RenderConfig::from_env();
    // Without a text layer there is nowhere to put hints
    config.hints.enabled &= cli.text_layer.is_some();

    let response: AnnotationResponse = read_json(&cli.annotations)?;
    let (document_id, page_number) = (response.document_id.clone(), response.page_number);
    let source = MemorySource::new();
    source.load(response);
    let data = source.get_annotations(&document_id, page_number).await?;

    let viewport = match &cli.viewport {
        Some(path) => read_json::<Viewport>(path)?,
        None => Viewport::new(cli.scale, 0, 612.0 * cli.scale, 792.0 * cli.scale),
    };

    let text_layer = cli
        .text_layer
        .as_ref()
        .map(read_json::<TextLayer>)
        .transpose()?;

    let bounds = ClientRect::from_origin(cli.left, cli.top, viewport.width, viewport.height);
    let mut viewer = Viewer::new();
    let slot = viewer.add_page(PageView::new(
        Surface::with_bounds(bounds),
        text_layer.unwrap_or_default(),
    ));
    let viewer = viewer.into_shared();

    let mut drawer = DrawerRegistry::with_defaults();
    if cli.skip_unknown {
        drawer = drawer.skip_unknown();
    }
    let renderer = PageRenderer::with_drawer(drawer, config);
    let (ready, trigger) = HintTrigger::ready();
    let handle = renderer
        .render_page(&viewer, slot, &viewport, Some(&data), trigger)
        .context("Render failed")?;

    let svg = viewer
        .lock()
        .page(slot)
        .context("Page container vanished")?
        .surface
        .to_svg_string()?;
    println!("{}", svg);

    // The text layer was loaded up front, so it is ready now
    ready.send(()).ok();

    if let Some(handle) = handle {
        let report = handle.await?.context("Hint pass failed")?;
        println!("{}", serde_json::to_string_pretty(&report)?);

        let guard = viewer.lock();
        let page = guard.page(slot).context("Page container vanished")?;
        for node in &page.text_layer.nodes {
            println!("{}", node.to_html());
        }
    }

    Ok(())
}
