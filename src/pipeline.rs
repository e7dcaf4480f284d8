//! One build pass over a content root.
//!
//! ```text
//! scan  content/  →  Vec<SourceFile>          (sequential, sorted walk)
//! parse           →  Vec<Result<Document, _>> (rayon, order-preserving)
//! index           →  ContentIndex             (barrier: duplicates, policy)
//! routes          →  RouteTable               (collisions, unroutable paths)
//! ```
//!
//! Every build starts from scratch; nothing is carried over between passes.
//! Progress is reported as [`BuildEvent`]s over an optional channel. Events
//! are sent from the calling thread in index order after the parallel stage
//! finishes, so their order does not depend on scheduling.

use crate::category::CategoryRegistry;
use crate::config::SiteConfig;
use crate::document::{self, Document, ValidationError};
use crate::frontmatter::ContentUnit;
use crate::index::{BuildError, ContentIndex};
use crate::render::{MarkdownRenderer, Render};
use crate::routes::{RouteSpec, RouteTable};
use crate::scan::{self, ScanEntry, ScanError, SourceFile};
use rayon::prelude::*;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Progress events emitted during a build.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    Scanned { files: usize },
    DocumentParsed { raw_path: String, title: String },
    DocumentRejected(ValidationError),
    Indexed { documents: usize, rejected: usize },
    RoutesEnumerated { categories: usize, documents: usize },
}

/// Everything one successful build produced.
#[derive(Debug)]
pub struct SiteBuild {
    pub index: ContentIndex,
    pub registry: CategoryRegistry,
    pub routes: RouteTable,
    /// Validation failures left out of the index (report policy only).
    pub diagnostics: Vec<ValidationError>,
}

/// Build the site from `root` with the default markdown renderer.
pub fn build(
    root: &Path,
    config: &SiteConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<SiteBuild, PipelineError> {
    build_with_renderer(root, config, &MarkdownRenderer, events)
}

pub fn build_with_renderer<R: Render>(
    root: &Path,
    config: &SiteConfig,
    renderer: &R,
    events: Option<Sender<BuildEvent>>,
) -> Result<SiteBuild, PipelineError> {
    let entries = scan::scan(root)?;
    Ok(build_from_entries(&entries, config, renderer, events)?)
}

/// Build from scan output; undecodable entries count as invalid documents.
pub fn build_from_entries<R: Render>(
    entries: &[ScanEntry],
    config: &SiteConfig,
    renderer: &R,
    events: Option<Sender<BuildEvent>>,
) -> Result<SiteBuild, BuildError> {
    let results = entries
        .par_iter()
        .map(|entry| match entry {
            Ok(file) => parse_source(file, renderer),
            Err(error) => Err(error.clone()),
        })
        .collect();
    assemble(results, config, events)
}

/// Build from files already in memory.
pub fn build_from_sources<R: Render>(
    files: &[SourceFile],
    config: &SiteConfig,
    renderer: &R,
    events: Option<Sender<BuildEvent>>,
) -> Result<SiteBuild, BuildError> {
    let results = files
        .par_iter()
        .map(|file| parse_source(file, renderer))
        .collect();
    assemble(results, config, events)
}

fn parse_source<R: Render>(file: &SourceFile, renderer: &R) -> Result<Document, ValidationError> {
    let unit = ContentUnit::from_source(file)?;
    document::parse(&unit, renderer)
}

/// Index and route the parse results of one build, in scan order.
fn assemble(
    results: Vec<Result<Document, ValidationError>>,
    config: &SiteConfig,
    events: Option<Sender<BuildEvent>>,
) -> Result<SiteBuild, BuildError> {
    emit(&events, BuildEvent::Scanned { files: results.len() });

    for result in &results {
        let event = match result {
            Ok(document) => BuildEvent::DocumentParsed {
                raw_path: document.raw_path.clone(),
                title: document.title.clone(),
            },
            Err(error) => BuildEvent::DocumentRejected(error.clone()),
        };
        emit(&events, event);
    }

    let outcome = ContentIndex::build(results, config.build.on_invalid)?;
    emit(
        &events,
        BuildEvent::Indexed {
            documents: outcome.index.len(),
            rejected: outcome.diagnostics.len(),
        },
    );

    let registry = CategoryRegistry::new(&config.categories);
    let routes = RouteTable::build(&outcome.index, &registry, &config.routes)?;
    let categories = routes
        .routes()
        .iter()
        .filter(|r| matches!(r, RouteSpec::Category { .. }))
        .count();
    emit(
        &events,
        BuildEvent::RoutesEnumerated {
            categories,
            documents: routes.len() - categories,
        },
    );

    Ok(SiteBuild {
        index: outcome.index,
        registry,
        routes,
        diagnostics: outcome.diagnostics,
    })
}

fn emit(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is listening; the build goes on.
        tx.send(event).ok();
    }
}
