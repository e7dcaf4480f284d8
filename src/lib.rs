//! # Simple Notes
//!
//! Indexes a tree of markdown notes and derives the complete, collision-free
//! set of static routes that publish them. Your filesystem is the data source:
//! top-level directories are categories by convention, each note carries YAML
//! front matter, and its path below the content root is its identity.
//!
//! # Architecture: One Build Pass
//!
//! ```text
//! 1. Scan     content/      →  source files        (filesystem → memory)
//! 2. Parse    source files  →  documents           (parallel, per file)
//! 3. Index    documents     →  ContentIndex        (duplicate check, policy)
//! 4. Routes   index         →  RouteTable          (collision check)
//! 5. Write    build         →  manifest.json, routes.json
//! ```
//!
//! Every build recomputes everything from the source files. There is no
//! incremental state and nothing mutates the index after it is built, so the
//! index, the category registry and the route table are shared read-only by
//! every reader.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the content root and reads every note into memory |
//! | [`frontmatter`] | Splits a note into its YAML metadata and markdown body |
//! | [`naming`] | Raw path, slug and segment derivation from file paths |
//! | [`render`] | Markdown → sanitized HTML, behind the [`render::Render`] trait |
//! | [`document`] | Validates metadata into a [`document::Document`] |
//! | [`category`] | The category registry built from config |
//! | [`index`] | The immutable content index and structural build errors |
//! | [`query`] | Filtering, date ordering, counts, listings, related notes |
//! | [`routes`] | Static route enumeration, URL schemes, request resolution |
//! | [`pipeline`] | Runs one build pass and reports progress events |
//! | [`types`] | JSON manifests written for the site builder |
//! | [`config`] | `config.toml` loading, validation and stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fail on Ambiguity, Report Everything Else
//!
//! A note with bad metadata is a local problem: by default it is left out and
//! reported while the rest of the site builds. Two notes claiming the same
//! raw path, or two routes mapping onto the same page, are structural: the
//! route manifest would be wrong, so the build stops instead of silently
//! picking a winner.
//!
//! ## Index Files Flatten
//!
//! `reading/deep-work/index.md` and `reading/deep-work.md` both become
//! `reading/deep-work`. Keeping either layout is a matter of taste; keeping
//! both at once is a duplicate path.
//!
//! ## Unknown Categories Are Kept
//!
//! A note whose `category` is not registered still builds and still has its
//! own page. It just appears on no category page, and `stats` lists it in an
//! unrecognized bucket so the typo is easy to find.

pub mod category;
pub mod config;
pub mod document;
pub mod frontmatter;
pub mod index;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod query;
pub mod render;
pub mod routes;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
