//! Persisted per-level hierarchy reports.
//!
//! Each level is written as `level{n}.json` holding its clusters, their
//! member points and the raw parent index of every cluster.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{error::ReportError, geometry::Point, hierarchy::Hierarchy};

#[derive(Serialize)]
struct LayerDocument<'a> {
    level: usize,
    clusters: Vec<ClusterEntry<'a>>,
}

#[derive(Serialize)]
struct ClusterEntry<'a> {
    index: usize,
    // `None` when a pinned row has no entry for this cluster.
    parent: Option<i64>,
    points: &'a [Point],
}

fn layer_document(hierarchy: &Hierarchy, level: usize) -> Result<LayerDocument<'_>, ReportError> {
    let layer = hierarchy
        .layer(level)
        .ok_or(ReportError::UnknownLevel { level })?;
    let clusters = layer
        .clusters()
        .iter()
        .enumerate()
        .map(|(index, cluster)| ClusterEntry {
            index,
            parent: hierarchy.parent_of(level, index).map(|link| link.as_raw()),
            points: cluster.points(),
        })
        .collect();
    Ok(LayerDocument { level, clusters })
}

/// Renders the report document for one level into `writer`.
///
/// # Errors
/// Returns [`ReportError::UnknownLevel`] when `level` is outside the hierarchy
/// and [`ReportError::Serialise`] when encoding or writing fails.
///
/// # Examples
/// ```
/// use fogtier_core::{HierarchyPlanner, Node, Point, render_layer};
///
/// let nodes = [
///     Node::new(Point::new(0.0, 0.0, 0.0), 1),
///     Node::new(Point::new(3.0, 4.0, 0.0), 2),
/// ];
/// let planner = HierarchyPlanner::builder()
///     .with_layer_count(2)
///     .with_max_distances(vec![10.0, 10.0])
///     .build()?;
/// let hierarchy = planner.plan(&nodes)?;
///
/// let mut out = Vec::new();
/// render_layer(&hierarchy, 2, &mut out)?;
/// let doc: serde_json::Value = serde_json::from_slice(&out)?;
/// assert_eq!(doc["level"], 2);
/// assert_eq!(doc["clusters"][0]["parent"], -1);
/// assert_eq!(doc["clusters"][0]["points"][0]["y"], 4.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_layer(
    hierarchy: &Hierarchy,
    level: usize,
    writer: impl Write,
) -> Result<(), ReportError> {
    let document = layer_document(hierarchy, level)?;
    serde_json::to_writer_pretty(writer, &document)
        .map_err(|source| ReportError::Serialise { level, source })
}

/// Outcome of a successful [`ReportWriter::write`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSummary {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl ReportSummary {
    /// Returns the directory the report was written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the written files, lowest level first.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Writes one JSON document per level into a directory.
#[derive(Clone, Debug)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Creates a writer targeting `dir`, which is created on demand.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file a level is written to.
    #[must_use]
    pub fn level_path(&self, level: usize) -> PathBuf {
        self.dir.join(format!("level{level}.json"))
    }

    /// Writes every level of `hierarchy`.
    ///
    /// The hierarchy is only borrowed, so a failed write leaves it intact for
    /// the caller.
    ///
    /// # Errors
    /// Returns [`ReportError::Io`] when the directory cannot be created or a
    /// file cannot be written and [`ReportError::Serialise`] when encoding a
    /// level fails.
    #[instrument(
        name = "report.write",
        err,
        skip(self, hierarchy),
        fields(dir = %self.dir.display(), layers = hierarchy.layer_count()),
    )]
    pub fn write(&self, hierarchy: &Hierarchy) -> Result<ReportSummary, ReportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut files = Vec::with_capacity(hierarchy.layer_count());
        for level in 1..=hierarchy.layer_count() {
            let document = layer_document(hierarchy, level)?;
            let bytes = serde_json::to_vec_pretty(&document)
                .map_err(|source| ReportError::Serialise { level, source })?;
            let path = self.level_path(level);
            fs::write(&path, bytes).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(level, path = %path.display(), "wrote level report");
            files.push(path);
        }

        Ok(ReportSummary {
            dir: self.dir.clone(),
            files,
        })
    }
}
