//! Directory scanner producing entity trees.
//!
//! Directories become `package` nodes and files with a known extension become
//! `module` nodes. Sources are not parsed, so no `class` nodes are produced.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use crate::domain::{EntityKind, EntityNode};
use crate::infrastructure::error::{InfraError, InfraResult};

/// What to pick up and what to leave out while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// File extensions that make a module (e.g. [".py"])
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
    /// File names never turned into modules
    pub exclude_files: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec![".py".into()],
            exclude_dirs: vec!["__pycache__".into()],
            exclude_files: vec![],
        }
    }
}

impl ScanOptions {
    /// Strip a known extension, returning the module name.
    fn module_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.extensions.iter().find_map(|ext| {
            let ext = ext.trim_start_matches('.');
            file_name
                .strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
                .filter(|stem| !stem.is_empty())
        })
    }

    fn keep(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            warn!("Hidden file {}, skipping ...", entry.path().display());
            return false;
        }
        if entry.path_is_symlink() {
            warn!("Found link: {}, skipping ...", entry.path().display());
            return false;
        }
        if entry.file_type().is_dir() {
            !self.exclude_dirs.iter().any(|d| *d == name)
        } else {
            !self.exclude_files.iter().any(|f| *f == name)
        }
    }
}

/// Build the entity tree rooted at `root`.
///
/// Children are listed in file name order. Skipped directories are pruned
/// before the walk descends into them. Open directories sit on a stack, one
/// per depth, and are wrapped once the walk leaves them.
#[instrument(level = "debug", skip(options))]
pub fn scan_directory(root: &Path, options: &ScanOptions) -> InfraResult<EntityNode> {
    if !root.is_dir() {
        return Err(InfraError::NotADirectory(root.to_path_buf()));
    }
    let root = fs::canonicalize(root)
        .map_err(|e| InfraError::io(format!("canonicalize {}", root.display()), e))?;
    info!("Generating tree info for the directory {}", root.display());

    let mut open: Vec<(PathBuf, Vec<EntityNode>)> = Vec::new();
    let mut tree = None;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || options.keep(entry));

    for entry in walker {
        let entry = entry?;
        // open[i] is the directory at depth i
        while open.len() > entry.depth() {
            close_directory(&mut open, &mut tree)?;
        }

        let path = entry.path();
        if entry.file_type().is_dir() {
            open.push((path.to_path_buf(), Vec::new()));
        } else if entry.file_type().is_file() {
            let file_name = entry.file_name().to_string_lossy();
            if let Some(module) = options.module_name(&file_name) {
                debug!("Found file: {}", path.display());
                let node = EntityNode::leaf(module, EntityKind::Module)?;
                if let Some((_, children)) = open.last_mut() {
                    children.push(node);
                }
            }
        }
    }
    while !open.is_empty() {
        close_directory(&mut open, &mut tree)?;
    }

    let tree = tree.ok_or_else(|| InfraError::NotADirectory(root.clone()))?;
    info!("Scanned {} entities below {}", tree.node_count(), root.display());
    Ok(tree)
}

/// Wrap the innermost open directory into a package node and hand it to its
/// parent, or make it the tree once the root is closed.
fn close_directory(
    open: &mut Vec<(PathBuf, Vec<EntityNode>)>,
    tree: &mut Option<EntityNode>,
) -> InfraResult<()> {
    let Some((path, children)) = open.pop() else {
        return Ok(());
    };
    debug!("Found directory {} ({} children)", path.display(), children.len());
    let node = EntityNode::new(entity_name(&path), EntityKind::Package, children)?;
    match open.last_mut() {
        Some((_, siblings)) => siblings.push(node),
        None => *tree = Some(node),
    }
    Ok(())
}

fn entity_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
