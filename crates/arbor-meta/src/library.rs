//! # Library Assembler
//!
//! Drives the whole validation: loads the library main metadata (or its
//! package-descriptor fallback), walks the directory tree breadth-first
//! discovering components at metadata markers, and cross-validates
//! groups and tags into one merged [`LibraryMeta`].
//!
//! The walk is an explicit worklist: a queue of pending directories, each
//! visit producing zero or more children appended to the queue. Children
//! are visited in sorted name order, so traversal is deterministic for a
//! given filesystem state. A single component failure aborts the whole
//! assembly; no partial library is ever produced.

use std::collections::VecDeque;
use std::path::Path;

use arbor_core::LibraryMeta;
use arbor_schema::{MetaSchemas, SchemaProfile};

use crate::component::assemble_component;
use crate::error::{ConsistencyError, MetaError};
use crate::fsio::{list_subdirectories, read_json_file};
use crate::{METADATA_DIR, METADATA_MAIN_FILE, PACKAGE_FILE, PACKAGE_META_KEY};

/// Assemble a component library rooted at `root`.
pub fn assemble_library(root: &Path, profile: SchemaProfile) -> Result<LibraryMeta, MetaError> {
    let schemas = MetaSchemas::new(profile);

    let main_path = root.join(METADATA_MAIN_FILE);
    let mut raw = read_json_file(&main_path)?;
    let mut source_path = main_path;

    if raw.is_none() {
        let package_path = root.join(PACKAGE_FILE);
        if let Some(package) = read_json_file(&package_path)? {
            raw = package.get(PACKAGE_META_KEY).cloned();
            source_path = package_path;
        }
    }

    let Some(raw) = raw else {
        return Err(ConsistencyError::NotALibrary {
            path: root.to_path_buf(),
        }
        .into());
    };

    schemas
        .validate_main(&raw)
        .map_err(|violations| MetaError::Structural {
            document: "library metadata",
            path: source_path.clone(),
            violations,
        })?;

    let has_inline_components = raw.get("components").is_some();

    let mut library: LibraryMeta =
        serde_json::from_value(raw).map_err(|e| MetaError::Decode {
            document: "library metadata",
            path: source_path,
            source: e,
        })?;

    if library.container_style.is_some() && !library.global_style {
        return Err(ConsistencyError::ContainerStyleWithoutGlobalStyle.into());
    }

    if !has_inline_components {
        let namespace = library.namespace.clone();
        if let Err(e) = discover_components(&mut library, root, &schemas) {
            return Err(MetaError::Library {
                namespace,
                source: Box::new(e),
            });
        }
    }

    attach_tags(&mut library)?;

    tracing::info!(
        namespace = %library.namespace,
        components = library.components.len(),
        "component library assembled"
    );

    Ok(library)
}

/// Breadth-first walk over the directory tree, assembling a component at
/// every metadata marker. The marker directory itself is never descended
/// into.
fn discover_components(
    library: &mut LibraryMeta,
    root: &Path,
    schemas: &MetaSchemas,
) -> Result<(), MetaError> {
    let mut queue: VecDeque<std::path::PathBuf> = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(dir) = queue.pop_front() {
        let marker = dir.join(METADATA_DIR);
        if marker.is_dir() {
            let meta = assemble_component(&marker, schemas)?;

            if let Some(group) = &meta.group {
                if !library.component_groups.contains_key(group) {
                    return Err(ConsistencyError::UnknownComponentGroup {
                        component: meta.display_name.clone(),
                        group: group.clone(),
                    }
                    .into());
                }
            }

            tracing::debug!(
                component = %meta.display_name,
                dir = %dir.display(),
                "discovered component"
            );
            library.components.insert(meta.display_name.clone(), meta);
        }

        for child in list_subdirectories(&dir)? {
            if child.file_name().is_some_and(|name| name == METADATA_DIR) {
                continue;
            }
            queue.push_back(child);
        }
    }

    Ok(())
}

/// Cross-validate tag sections against the discovered components and
/// attach each valid tag to its components. Duplicates collapse on
/// insert; the final representation stays an ordered sequence.
fn attach_tags(library: &mut LibraryMeta) -> Result<(), MetaError> {
    let tags = library.tags.clone();
    for (tag, component_names) in &tags {
        for name in component_names {
            match library.components.get_mut(name) {
                Some(component) => component.add_tag(tag),
                None => {
                    return Err(ConsistencyError::UnknownTaggedComponent {
                        component: name.clone(),
                        tag: tag.clone(),
                        file: METADATA_MAIN_FILE.to_string(),
                    }
                    .into())
                }
            }
        }
    }
    Ok(())
}
