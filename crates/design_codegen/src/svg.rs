//! Icon asset discovery and path-geometry extraction.

use crate::error::{CodegenError, CodegenResult, CodegenWarning};
use regex::Regex;
use roxmltree::{Document, ParsingOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const SVG_SUFFIX: &str = ".svg";

/// One `.svg` file from the icon directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconAsset {
    /// File name without the `.svg` suffix.
    pub name: String,
    /// Location on disk.
    pub path: PathBuf,
    /// Raw file contents.
    pub markup: String,
}

/// Every icon asset of one directory, sorted by name.
#[derive(Clone, Debug)]
pub struct IconSet {
    /// Directory the set was read from.
    pub dir: PathBuf,
    /// Assets in lexicographic name order.
    pub icons: Vec<IconAsset>,
    /// Degraded states found while reading the directory.
    pub warnings: Vec<CodegenWarning>,
}

impl IconSet {
    /// Icon names in enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.icons.iter().map(|icon| icon.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Ordered path data for one icon.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconPaths {
    pub name: String,
    /// `d` attribute values in document order.
    pub paths: Vec<String>,
}

/// Path data for a whole icon set.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathDataMap {
    pub entries: Vec<IconPaths>,
    pub warnings: Vec<CodegenWarning>,
}

/// Read every `.svg` file in `dir`.
///
/// A missing directory is fatal. An existing directory without icons yields an
/// empty set carrying [`CodegenWarning::EmptyIconSet`]. A file named exactly
/// `.svg` has no icon name; it is skipped with [`CodegenWarning::UnnamedIcon`].
pub fn load_icon_set(dir: &Path) -> CodegenResult<IconSet> {
    if !dir.is_dir() {
        return Err(CodegenError::IconDirectoryMissing {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
        .map_err(|source| CodegenError::Read {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut icons = Vec::new();
    let mut warnings = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(name) = file_name.strip_suffix(SVG_SUFFIX) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }
        if name.is_empty() {
            warnings.push(CodegenWarning::UnnamedIcon { path });
            continue;
        }
        let markup = fs::read_to_string(&path).map_err(|source| CodegenError::Read {
            path: path.clone(),
            source,
        })?;
        icons.push(IconAsset {
            name: name.to_string(),
            path,
            markup,
        });
    }
    icons.sort_by(|a, b| a.name.cmp(&b.name));

    if icons.is_empty() {
        warnings.push(CodegenWarning::EmptyIconSet {
            dir: dir.to_path_buf(),
        });
    }

    Ok(IconSet {
        dir: dir.to_path_buf(),
        icons,
        warnings,
    })
}

/// Collect the `d` attribute of every `<path>` element of an asset, in document order.
///
/// Other shape elements are ignored; an icon without paths gives an empty list.
/// Markup that is not well-formed XML is scanned for `<path ... d="...">` tags
/// instead, and the returned warning says so.
pub fn extract_path_data(asset: &IconAsset) -> (Vec<String>, Option<CodegenWarning>) {
    match path_data(&asset.markup) {
        Ok(paths) => (paths, None),
        Err(err) => (
            scanned_path_data(&asset.markup),
            Some(CodegenWarning::MalformedSvg {
                name: asset.name.clone(),
                reason: err.to_string(),
            }),
        ),
    }
}

/// Extract path data for every icon of `set`.
///
/// Icons without any path data stay in the map with an empty list and add a
/// [`CodegenWarning::IconWithoutPaths`]. Malformed icons stay in the map with
/// whatever the tag scan recovered and add a [`CodegenWarning::MalformedSvg`].
pub fn extract_icon_paths(set: &IconSet) -> PathDataMap {
    let mut map = PathDataMap::default();
    for icon in &set.icons {
        let (paths, warning) = extract_path_data(icon);
        match warning {
            Some(warning) => map.warnings.push(warning),
            None if paths.is_empty() => map.warnings.push(CodegenWarning::IconWithoutPaths {
                name: icon.name.clone(),
            }),
            None => {}
        }
        map.entries.push(IconPaths {
            name: icon.name.clone(),
            paths,
        });
    }
    map
}

fn path_data(markup: &str) -> Result<Vec<String>, roxmltree::Error> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(markup, options)?;
    Ok(doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "path")
        .filter_map(|node| node.attribute("d"))
        .map(str::to_string)
        .collect())
}

fn scanned_path_data(markup: &str) -> Vec<String> {
    path_tag()
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|d| d.as_str().to_string())
        .collect()
}

fn path_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"<(?:[\w-]+:)?path\b[^>]*?\sd\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("valid <path> regex")
    })
}
