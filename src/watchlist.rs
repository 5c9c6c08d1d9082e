use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use validator::Validate;

use crate::models::{ProductDescriptor, WatchList};
use crate::utils::error::{AppError, Result};

/// Lists the files directly inside `dir`, sorted by path. Subdirectories are
/// not descended into and file names are not filtered.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| AppError::Discovery {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| AppError::Discovery {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    debug!("Discovered {} watch-list files in {}", files.len(), dir.display());
    Ok(files)
}

/// Parses one watch-list file. Every entry must be a complete, valid
/// descriptor or the whole file is rejected.
pub fn load_watch_list(path: &Path) -> Result<WatchList> {
    let content = fs::read_to_string(path).map_err(|e| AppError::WatchList {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let products: Vec<ProductDescriptor> =
        serde_json::from_str(&content).map_err(|e| AppError::WatchList {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for (index, product) in products.iter().enumerate() {
        product.validate().map_err(|e| AppError::WatchList {
            path: path.to_path_buf(),
            message: format!("entry {}: {}", index, e),
        })?;
    }

    Ok(WatchList {
        path: path.to_path_buf(),
        products,
    })
}

/// Discovers and loads every watch-list file. The first malformed file
/// aborts the load.
pub fn load_all(dir: &Path) -> Result<Vec<WatchList>> {
    let mut lists = Vec::new();
    for path in discover(dir)? {
        let list = load_watch_list(&path)?;
        info!("Loaded {} products from {}", list.len(), path.display());
        lists.push(list);
    }
    Ok(lists)
}

pub fn save_watch_list(path: &Path, products: &[ProductDescriptor]) -> Result<()> {
    let json = serde_json::to_string_pretty(products)?;
    fs::write(path, json)?;
    Ok(())
}
