use super::*;

use price_sentinel::watchlist::{discover, load_all, load_watch_list, save_watch_list};
use price_sentinel::ProductDescriptor;
use tempfile::tempdir;

#[test]
fn test_discovery_finds_every_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let names = ["moviles", "audio.json", "LINKS.TXT", "2024-11", "x"];
    for name in names {
        std::fs::write(dir.path().join(name), "[]")?;
    }

    let files = discover(dir.path())?;
    assert_eq!(files.len(), names.len());

    Ok(())
}

#[test]
fn test_round_trip_preserves_descriptors() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("audio");
    let products = vec![
        ProductDescriptor::new("audio", "Sony", "https://www.amazon.es/dp/B07G4MNFS1"),
        ProductDescriptor::new("audio", "Bose", "https://www.amazon.es/dp/B0756CYWWD?th=1"),
        ProductDescriptor::new("informática", "Logitech", "https://www.amazon.es/dp/B01E8KO2B0"),
    ];

    save_watch_list(&path, &products)?;
    let loaded = load_watch_list(&path)?;

    assert_eq!(loaded.products, products);
    Ok(())
}

#[test]
fn test_watch_list_file_format() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("moviles.json");
    std::fs::write(
        &path,
        r#"[
            {"seccion": "moviles", "marca": "Xiaomi", "url": "https://www.amazon.es/dp/B07N8RQ6W7"},
            {"marca": "Samsung", "url": "https://www.amazon.es/dp/B07NZVQ16G", "seccion": "moviles"}
        ]"#,
    )?;

    let list = load_watch_list(&path)?;
    assert_eq!(list.len(), 2);
    assert_eq!(list.products[0].brand, "Xiaomi");
    assert_eq!(list.products[1].section, "moviles");
    assert_eq!(list.products[1].url, "https://www.amazon.es/dp/B07NZVQ16G");

    Ok(())
}

#[test]
fn test_links_dir_from_config() -> anyhow::Result<()> {
    let root = tempdir()?;
    let config = write_config(root.path(), &[])?;
    assert_eq!(config.watch_list.dir, root.path().join("links"));

    std::fs::create_dir_all(&config.watch_list.dir)?;
    save_watch_list(
        &config.watch_list.dir.join("a.json"),
        &[ProductDescriptor::new("a", "Acme", "https://shop.test/a")],
    )?;
    save_watch_list(&config.watch_list.dir.join("b.json"), &[])?;

    let lists = load_all(&config.watch_list.dir)?;
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].len(), 1);
    assert!(lists[1].is_empty());

    Ok(())
}

#[test]
fn test_missing_links_dir_is_a_discovery_error() -> anyhow::Result<()> {
    let root = tempdir()?;
    let config = write_config(root.path(), &[])?;

    let result = load_all(&config.watch_list.dir);
    assert!(matches!(result, Err(price_sentinel::AppError::Discovery { .. })));

    Ok(())
}
