use std::path::Path;

use crate::config::BgsafeConfig;
use crate::error::Result;

/// Write a default `.bgsafe/config.yml` under `project_root`.
pub fn run_init(project_root: &Path) -> Result<()> {
    let path = BgsafeConfig::project_path(project_root);
    if path.exists() {
        eprintln!("bgsafe: {} already exists", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, BgsafeConfig::default().to_yaml()?)?;
    eprintln!("bgsafe: initialized .bgsafe/");
    Ok(())
}
