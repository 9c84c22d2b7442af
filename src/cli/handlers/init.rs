use std::path::PathBuf;

use crate::cli::output::{Palette, onboarding_message};
use crate::io::root::{self, ROOT_DIR};

/// `tada init`: runs before root discovery, in the working directory or
/// the `-C` directory.
pub fn cmd_init(project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = match project_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    if let Some(parent) = dir.parent()
        && let Ok(existing) = root::discover_root(parent)
    {
        eprintln!("Note: enclosing project found at {}", existing.display());
        eprintln!("Creating new project in ./{ROOT_DIR}/");
    }

    root::init_root(&dir)?;
    let palette = Palette::for_stdout();
    let mut lines = onboarding_message().lines().map(str::to_string).collect::<Vec<_>>();
    if let Some(first) = lines.first_mut() {
        *first = palette.success(first);
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
