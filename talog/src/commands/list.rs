// talog/src/commands/list.rs

use std::path::Path;

pub fn execute(project_dir: &Path) -> miette::Result<()> {
    let config = super::load_configuration(project_dir)?;
    for name in config.catalog().names() {
        println!("{name}");
    }
    Ok(())
}
