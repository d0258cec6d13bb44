use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let project_name = match name {
        Some(n) => n.to_string(),
        None => root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string()),
    };

    println!("Initializing TRD workspace in: {}", root.display());
    let fresh = trd_core::workspace::init(root, &project_name)
        .with_context(|| format!("failed to initialize {}", root.display()))?;

    if fresh {
        println!("  created: .trd/config.yaml");
    } else {
        println!("  exists:  .trd/config.yaml");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_config() {
        let dir = TempDir::new().unwrap();
        run(dir.path(), Some("demo")).unwrap();
        assert!(dir.path().join(".trd/config.yaml").exists());
    }

    #[test]
    fn init_twice_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        run(dir.path(), Some("first")).unwrap();
        run(dir.path(), Some("second")).unwrap();
        let config = trd_core::config::Config::load(dir.path()).unwrap();
        assert_eq!(config.project.name, "first");
    }
}
