// Directory scanner: builds the ordered image list the session pages through.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Extensions the viewer recognises, matched case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Every regular file directly inside `dir` with a recognised extension, in
/// directory listing order. An empty result is an error: there is nothing for
/// the viewer to do.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }

    if files.is_empty() {
        bail!("No image files found in {}", dir.display());
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("quickcrop-scan-{tag}-{}", std::process::id()));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            ScratchDir(dir)
        }

        fn touch(&self, name: &str) {
            fs::write(self.0.join(name), b"x").unwrap();
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn keeps_only_recognised_extensions() {
        let dir = ScratchDir::new("filter");
        dir.touch("a.png");
        dir.touch("b.JPG");
        dir.touch("c.jpeg");
        dir.touch("d.gif");
        dir.touch("e.bmp");
        dir.touch("notes.txt");
        dir.touch("noext");
        fs::create_dir(dir.0.join("sub.png")).unwrap();

        let mut names: Vec<String> = list_images(&dir.0)
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["a.png", "b.JPG", "c.jpeg", "d.gif", "e.bmp"]);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = ScratchDir::new("empty");
        dir.touch("readme.md");
        assert!(list_images(&dir.0).is_err());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let missing = std::env::temp_dir().join("quickcrop-scan-does-not-exist");
        assert!(list_images(&missing).is_err());
    }
}
