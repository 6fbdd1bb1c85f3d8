use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Notebook page photos are picked up from a `notebooks/` directory next to
/// the binary, sorted for a stable menu order.
pub fn get_image_files() -> Vec<PathBuf> {
    image_files_in(Path::new("notebooks"))
}

pub fn image_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if dir.is_dir()
        && let Ok(entries) = fs::read_dir(dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(ext) = path.extension()
                && IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Read an image file and encode it as the `data:` URI the vision endpoint
/// expects inside an image content part.
pub fn encode_image_data_uri(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type_for(path),
        STANDARD.encode(bytes)
    ))
}

/// Write exported document bytes into `exports/`, creating it on demand.
/// Returns the full path for the status line.
pub fn save_export(filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    save_export_in(Path::new("exports"), filename, bytes)
}

pub fn save_export_in(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"x").unwrap();
        fs::write(dir.path().join("a.JPG"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = image_files_in(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.JPG"));
        assert!(files[1].ends_with("b.png"));
    }

    #[test]
    fn test_image_files_missing_dir() {
        assert!(image_files_in(Path::new("/nonexistent/notebooks")).is_empty());
    }

    #[test]
    fn test_mime_type_for_known_extensions() {
        assert_eq!(mime_type_for(Path::new("page.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("page.webp")), "image/webp");
        assert_eq!(mime_type_for(Path::new("page.jpeg")), "image/jpeg");
        // Unknown extensions fall back to jpeg, matching the upload handling.
        assert_eq!(mime_type_for(Path::new("page.bmp")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("page")), "image/jpeg");
    }

    #[test]
    fn test_encode_image_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        fs::write(&path, [0x89u8, 0x50, 0x4e, 0x47]).unwrap();

        let uri = encode_image_data_uri(&path).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn test_save_export_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = save_export_in(&target, "quiz.json", b"{}").unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }
}
