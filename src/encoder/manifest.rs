//! Concat manifest for ffmpeg's `concat` demuxer.
//!
//! One line per clip, in playback order:
//!
//! ```text
//! file '/abs/input_images/temp_clips/clip_00000.mp4'
//! file '/abs/input_images/temp_clips/clip_00001.mp4'
//! ```
//!
//! Paths are written with forward slashes, which ffmpeg accepts on every
//! platform. A single quote inside a path closes the quoted string, so it
//! is written as `'\''`.

use std::fs;
use std::path::{Path, PathBuf};

/// Name of the manifest file inside the clip workspace.
pub const MANIFEST_FILE_NAME: &str = "concat_list.txt";

fn quote_path(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    format!("'{}'", normalized.replace('\'', r"'\''"))
}

/// Render the manifest text for `clips`.
pub fn format_manifest(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| format!("file {}\n", quote_path(clip)))
        .collect()
}

/// Write the manifest for `clips` to `path`.
pub fn write_manifest(path: &Path, clips: &[PathBuf]) -> std::io::Result<()> {
    fs::write(path, format_manifest(clips))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_clip_in_order() {
        let clips = vec![
            PathBuf::from("/w/temp_clips/clip_00000.mp4"),
            PathBuf::from("/w/temp_clips/clip_00001.mp4"),
        ];
        assert_eq!(
            format_manifest(&clips),
            "file '/w/temp_clips/clip_00000.mp4'\nfile '/w/temp_clips/clip_00001.mp4'\n"
        );
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        let clips = vec![PathBuf::from(r"C:\photos\temp_clips\clip_00000.mp4")];
        assert_eq!(
            format_manifest(&clips),
            "file 'C:/photos/temp_clips/clip_00000.mp4'\n"
        );
    }

    #[test]
    fn single_quotes_are_escaped() {
        let clips = vec![PathBuf::from("/home/me/mum's photos/clip_00000.mp4")];
        assert_eq!(
            format_manifest(&clips),
            "file '/home/me/mum'\\''s photos/clip_00000.mp4'\n"
        );
    }

    #[test]
    fn empty_list_is_empty_manifest() {
        assert_eq!(format_manifest(&[]), "");
    }

    #[test]
    fn write_manifest_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(MANIFEST_FILE_NAME);
        write_manifest(&path, &[PathBuf::from("/a.mp4")]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "file '/a.mp4'\n");
    }
}
