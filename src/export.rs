//! Convert a dropped review file into a thumbnail image on disk.
//!
//! Conversion is delegated to external tools: `oiiotool` when available, `ffmpeg` otherwise.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::error::{ThumbError, ThumbResult};

/// Extensions kept as-is for the exported file; anything else becomes `.jpeg`.
const KEPT_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

/// External converters used by [`export_thumbnail`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportTools {
    pub oiiotool: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
}

impl ExportTools {
    /// Resolve tools from `THUMBSTACK_OIIOTOOL` / `THUMBSTACK_FFMPEG`, falling back to `PATH`.
    pub fn from_env() -> Self {
        Self {
            oiiotool: resolve_tool("THUMBSTACK_OIIOTOOL", "oiiotool"),
            ffmpeg: resolve_tool("THUMBSTACK_FFMPEG", "ffmpeg"),
        }
    }
}

fn resolve_tool(env_key: &str, name: &str) -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(env_key).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(p));
    }
    which::which(name).ok()
}

/// Destination for a thumbnail of `src` inside `root_dir`, named with a random UUID.
pub fn thumbnail_output_path(src: &Path, root_dir: &Path) -> PathBuf {
    let ext = src
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| KEPT_EXTENSIONS.contains(e))
        .unwrap_or("jpeg");
    root_dir.join(format!("{}.{ext}", uuid::Uuid::new_v4()))
}

/// Convert `src` into a new thumbnail file under `root_dir` and return its path.
pub fn export_thumbnail(src: &Path, root_dir: &Path, tools: &ExportTools) -> ThumbResult<PathBuf> {
    std::fs::create_dir_all(root_dir)
        .with_context(|| format!("create thumbnail dir '{}'", root_dir.display()))?;

    let dst = thumbnail_output_path(src, root_dir);

    if let Some(oiiotool) = &tools.oiiotool {
        let mut cmd = Command::new(oiiotool);
        cmd.arg("-i")
            .arg(src)
            .args(["--subimage", "0", "-o"])
            .arg(&dst);
        if run_silent(cmd, "oiiotool") {
            return Ok(dst);
        }
    }

    if let Some(ffmpeg) = &tools.ffmpeg {
        let mut cmd = Command::new(ffmpeg);
        cmd.arg("-y").arg("-i").arg(src).arg(&dst);
        if run_silent(cmd, "ffmpeg") {
            return Ok(dst);
        }
    }

    Err(ThumbError::export(format!(
        "couldn't convert the source for thumbnail: '{}'",
        src.display()
    )))
}

fn run_silent(mut cmd: Command, tool: &str) -> bool {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => true,
        Ok(s) => {
            tracing::warn!(tool, code = ?s.code(), "thumbnail conversion failed");
            false
        }
        Err(err) => {
            tracing::warn!(tool, %err, "could not launch thumbnail converter");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Writing an executable while another test forks can fail the exec with ETXTBSY.
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "thumbstack_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn output_extension_is_kept_or_jpeg() {
        let root = Path::new("/out");
        let png = thumbnail_output_path(Path::new("a/b.png"), root);
        assert_eq!(png.extension().unwrap(), "png");
        assert_eq!(png.parent().unwrap(), root);

        let exr = thumbnail_output_path(Path::new("a/b.exr"), root);
        assert_eq!(exr.extension().unwrap(), "jpeg");

        let bare = thumbnail_output_path(Path::new("a/b"), root);
        assert_eq!(bare.extension().unwrap(), "jpeg");

        assert_ne!(
            thumbnail_output_path(Path::new("x.jpg"), root),
            thumbnail_output_path(Path::new("x.jpg"), root)
        );
    }

    #[test]
    fn no_tools_is_export_error_and_creates_dir() {
        let dir = temp_dir("no_tools");
        let err = export_thumbnail(Path::new("in.mov"), &dir, &ExportTools::default()).unwrap_err();
        assert!(matches!(err, ThumbError::Export(_)));
        assert!(err.to_string().contains("in.mov"));
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_binary_falls_through_to_error() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = temp_dir("missing_bin");
        let tools = ExportTools {
            oiiotool: Some(PathBuf::from("/nonexistent/oiiotool")),
            ffmpeg: Some(PathBuf::from("/nonexistent/ffmpeg")),
        };
        assert!(export_thumbnail(Path::new("in.png"), &dir, &tools).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt as _;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn falls_back_to_ffmpeg_when_oiiotool_fails() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = temp_dir("fallback");
        let bin = dir.join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let tools = ExportTools {
            oiiotool: Some(write_script(&bin, "oiiotool", "exit 1")),
            // The destination is the last argument.
            ffmpeg: Some(write_script(
                &bin,
                "ffmpeg",
                "for last; do :; done\n: > \"$last\"",
            )),
        };
        let out_dir = dir.join("thumbs");
        let out = export_thumbnail(Path::new("shot.exr"), &out_dir, &tools).unwrap();
        assert!(out.exists());
        assert_eq!(out.extension().unwrap(), "jpeg");
        assert_eq!(out.parent().unwrap(), out_dir);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn oiiotool_success_skips_ffmpeg() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = temp_dir("oiio_ok");
        let bin = dir.join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let marker = dir.join("ffmpeg_ran");
        let tools = ExportTools {
            oiiotool: Some(write_script(
                &bin,
                "oiiotool",
                "while [ $# -gt 0 ]; do if [ \"$1\" = \"-o\" ]; then shift; : > \"$1\"; fi; shift; done",
            )),
            ffmpeg: Some(write_script(
                &bin,
                "ffmpeg",
                &format!(": > \"{}\"", marker.display()),
            )),
        };
        let out = export_thumbnail(Path::new("shot.png"), &dir.join("thumbs"), &tools).unwrap();
        assert!(out.exists());
        assert!(!marker.exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
