//! Asset path utilities
//!
//! Maps sm64-port texture pack entry names onto the `alt/` asset tree the
//! runtime loads replacement textures from.

use std::path::{Component, Path};

/// Texture format markers sm64-port packs embed in file names
pub const FORMAT_MARKERS: [&str; 9] = [
    ".rgba32", ".rgba16", ".ia16", ".ia8", ".ia4", ".i4", ".i8", ".ci8", ".ci4",
];

/// Rewrite a texture pack entry path to its runtime asset path.
///
/// Returns `None` for entries the runtime has no use for (pre-rendered
/// skyboxes under `textures/skyboxes`).
pub fn transform_asset_path(path: &str) -> Option<String> {
    let path = path.replace('\\', "/");
    if path.contains("textures/skyboxes") {
        return None;
    }

    let path = match path.strip_prefix("gfx/") {
        Some(rest) => format!("alt/{rest}"),
        None => path,
    };

    let path = rewrite_skybox_tiles(&path);

    let (dir, file) = match path.rfind('/') {
        Some(pos) => path.split_at(pos + 1),
        None => ("", path.as_str()),
    };

    let mut file = file.to_string();
    for marker in FORMAT_MARKERS {
        if let Some(pos) = file.find(marker) {
            file.replace_range(pos..pos + marker.len(), "");
        }
    }

    Some(format!("{dir}{file}"))
}

/// `.../skybox_tiles/<world>/...` becomes `.../skyboxes/<world>/...`
fn rewrite_skybox_tiles(path: &str) -> String {
    path.split('/')
        .map(|segment| if segment == "skybox_tiles" { "skyboxes" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

/// File name to export a container record under.
///
/// Record names come from untrusted input, so only the last normal path
/// component is kept; `..`, roots and drive prefixes are discarded. Returns
/// `None` when nothing usable is left.
#[must_use]
pub fn export_file_name(name: &str) -> Option<String> {
    let name = name.replace('\\', "/");
    Path::new(&name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .next_back()
        .map(|part| part.to_string_lossy().into_owned())
}

/// Strip a trailing `.png` (case-insensitive) from an asset path
#[must_use]
pub fn strip_png_extension(path: &str) -> &str {
    let len = path.len();
    if len >= 4 && path.is_char_boundary(len - 4) && path[len - 4..].eq_ignore_ascii_case(".png") {
        &path[..len - 4]
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gfx_becomes_alt_and_marker_is_stripped() {
        assert_eq!(
            transform_asset_path("gfx/foo.rgba32.png").as_deref(),
            Some("alt/foo.png")
        );
        assert_eq!(
            transform_asset_path("gfx/actors/mario/mario_eyes_center.rgba16.png").as_deref(),
            Some("alt/actors/mario/mario_eyes_center.png")
        );
    }

    #[test]
    fn test_each_marker() {
        for (input, expected) in [
            ("gfx/a.ia16.png", "alt/a.png"),
            ("gfx/a.ia8.png", "alt/a.png"),
            ("gfx/a.ia4.png", "alt/a.png"),
            ("gfx/a.i8.png", "alt/a.png"),
            ("gfx/a.i4.png", "alt/a.png"),
            ("gfx/a.ci8.png", "alt/a.png"),
            ("gfx/a.ci4.png", "alt/a.png"),
        ] {
            assert_eq!(transform_asset_path(input).as_deref(), Some(expected), "{input}");
        }
    }

    #[test]
    fn test_markers_only_touch_file_name() {
        assert_eq!(
            transform_asset_path("gfx/levels.i8/x.rgba16.png").as_deref(),
            Some("alt/levels.i8/x.png")
        );
    }

    #[test]
    fn test_skyboxes_are_dropped() {
        assert_eq!(transform_asset_path("gfx/textures/skyboxes/water.png"), None);
    }

    #[test]
    fn test_skybox_tiles_are_rewritten() {
        assert_eq!(
            transform_asset_path("gfx/textures/skybox_tiles/water/0.rgba16.png").as_deref(),
            Some("alt/textures/skyboxes/water/0.png")
        );
    }

    #[test]
    fn test_non_gfx_paths_pass_through() {
        assert_eq!(
            transform_asset_path("sound/readme.txt").as_deref(),
            Some("sound/readme.txt")
        );
    }

    #[test]
    fn test_export_file_name_stays_in_directory() {
        assert_eq!(export_file_name("mario_eye").as_deref(), Some("mario_eye"));
        assert_eq!(export_file_name("../../etc/cron").as_deref(), Some("cron"));
        assert_eq!(export_file_name("/abs/path/tex").as_deref(), Some("tex"));
        assert_eq!(export_file_name("..\\..\\win").as_deref(), Some("win"));
        assert_eq!(export_file_name("a/./b/..").as_deref(), Some("b"));
        assert_eq!(export_file_name(".."), None);
        assert_eq!(export_file_name("/"), None);
        assert_eq!(export_file_name(""), None);
    }

    #[test]
    fn test_strip_png_extension() {
        assert_eq!(strip_png_extension("alt/foo.png"), "alt/foo");
        assert_eq!(strip_png_extension("alt/FOO.PNG"), "alt/FOO");
        assert_eq!(strip_png_extension("alt/foo.txt"), "alt/foo.txt");
    }
}
