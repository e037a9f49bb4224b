//! PNG export and clipboard copy of the committed coverings

use std::path::Path;

use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::panel::Panel;

/// Saves the panel as it currently looks, drag overlay included.
pub fn save_png(panel: &Panel, path: &Path) -> Result<()> {
    panel
        .snapshot()
        .to_image()
        .save(path)
        .with_context(|| format!("saving {}", path.display()))?;
    log::info!("exported panel to {}", path.display());
    Ok(())
}

/// Puts one `rows a-b, cols c-d` line per covering on the clipboard.
pub fn copy_coverings(panel: &Panel) -> Result<()> {
    let text = panel.coverings().describe();
    let mut clipboard = Clipboard::new().context("opening clipboard")?;
    clipboard.set_text(text).context("writing clipboard")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::geometry::Point;
    use crate::panel::PointerEvent;

    #[test]
    fn test_save_png_writes_snapshot() {
        let mut panel = Panel::new(GridConfig {
            cells: 2,
            surface_width: 26,
            surface_height: 26,
            ..GridConfig::default()
        })
        .unwrap();
        panel.handle(PointerEvent::Press(Point::new(1.0, 1.0)));
        panel.handle(PointerEvent::Release(Point::new(1.0, 1.0)));

        let path = std::env::temp_dir().join(format!("cubegrid-export-{}.png", std::process::id()));
        save_png(&panel, &path).unwrap();
        let img = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).ok();

        assert_eq!(img.dimensions(), (26, 26));
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 0, 255]);
        assert_eq!(img.get_pixel(20, 20).0, [255, 255, 255, 255]);
    }
}
