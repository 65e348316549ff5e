use std::io::Cursor;
use std::path::{Path, PathBuf};

use thumbstack::{CompositorConfig, DisplayRect, ThumbnailCompositor, drop_candidate, load_sources};

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

fn write_png(path: &Path, w: u32, h: u32, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

#[test]
fn load_keeps_order_and_skips_bad_files() {
    let tmp = temp_dir("load_order");
    std::fs::create_dir_all(&tmp).unwrap();

    let a = tmp.join("a.png");
    let b = tmp.join("b.png");
    let broken = tmp.join("broken.png");
    write_png(&a, 4, 2, [1, 0, 0, 255]);
    write_png(&b, 2, 4, [2, 0, 0, 255]);
    std::fs::write(&broken, b"definitely not a png").unwrap();

    let loaded = load_sources(&[a.clone(), broken, tmp.join("missing.png"), b.clone()]);
    assert_eq!(loaded.len(), 2);
    assert_eq!((loaded[0].width(), loaded[0].height()), (4, 2));
    assert_eq!((loaded[1].width(), loaded[1].height()), (2, 4));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn compositor_renders_sources_from_disk() {
    let tmp = temp_dir("from_disk");
    std::fs::create_dir_all(&tmp).unwrap();
    let a = tmp.join("shot.png");
    write_png(&a, 30, 20, [0, 200, 0, 255]);

    let mut c = ThumbnailCompositor::new(CompositorConfig::default()).unwrap();
    c.set_display_rect(DisplayRect::new(150, 100));
    c.set_source_paths(&[&a]);
    assert_eq!(c.sources().len(), 1);
    assert_eq!(c.render().pixel(75, 50), Some([0, 200, 0, 255]));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn drop_accepts_exactly_one_supported_existing_file() {
    let tmp = temp_dir("drop");
    std::fs::create_dir_all(&tmp).unwrap();
    let png = tmp.join("shot.png");
    let mov = tmp.join("clip.MOV");
    let txt = tmp.join("notes.txt");
    write_png(&png, 1, 1, [0, 0, 0, 255]);
    std::fs::write(&mov, b"").unwrap();
    std::fs::write(&txt, b"").unwrap();

    assert_eq!(drop_candidate(&[png.clone()]), Some(png.clone()));
    assert_eq!(drop_candidate(&[mov.clone()]), Some(mov.clone()));
    assert_eq!(drop_candidate(&[txt.clone()]), None);
    // Two existing files are ambiguous.
    assert_eq!(drop_candidate(&[png.clone(), mov.clone()]), None);
    // Missing files do not count toward the total.
    assert_eq!(
        drop_candidate(&[png.clone(), tmp.join("gone.png")]),
        Some(png.clone())
    );

    let mut c = ThumbnailCompositor::new(CompositorConfig::default()).unwrap();
    assert_eq!(c.accept_drop(&[png.clone()]), Some(png.clone()));
    c.set_drop_enabled(false);
    assert_eq!(c.accept_drop(&[png]), None);

    std::fs::remove_dir_all(&tmp).ok();
}
