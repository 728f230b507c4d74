#[allow(dead_code)]
mod common;

use tempfile::TempDir;

use dartvision_core::io::image_io::{load_frame, save_encoded};
use dartvision_core::io::source::{FrameSource, ImageSequenceSource};
use dartvision_core::preprocess::prepare;

use common::{synthetic_frame, test_config};

fn write_sequence(dir: &TempDir, names: &[&str]) {
    for (i, name) in names.iter().enumerate() {
        let frame = synthetic_frame(40 + i as u32, 30);
        frame.image.save(dir.path().join(name)).unwrap();
    }
}

#[test]
fn test_sequence_reads_in_lexical_order() {
    let dir = TempDir::new().unwrap();
    write_sequence(&dir, &["b.png", "a.png", "c.png"]);
    std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

    let mut source = ImageSequenceSource::open(dir.path(), false).unwrap();
    assert_eq!(source.len(), 3);

    // a.png was written second (width 41), b.png first (width 40).
    let widths: Vec<u32> = (0..3)
        .map(|_| source.acquire().unwrap().unwrap().width())
        .collect();
    assert_eq!(widths, vec![41, 40, 42]);
    assert!(source.acquire().unwrap().is_none());
}

#[test]
fn test_sequence_loops_and_numbers_frames() {
    let dir = TempDir::new().unwrap();
    write_sequence(&dir, &["0001.png", "0002.png"]);

    let mut source = ImageSequenceSource::open(dir.path(), true).unwrap();
    let indices: Vec<usize> = (0..5)
        .map(|_| source.acquire().unwrap().unwrap().metadata.index)
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    let mut source = ImageSequenceSource::open(dir.path(), true).unwrap();
    assert!(source.is_empty());
    assert!(source.is_exhausted());
    assert!(source.acquire().unwrap().is_none());
}

#[test]
fn test_single_pass_exhausts_even_on_corrupt_tail() {
    let dir = TempDir::new().unwrap();
    write_sequence(&dir, &["a.png"]);
    std::fs::write(dir.path().join("b.png"), b"not a png").unwrap();

    let mut source = ImageSequenceSource::open(dir.path(), false).unwrap();
    assert!(!source.is_exhausted());
    assert!(source.acquire().unwrap().is_some());
    assert!(!source.is_exhausted());
    assert!(source.acquire().is_err());
    assert!(source.is_exhausted());
}

#[test]
fn test_looping_sequence_never_exhausts() {
    let dir = TempDir::new().unwrap();
    write_sequence(&dir, &["a.png"]);

    let mut source = ImageSequenceSource::open(dir.path(), true).unwrap();
    for _ in 0..3 {
        assert!(source.acquire().unwrap().is_some());
        assert!(!source.is_exhausted());
    }
}

#[test]
fn test_save_encoded_roundtrip() {
    let dir = TempDir::new().unwrap();
    let prepared = prepare(&synthetic_frame(80, 60), &test_config().preprocess).unwrap();
    let path = dir.path().join("enhanced.jpg");
    save_encoded(&prepared.enhanced, &path).unwrap();

    let loaded = load_frame(&path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (64, 48));
}
