//! End-to-end runs against the real image backend and PDF writer.
//!
//! Source images are generated at test time at 1 px/mm (63×89 px for the
//! stock card size), so a 3 mm bleed is 3 px and bled images are 68×94 px.

use card_bleeder::imaging::RustBackend;
use card_bleeder::pdf::PdfWriter;
use card_bleeder::pipeline::{self, PipelineError, RunOptions, RunSummary};
use image::{Rgb, RgbImage};
use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_card(path: &Path, shade: u8) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(63, 89, |x, y| Rgb([x as u8, y as u8, shade]))
        .save(path)
        .unwrap();
}

/// `deck/A` with a back, two fronts and `quantity = 2`.
fn scenario() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let deck = tmp.path().join("deck");
    let a = deck.join("A");
    write_card(&a.join("back.png"), 0);
    write_card(&a.join("1.png"), 100);
    write_card(&a.join("2.png"), 200);
    std::fs::write(a.join("config.ini"), r#"{"quantity": 2}"#).unwrap();
    (tmp, deck)
}

fn run(root: &Path, keep_bleeds: bool) -> RunSummary {
    pipeline::run(
        root,
        &RustBackend::new(),
        &PdfWriter::new(),
        RunOptions { keep_bleeds },
    )
    .unwrap()
}

fn bleed_files(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("__bleed__"))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

/// The image object drawn on each page, in page order.
fn page_images(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages()
        .values()
        .map(|page_id| {
            doc.get_dictionary(*page_id)
                .unwrap()
                .get(b"Resources")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"XObject")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"Im0")
                .unwrap()
                .as_reference()
                .unwrap()
        })
        .collect()
}

#[test]
fn scenario_produces_one_document_with_paired_pages() {
    let (_tmp, deck) = scenario();

    let summary = run(&deck, false);

    let root = deck.canonicalize().unwrap();
    assert_eq!(summary.documents, vec![root.join("deck.pdf")]);
    assert_eq!(summary.fronts, 2);

    let doc = Document::load(root.join("deck.pdf")).unwrap();
    let images = page_images(&doc);
    assert_eq!(images.len(), 8);

    let (front1, back, front2) = (images[0], images[1], images[4]);
    assert_ne!(front1, back);
    assert_ne!(front1, front2);
    assert_eq!(
        images,
        vec![front1, back, front1, back, front2, back, front2, back]
    );
}

#[test]
fn final_cleanup_removes_bled_images() {
    let (_tmp, deck) = scenario();

    let summary = run(&deck, false);

    assert_eq!(summary.removed_after, Some(3));
    assert!(bleed_files(&deck).is_empty());
    assert!(deck.join("A/1.png").exists());
    assert!(deck.join("A/back.png").exists());
}

#[test]
fn keep_bleeds_leaves_exact_size_artifacts() {
    let (_tmp, deck) = scenario();

    run(&deck, true);

    let bled = bleed_files(&deck);
    assert_eq!(bled.len(), 3);
    for path in &bled {
        assert_eq!(image::image_dimensions(path).unwrap(), (68, 94));
    }

    // Left margin repeats the source's left column (x = 0).
    let front = image::open(deck.join("A/1__bleed__.png")).unwrap().to_rgb8();
    assert_eq!(*front.get_pixel(0, 40), Rgb([0, 37, 100]));
    assert_eq!(*front.get_pixel(3, 40), Rgb([0, 37, 100]));
}

#[test]
fn rerun_replaces_previous_output() {
    let (_tmp, deck) = scenario();
    run(&deck, true);

    let summary = run(&deck, false);

    assert_eq!(summary.removed_before, 3);
    assert_eq!(summary.documents.len(), 1);
    let doc = Document::load(&summary.documents[0]).unwrap();
    assert_eq!(doc.get_pages().len(), 8);
}

#[test]
fn output_flag_splits_documents() {
    let (_tmp, deck) = scenario();
    let promo = deck.join("promo");
    write_card(&promo.join("promo_back.png"), 50);
    write_card(&promo.join("1.png"), 150);
    std::fs::write(promo.join("config.ini"), "output = true\nquantity = 1\n").unwrap();

    let summary = run(&deck, false);

    let root = deck.canonicalize().unwrap();
    assert_eq!(
        summary.documents,
        vec![root.join("deck-promo.pdf"), root.join("deck.pdf")]
    );
    let promo_doc = Document::load(root.join("deck-promo.pdf")).unwrap();
    assert_eq!(promo_doc.get_pages().len(), 2);
    let deck_doc = Document::load(root.join("deck.pdf")).unwrap();
    assert_eq!(deck_doc.get_pages().len(), 8);
}

#[test]
fn siblings_sharing_a_backfile_leave_one_artifact() {
    let tmp = TempDir::new().unwrap();
    let deck = tmp.path().join("deck");
    let shared = tmp.path().join("art/shared.png");
    write_card(&shared, 0);
    for (name, bleed) in [("a", 1), ("b", 5)] {
        let dir = deck.join(name);
        write_card(&dir.join("1.png"), 100);
        let config = serde_json::json!({ "backfile": shared, "bleed": bleed, "quantity": 1 });
        std::fs::write(dir.join("config.ini"), config.to_string()).unwrap();
    }

    let summary = run(&deck, true);

    // b/ comes last in the walk, so its 5 mm bleed is the one on disk.
    let bled = tmp.path().join("art/shared__bleed__.png");
    assert_eq!(image::image_dimensions(&bled).unwrap(), (72, 98));
    let doc = Document::load(&summary.documents[0]).unwrap();
    assert_eq!(doc.get_pages().len(), 4);
}

#[test]
fn jpeg_cards_are_merged() {
    let tmp = TempDir::new().unwrap();
    let deck = tmp.path().join("deck");
    write_card(&deck.join("back.jpg"), 0);
    write_card(&deck.join("1.jpg"), 100);
    std::fs::write(deck.join("config.ini"), "quantity = 1").unwrap();

    let summary = run(&deck, false);

    let doc = Document::load(&summary.documents[0]).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn check_writes_nothing() {
    let (_tmp, deck) = scenario();

    let report = pipeline::check(&deck, &RustBackend::new()).unwrap();

    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].pages.len(), 8);
    assert!(bleed_files(&deck).is_empty());
    assert!(!deck.join("deck.pdf").exists());
}

#[test]
fn corrupt_front_aborts_the_run() {
    let (_tmp, deck) = scenario();
    std::fs::write(deck.join("A/3.png"), "not a png").unwrap();

    let result = pipeline::run(
        &deck,
        &RustBackend::new(),
        &PdfWriter::new(),
        RunOptions::default(),
    );
    assert!(matches!(result, Err(PipelineError::Process(_))));
}

#[test]
fn missing_root_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let result = pipeline::run(
        &tmp.path().join("nope"),
        &RustBackend::new(),
        &PdfWriter::new(),
        RunOptions::default(),
    );
    assert!(matches!(result, Err(PipelineError::RootNotFound(_))));
}
