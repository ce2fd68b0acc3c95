use super::*;
use crate::config::{LanguagesConfig, LlmConfig};
use crate::llm::RetryPolicy;
use crate::services::testing::{MockChat, MockImage};
use std::sync::atomic::Ordering;

const CONTENT: &str = "example sentences in";
const WORD_TRANSLATION: &str = "single word translations";
const TEXT_TRANSLATION: &str = "Translate the following text";

fn scripted() -> MockChat {
    MockChat::new(|req| {
        let s = &req.system;
        let text = if s.contains(CONTENT) {
            "Der Hund bellt."
        } else if s.contains(WORD_TRANSLATION) {
            "собака"
        } else if s.contains(TEXT_TRANSLATION) {
            "Собака лает."
        } else if s.contains("\"***\"") {
            "Der *** bellt."
        } else if s.contains("provide German words") {
            "Hund"
        } else if s.contains("plural form") {
            "Hunde"
        } else if s.contains("part of speech") {
            "noun"
        } else {
            "der Hund"
        };
        Ok(text.to_string())
    })
}

struct Harness {
    _tmp: tempfile::TempDir,
    output_csv: PathBuf,
    images_dir: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let output_csv = tmp.path().join("out/cards.csv");
        let images_dir = tmp.path().join("out/images/2026-10-18");
        Self {
            _tmp: tmp,
            output_csv,
            images_dir,
        }
    }

    fn pipeline(
        &self,
        chat: Arc<MockChat>,
        image: Option<Arc<MockImage>>,
        mode: ErrorMode,
    ) -> Pipeline {
        let completer = Completer::new(chat, &LlmConfig::default());
        let languages = LanguagesConfig::default();
        let images = image.map(|provider| {
            ImageGenerator::new(
                provider,
                ImageOptions {
                    dir: self.images_dir.clone(),
                    size: "1024x1024".to_string(),
                    quality: "standard".to_string(),
                    language: "German".to_string(),
                    style: String::new(),
                    policy: RetryPolicy::default(),
                },
            )
        });
        let services = Services {
            content: ContentGenerator::new(completer.clone(), &languages.source),
            translator: Translator::new(completer.clone(), &languages),
            enhancer: Enhancer::new(completer.clone(), &languages),
            images,
            completer,
        };
        Pipeline::new(services, mode, &self.output_csv)
    }
}

fn count(mock: &MockChat, needle: &str) -> usize {
    mock.systems().iter().filter(|s| s.contains(needle)).count()
}

fn full_entry(name: &str) -> VocabEntry {
    VocabEntry {
        name: name.to_string(),
        translation: "собака".to_string(),
        example_sentence: format!("Der {name} bellt."),
        example_sentence_translation: "Собака лает.".to_string(),
    }
}

#[tokio::test]
async fn populated_rows_round_trip_without_text_generation() {
    let h = Harness::new();
    let mock = Arc::new(scripted());
    let pipeline = h.pipeline(mock.clone(), None, ErrorMode::Strict);
    let entries = vec![full_entry("hund"), full_entry("katze")];

    let (cards, report) = pipeline.run(&entries, |_, _| {}).await.unwrap();
    vocab::write_cards(&h.output_csv, &cards).unwrap();
    let read_back = vocab::read_cards(&h.output_csv).unwrap();

    assert_eq!(read_back.len(), 2);
    assert_eq!(read_back, cards);
    for (card, entry) in read_back.iter().zip(&entries) {
        assert_eq!(card.translation, entry.translation);
        assert_eq!(card.example_sentence, entry.example_sentence);
        assert_eq!(card.example_sentence_translation, entry.example_sentence_translation);
    }
    assert_eq!(report.processed, 2);
    assert_eq!(report.tokens, 7 * mock.calls.load(Ordering::SeqCst) as u64);
    assert_eq!(count(&mock, CONTENT), 0);
    assert_eq!(count(&mock, WORD_TRANSLATION), 0);
    assert_eq!(count(&mock, TEXT_TRANSLATION), 0);
}

#[tokio::test]
async fn missing_translation_gets_exactly_one_translation_call() {
    let h = Harness::new();
    let mock = Arc::new(scripted());
    let pipeline = h.pipeline(mock.clone(), None, ErrorMode::Strict);
    let entry = VocabEntry {
        translation: String::new(),
        ..full_entry("hund")
    };

    let row = pipeline.process_entry(&entry).await.unwrap();

    assert_eq!(row.card.translation, "собака");
    assert_eq!(count(&mock, WORD_TRANSLATION), 1);
    assert_eq!(count(&mock, CONTENT), 0);
    assert_eq!(count(&mock, TEXT_TRANSLATION), 0);
}

#[tokio::test]
async fn missing_sentence_is_generated_before_it_is_translated() {
    let h = Harness::new();
    let mock = Arc::new(scripted());
    let pipeline = h.pipeline(mock.clone(), None, ErrorMode::Strict);

    let row = pipeline
        .process_entry(&VocabEntry::new("Hund"))
        .await
        .unwrap();

    let systems = mock.systems();
    let content_at = systems.iter().position(|s| s.contains(CONTENT)).unwrap();
    let text_at = systems
        .iter()
        .position(|s| s.contains(TEXT_TRANSLATION))
        .unwrap();
    assert!(content_at < text_at);

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests[content_at].user, "Word: hund");
    assert_eq!(requests[text_at].user, "Der Hund bellt.");
    drop(requests);

    assert_eq!(
        row.card,
        CardRecord {
            articled_word: "der Hund".to_string(),
            translation: "собака".to_string(),
            example_sentence: "Der Hund bellt.".to_string(),
            cloze_sentence: "Der *** bellt.".to_string(),
            example_sentence_translation: "Собака лает.".to_string(),
            alternative_words: "Hund".to_string(),
            inflected_forms: "Hunde".to_string(),
            part_of_speech: "noun".to_string(),
            image_path: String::new(),
        }
    );
}

#[tokio::test]
async fn lenient_failures_fall_back_and_run_continues() {
    let h = Harness::new();
    let mock = Arc::new(MockChat::failing());
    let pipeline = h.pipeline(mock, Some(Arc::new(MockImage::failing())), ErrorMode::Lenient);
    let entries = vec![VocabEntry::new("hund"), VocabEntry::new("katze")];

    let (cards, report) = pipeline.run(&entries, |_, _| {}).await.unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(report.processed, 2);
    assert_eq!(report.tokens, 0);
    assert_eq!(report.images, 0);
    assert!(report.fallbacks > 0);
    let card = &cards[0];
    assert_eq!(card.articled_word, "hund");
    assert_eq!(card.translation, "");
    assert_eq!(card.example_sentence, "");
    assert_eq!(card.part_of_speech, "");
    assert_eq!(card.image_path, "");
}

#[tokio::test]
async fn strict_failure_aborts_the_run() {
    let h = Harness::new();
    let mock = Arc::new(MockChat::new(|req| {
        if req.system.contains("part of speech") {
            Err(ServiceError::Llm {
                message: "HTTP 500".to_string(),
                status_code: Some(500),
            })
        } else {
            Ok("ok".to_string())
        }
    }));
    let pipeline = h.pipeline(mock, None, ErrorMode::Strict);
    let entries = vec![full_entry("hund"), full_entry("katze")];
    let mut seen = Vec::new();

    let result = pipeline
        .run(&entries, |idx, _| seen.push(idx))
        .await;

    assert!(matches!(result, Err(AnkifyError::Service(_))));
    assert_eq!(seen, vec![0]);
}

#[tokio::test]
async fn image_path_is_relative_to_output_directory() {
    let h = Harness::new();
    let mock = Arc::new(scripted());
    let pipeline = h.pipeline(mock, Some(Arc::new(MockImage::ok())), ErrorMode::Strict);

    let row = pipeline.process_entry(&full_entry("hund")).await.unwrap();

    let image_file = row.image_file.unwrap();
    assert!(image_file.exists());
    let stored = PathBuf::from(&row.card.image_path);
    assert!(stored.is_relative());
    assert!(stored.starts_with("images/2026-10-18"));
    assert_eq!(h.output_csv.parent().unwrap().join(&stored), image_file);
}
