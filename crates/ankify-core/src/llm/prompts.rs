//! Fixed prompt templates for every model call.
//!
//! Templates use `{name}` placeholders that are filled by [`render`]. The
//! language pair is a parameter everywhere so the tool is not tied to one
//! source or target language.

/// A rendered two-message chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const EXAMPLE_SENTENCE_SYSTEM: &str = "You are a language teacher creating example sentences in {language}. \
Create a concise, simple sentence that clearly demonstrates the usage of the given word. \
The sentence should focus on the word itself and be easy to understand. \
Only return the sentence, nothing else.";

const TRANSLATE_WORD_SYSTEM: &str = "You are a professional translator specializing in single word translations \
from {source} to {target}. If the word has close alternatives or synonyms in {target}, \
provide them separated by commas. Limit the number of alternatives to 5. However, if the word \
has only one clear, direct translation with no meaningful alternatives, provide only that single \
translation. Only return the translation(s), nothing else.";

const TRANSLATE_TEXT_SYSTEM: &str = "You are a professional translator. Translate the following text from \
{source} to {target}. If the text contains the word {word}, translate it using the following \
word(s): {translations}. Only return the translation, nothing else.";

const CLOZE_SYSTEM: &str = "Replace the specified {language} word in the sentence(s) with \"***\". \
If there is more than one sentence, replace it in all of them. Keep everything else exactly the \
same, including the sentence numbers (1., 2., etc.). Only return the modified sentence without \
the \"Sentence: \" prefix.";

const ALTERNATIVES_SYSTEM: &str = "Given a {target} word, provide {source} words that can be translated to \
this {target} word. Focus on the first/primary {target} translation if multiple are provided. \
Provide alternatives separated by commas. These don't need to be exact synonyms, just {source} \
words that could reasonably translate to the given {target} word.";

const INFLECTED_FORMS_SYSTEM: &str = "For the given {language} word, provide its plural form and common \
inflected forms (if applicable). For nouns, include the plural. For verbs, include key \
conjugations. For adjectives, include comparative forms if relevant. Format as a concise list \
separated by commas.";

const PART_OF_SPEECH_SYSTEM: &str = "Identify the part of speech for the given {language} word. Return only \
the part of speech (e.g., \"noun\", \"verb\", \"adjective\", \"adverb\", etc.).";

const ARTICLE_SYSTEM: &str = "If the given {language} word is a noun and {language} marks nouns with \
articles, return the word preceded by its definite singular article (for example \"der Tisch\"). \
If the word already has an article or is not a noun, return it unchanged. Only return the word, \
nothing else.";

/// Substitute `{key}` placeholders in `template`.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

pub fn example_sentence(word: &str, language: &str) -> Prompt {
    Prompt {
        system: render(EXAMPLE_SENTENCE_SYSTEM, &[("language", language)]),
        user: format!("Word: {word}"),
    }
}

pub fn translate_word(word: &str, source: &str, target: &str) -> Prompt {
    Prompt {
        system: render(
            TRANSLATE_WORD_SYSTEM,
            &[("source", source), ("target", target)],
        ),
        user: word.to_string(),
    }
}

pub fn translate_text(
    text: &str,
    source: &str,
    target: &str,
    original_word: &str,
    translations: &str,
) -> Prompt {
    Prompt {
        system: render(
            TRANSLATE_TEXT_SYSTEM,
            &[
                ("source", source),
                ("target", target),
                ("word", original_word),
                ("translations", translations),
            ],
        ),
        user: text.to_string(),
    }
}

pub fn cloze_sentence(sentence: &str, word: &str, language: &str) -> Prompt {
    Prompt {
        system: render(CLOZE_SYSTEM, &[("language", language)]),
        user: format!("Sentence: {sentence}\nWord to replace: {word}"),
    }
}

pub fn alternatives(translation: &str, source: &str, target: &str) -> Prompt {
    Prompt {
        system: render(ALTERNATIVES_SYSTEM, &[("source", source), ("target", target)]),
        user: format!("{target} word/translation: {translation}"),
    }
}

pub fn inflected_forms(word: &str, language: &str) -> Prompt {
    Prompt {
        system: render(INFLECTED_FORMS_SYSTEM, &[("language", language)]),
        user: format!("{language} word: {word}"),
    }
}

pub fn part_of_speech(word: &str, language: &str) -> Prompt {
    Prompt {
        system: render(PART_OF_SPEECH_SYSTEM, &[("language", language)]),
        user: format!("{language} word: {word}"),
    }
}

pub fn articled_word(word: &str, language: &str) -> Prompt {
    Prompt {
        system: render(ARTICLE_SYSTEM, &[("language", language)]),
        user: format!("{language} word: {word}"),
    }
}

/// Prompt for the first image of a word, with optional sentence context.
///
/// `style` (e.g. how people in the picture should look) goes last.
pub fn image(word: &str, context: &str, language: &str, style: &str) -> String {
    let mut prompt = format!(
        "I am creating Anki cards to remember {language} words. Please help me create images \
         for them. The word is: \"{word}\"."
    );
    if !context.is_empty() {
        prompt.push_str(&format!(" Context: {context}"));
    }
    prompt.push_str(
        " They should be simple colorful drawings, easy to remember and associate the word with. \
         And they SHOULD NOT (VERY IMPORTANT) have ANY WORDS in them, ESPECIALLY the keyword.",
    );
    push_style(&mut prompt, style);
    prompt
}

/// Prompt used when regenerating an image, with optional user-supplied context.
pub fn regenerated_image(
    word: &str,
    sentence: &str,
    custom_context: &str,
    language: &str,
    style: &str,
) -> String {
    let mut prompt = format!(
        "I am creating Anki cards to remember {language} words. Please help me create an image \
         for the {language} word \"{word}\"."
    );
    if !sentence.is_empty() {
        prompt.push_str(&format!(" Context from example sentence: {sentence}."));
    }
    if !custom_context.is_empty() {
        prompt.push_str(&format!(" Additional context: {custom_context}."));
    }
    prompt.push_str(
        " The image should be simple, colorful, easy to remember and associate with the word. \
         VERY IMPORTANT: The image SHOULD NOT have ANY WORDS or TEXT in it, especially not the \
         keyword itself.",
    );
    push_style(&mut prompt, style);
    prompt
}

fn push_style(prompt: &mut String, style: &str) {
    let style = style.trim();
    if !style.is_empty() {
        prompt.push(' ');
        prompt.push_str(style);
    }
}
