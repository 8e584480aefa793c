//! Realistic fake data generation for factories
//!
//! Every generator draws from one thread-local RNG so a single
//! [`seed_fake_data`] call makes the whole sequence reproducible. Text comes
//! from the `fake` crate's English lorem, name and internet fakers.

use std::cell::RefCell;
use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Words in a default sentence before variation
pub const SENTENCE_WORDS: usize = 6;

/// Sentences in a default paragraph before variation
pub const PARAGRAPH_SENTENCES: usize = 3;

/// Attempts before a unique generator gives up
pub const MAX_UNIQUE_ATTEMPTS: usize = 10_000;

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::from_entropy());
    static UNIQUE: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Initialize RNG with a specific seed for deterministic generation
pub fn seed_fake_data(seed: u64) {
    RNG.with(|rng| {
        *rng.borrow_mut() = StdRng::seed_from_u64(seed);
    });
}

/// Run `f` with the thread's generator
pub fn with_rng<R>(f: impl FnOnce(&mut StdRng) -> R) -> R {
    RNG.with(|rng| f(&mut rng.borrow_mut()))
}

/// Generate a random number within an inclusive range
pub fn random_range(min: i64, max: i64) -> i64 {
    with_rng(|rng| rng.gen_range(min..=max))
}

/// Generate a random boolean with optional probability
pub fn random_bool(probability: Option<f64>) -> bool {
    let prob = probability.unwrap_or(0.5).clamp(0.0, 1.0);
    with_rng(|rng| rng.gen_bool(prob))
}

/// Pick one element uniformly; `None` only for an empty slice
pub fn random_element<T: Clone>(items: &[T]) -> Option<T> {
    with_rng(|rng| items.choose(rng).cloned())
}

/// Random alphanumeric string
pub fn random_string(len: usize) -> String {
    with_rng(|rng| {
        (0..len)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect()
    })
}

/// Scale a nominal count by 60 to 140 percent, truncate, then add one
///
/// `vary_count(6)` lands in `4..=9` and `vary_count(0)` is always 1.
pub fn vary_count(nominal: usize) -> usize {
    let percent = with_rng(|rng| rng.gen_range(60..=140));
    nominal * percent / 100 + 1
}

/// `count` lorem words
pub fn fake_words(count: usize) -> Vec<String> {
    with_rng(|rng| Words(count..count + 1).fake_with_rng::<Vec<String>, _>(rng))
}

/// A sentence of roughly six words, capitalized and ending with a period
pub fn fake_sentence() -> String {
    fake_sentence_of(SENTENCE_WORDS)
}

/// A sentence of roughly `words` words
pub fn fake_sentence_of(words: usize) -> String {
    let words = fake_words(vary_count(words));
    let mut sentence = words.join(" ");

    if let Some(first) = sentence.get(..1) {
        let upper = first.to_uppercase();
        sentence.replace_range(..1, &upper);
    }
    sentence.push('.');
    sentence
}

/// A paragraph of roughly `sentences` sentences
pub fn fake_paragraph(sentences: usize) -> String {
    let count = vary_count(sentences);
    (0..count)
        .map(|_| fake_sentence())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate a fake full name
pub fn fake_name() -> String {
    with_rng(|rng| Name().fake_with_rng::<String, _>(rng))
}

/// Generate an email address on a reserved example domain
pub fn fake_safe_email() -> String {
    with_rng(|rng| SafeEmail().fake_with_rng::<String, _>(rng))
}

/// Email address not returned before on this thread since the last [`reset_unique`]
pub fn unique_safe_email() -> Option<String> {
    unique(fake_safe_email)
}

/// Retry `generate` until it yields an unseen value
pub fn unique(mut generate: impl FnMut() -> String) -> Option<String> {
    for _ in 0..MAX_UNIQUE_ATTEMPTS {
        let candidate = generate();
        let fresh = UNIQUE.with(|seen| seen.borrow_mut().insert(candidate.clone()));
        if fresh {
            return Some(candidate);
        }
    }
    None
}

/// Forget values handed out by the unique generators
pub fn reset_unique() {
    UNIQUE.with(|seen| seen.borrow_mut().clear());
}

/// Generate a bcrypt-shaped hash (NOT for actual use)
pub fn fake_password_hash() -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789./";

    let body: String = with_rng(|rng| {
        (0..53)
            .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
            .collect()
    });
    format!("$2y$10${}", body)
}

/// Generate a datetime within the last year
pub fn fake_datetime() -> DateTime<Utc> {
    let minutes_ago = random_range(0, 365 * 24 * 60);
    Utc::now() - Duration::minutes(minutes_ago)
}
