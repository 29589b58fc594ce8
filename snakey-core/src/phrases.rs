//! Things the pet says.

use rand::seq::SliceRandom;
use rand::Rng;

/// Lines spoken at random while the pet wanders around.
pub const PHRASES: &[&str] = &[
    "nice computer you got here! can i have it?",
    "haha im digging into your files!",
    "An SSD? let me see!",
    "La la la la la",
    "haha im a little snakey guy",
];

/// Jokes for the "Tell me a joke!" menu entry.
pub const JOKES: &[&str] = &[
    "Why don't skeletons fight each other? They don't have the guts.",
    "Why can't your nose be 12 inches long? Because then it would be a foot!",
    "I'm reading a book on anti-gravity. It's impossible to put down!",
];

/// First words on a fresh install.
pub const INTRODUCTION: &str = "Thanks for waking me up! My name's Snakey, and how about yours?";

/// Name used in the greeting when the user never gave one.
const DEFAULT_NAME: &str = "there";

/// Greeting for a returning user.
pub fn greeting(name: Option<&str>) -> String {
    format!(
        "Hello there, {}. It's nice to see you!",
        name.unwrap_or(DEFAULT_NAME)
    )
}

/// Reply once the user has introduced themselves.
pub fn nice_to_meet_you(name: &str) -> String {
    format!("Nice to meet you, {}!", name)
}

/// Pick a random idle phrase.
pub fn random_phrase<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PHRASES.choose(rng).copied().unwrap_or(PHRASES[0])
}

/// Pick a random joke.
pub fn random_joke<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    JOKES.choose(rng).copied().unwrap_or(JOKES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_greeting() {
        assert_eq!(
            greeting(Some("Ada")),
            "Hello there, Ada. It's nice to see you!"
        );
        assert_eq!(greeting(None), "Hello there, there. It's nice to see you!");
        assert_eq!(nice_to_meet_you("Ada"), "Nice to meet you, Ada!");
    }

    #[test]
    fn test_random_picks_come_from_lists() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(PHRASES.contains(&random_phrase(&mut rng)));
            assert!(JOKES.contains(&random_joke(&mut rng)));
        }
    }

    #[test]
    fn test_every_phrase_eventually_picked() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(random_phrase(&mut rng));
        }
        assert_eq!(seen.len(), PHRASES.len());
    }
}
