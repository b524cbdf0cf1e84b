//! Setup / punchline vocabulary
//!
//! Enemies carry a setup word; destroying one reveals the matching punchline.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Built-in setups and their punchlines
const DEFAULT_JOKES: [(&str, &str); 8] = [
    ("Bofa", "Bofa deez nuts!"),
    ("Candice", "Candice nuts fit in your mouth?"),
    ("Joe", "Joe Mama!"),
    ("Sugma", "Sugma balls!"),
    ("Dee", "Deez nuts!"),
    ("Wendy", "Wendy's nuts slap your face?"),
    ("Updog", "What's up, dog?"),
    ("Sawcon", "Sawcon deez nuts!"),
];

/// One setup and its punchline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

/// Ordered setup -> punchline lookup
///
/// Kept as a vector so random picks are reproducible for a given seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchlineBook {
    jokes: Vec<Joke>,
}

impl Default for PunchlineBook {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_JOKES)
    }
}

impl PunchlineBook {
    /// Build from `(setup, punchline)` pairs. Later duplicates replace earlier ones.
    pub fn from_pairs<I, S, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<String>,
    {
        let mut book = Self { jokes: Vec::new() };
        for (setup, punchline) in pairs {
            book.insert(setup, punchline);
        }
        book
    }

    /// Parse a JSON list of `{ "setup": .., "punchline": .. }` objects
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let jokes: Vec<Joke> = serde_json::from_str(json)?;
        Ok(Self::from_pairs(jokes.into_iter().map(|j| (j.setup, j.punchline))))
    }

    pub fn insert(&mut self, setup: impl Into<String>, punchline: impl Into<String>) {
        let setup = setup.into();
        let punchline = punchline.into();
        match self.jokes.iter_mut().find(|j| j.setup == setup) {
            Some(joke) => joke.punchline = punchline,
            None => self.jokes.push(Joke { setup, punchline }),
        }
    }

    pub fn punchline(&self, setup: &str) -> Option<&str> {
        self.jokes
            .iter()
            .find(|j| j.setup == setup)
            .map(|j| j.punchline.as_str())
    }

    pub fn setups(&self) -> impl Iterator<Item = &str> {
        self.jokes.iter().map(|j| j.setup.as_str())
    }

    /// Uniformly pick a setup; `None` for an empty book
    pub fn random_setup<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.jokes.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.jokes.len());
        Some(self.jokes[index].setup.as_str())
    }

    pub fn len(&self) -> usize {
        self.jokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jokes.is_empty()
    }
}
