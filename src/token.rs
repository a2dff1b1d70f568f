use rand::distributions::Alphanumeric;
use rand::Rng;

/// Source of anonymized base names. Tests substitute a deterministic source.
pub trait TokenSource {
    fn token(&mut self) -> String;
}

pub struct RandomTokens {
    length: usize,
}

impl RandomTokens {
    pub fn new(length: usize) -> Self {
        RandomTokens { length }
    }
}

impl TokenSource for RandomTokens {
    fn token(&mut self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}
