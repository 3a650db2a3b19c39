use brute_keyspace::Alphabet;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Generates secrets of `length` drawn uniformly from `alphabet`.
/// Uses a fixed seed for reproducible benchmark results.
pub fn generate_secrets(alphabet: &Alphabet, length: usize, count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count).map(|_| alphabet.random_string(&mut rng, length)).collect()
}
