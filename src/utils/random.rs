use rand::Rng;
use rand::distributions::Alphanumeric;

/// Random `[A-Za-z0-9]` string. Collision avoidance only, not a secret.
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}
