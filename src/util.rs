use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Segment after the first dash, upper-cased: `sys-github` -> `GITHUB`.
pub fn sys_id(id: &str) -> String {
    id.split('-')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| "UNKNOWN".to_owned())
}

/// Mixes the global visual seed with a node id so every node draws its own
/// reproducible random stream.
pub fn node_seed(seed: u64, id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    id.hash(&mut hasher);
    hasher.finish()
}

pub fn forks_estimate(stars: u32) -> u32 {
    (stars as f32 * 0.3).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sys_id_takes_second_segment() {
        assert_eq!(sys_id("sys-github"), "GITHUB");
        assert_eq!(sys_id("sys-planets-ar"), "PLANETS");
        assert_eq!(sys_id("core"), "UNKNOWN");
        assert_eq!(sys_id("x-"), "UNKNOWN");
    }

    #[test]
    fn node_seed_depends_on_both_inputs() {
        assert_eq!(node_seed(7, "a"), node_seed(7, "a"));
        assert_ne!(node_seed(7, "a"), node_seed(8, "a"));
        assert_ne!(node_seed(7, "a"), node_seed(7, "b"));
    }

    #[test]
    fn forks_are_floored() {
        assert_eq!(forks_estimate(84), 25);
        assert_eq!(forks_estimate(4), 1);
        assert_eq!(forks_estimate(0), 0);
    }
}
