//! Value synthesis for derived and auto-generated parameters.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::Value;

const ADJECTIVES: &[&str] = &[
    "amber", "bold", "brisk", "calm", "clever", "crisp", "daring", "eager", "fancy", "gentle",
    "golden", "happy", "jolly", "keen", "lively", "lucky", "mellow", "nimble", "quiet", "rapid",
    "shiny", "steady", "swift", "tidy", "vivid", "witty",
];

const NOUNS: &[&str] = &[
    "badger", "beacon", "canyon", "comet", "falcon", "forest", "glacier", "harbor", "island",
    "lagoon", "meadow", "nebula", "otter", "panda", "pepper", "quartz", "raven", "river",
    "summit", "tiger", "tundra", "walrus", "willow", "zephyr",
];

/// Longest name CodeBuild accepts.
pub const CODEBUILD_NAME_MAX: usize = 255;

/// A random human-readable project name: `<adjective>-<noun>-<nnnn>`.
pub fn generate_project_name(rng: &mut dyn RngCore) -> Value {
    let adjective = ADJECTIVES.choose(&mut *rng).copied().unwrap_or("brisk");
    let noun = NOUNS.choose(&mut *rng).copied().unwrap_or("otter");
    let number: u16 = rng.random_range(1000..10000);
    Value::String(format!("{}-{}-{}", adjective, noun, number))
}

/// Restrict a name to CodeBuild's `[A-Za-z0-9_-]`, starting alphanumeric.
pub fn sanitize_codebuild_name(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    replaced
        .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
        .chars()
        .take(CODEBUILD_NAME_MAX)
        .collect()
}

/// `<project>-<framework>-build`, sanitized.
pub fn codebuild_project_name(project: &str, framework: &str) -> String {
    sanitize_codebuild_name(&format!("{}-{}-build", project, framework))
}
