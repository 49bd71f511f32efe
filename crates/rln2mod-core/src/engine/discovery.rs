use super::config::{DiscoveryConfig, DiscoveryPolicy};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Lists the particle tables directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched. Symlinks to files count as files. Entries whose
/// names are not valid UTF-8, or that cannot be inspected, are skipped with a log line.
///
/// # Errors
///
/// Returns the walker's error when `dir` itself cannot be read.
pub fn discover_tables(
    dir: &Path,
    config: &DiscoveryConfig,
) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut candidates: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e),
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => candidates.push((name.to_string(), entry.into_path())),
            None => debug!("Skipping non-UTF-8 file name {:?}.", entry.file_name()),
        }
    }

    let suffix_matches = select(&candidates, &config.particle_suffix);
    info!(
        "Found {} file(s) matching '*{}' in {:?}.",
        suffix_matches.len(),
        config.particle_suffix,
        dir
    );

    if !suffix_matches.is_empty() || config.policy == DiscoveryPolicy::Strict {
        return Ok(suffix_matches);
    }

    let generic = format!(".{}", config.table_extension);
    let fallback_matches = select(&candidates, &generic);
    info!(
        "Falling back to '*{}': found {} file(s).",
        generic,
        fallback_matches.len()
    );
    Ok(fallback_matches)
}

fn select(candidates: &[(String, PathBuf)], suffix: &str) -> Vec<PathBuf> {
    candidates
        .iter()
        .filter(|(name, _)| name.ends_with(suffix))
        .map(|(_, path)| path.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            fs::write(dir.path().join(name), "data_\n").unwrap();
        }
        dir
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn config(policy: DiscoveryPolicy) -> DiscoveryConfig {
        DiscoveryConfig {
            policy,
            ..Default::default()
        }
    }

    #[test]
    fn suffix_matches_are_sorted_by_name() {
        let dir = dir_with(&[
            "b_particles.star",
            "a_particles.star",
            "optimisation_set.star",
            "notes.txt",
        ]);
        let found = discover_tables(dir.path(), &config(DiscoveryPolicy::Fallback)).unwrap();
        assert_eq!(names(&found), ["a_particles.star", "b_particles.star"]);
    }

    #[test]
    fn fallback_accepts_any_table_when_no_suffix_matches() {
        let dir = dir_with(&["tomo2.star", "tomo1.star", "readme.md"]);
        let found = discover_tables(dir.path(), &config(DiscoveryPolicy::Fallback)).unwrap();
        assert_eq!(names(&found), ["tomo1.star", "tomo2.star"]);
    }

    #[test]
    fn strict_policy_never_falls_back() {
        let dir = dir_with(&["tomo1.star"]);
        let found = discover_tables(dir.path(), &config(DiscoveryPolicy::Strict)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn subdirectories_are_not_searched() {
        let dir = dir_with(&["top_particles.star"]);
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/deep_particles.star"), "").unwrap();
        fs::create_dir(dir.path().join("dir_particles.star")).unwrap();

        let found = discover_tables(dir.path(), &config(DiscoveryPolicy::Fallback)).unwrap();
        assert_eq!(names(&found), ["top_particles.star"]);
    }

    #[test]
    fn custom_suffix_and_extension_are_honored() {
        let dir = dir_with(&["run_data.star", "run_coords.tbl"]);
        let custom = DiscoveryConfig {
            policy: DiscoveryPolicy::Fallback,
            particle_suffix: "_picks.star".into(),
            table_extension: "tbl".into(),
        };
        let found = discover_tables(dir.path(), &custom).unwrap();
        assert_eq!(names(&found), ["run_coords.tbl"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = dir_with(&[]);
        let found = discover_tables(dir.path(), &config(DiscoveryPolicy::Fallback)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = dir_with(&[]);
        let result = discover_tables(
            &dir.path().join("does-not-exist"),
            &config(DiscoveryPolicy::Fallback),
        );
        assert!(result.is_err());
    }

    #[test]
    fn discovery_is_repeatable() {
        let dir = dir_with(&["c_particles.star", "a_particles.star", "b_particles.star"]);
        let first = discover_tables(dir.path(), &config(DiscoveryPolicy::Strict)).unwrap();
        let second = discover_tables(dir.path(), &config(DiscoveryPolicy::Strict)).unwrap();
        assert_eq!(first, second);
    }
}
