//! Listing installed extensions

use std::collections::HashSet;

use extman_core::InstalledExtension;

/// Render the installed set as display lines
///
/// One identifier per line (with version when `show_versions` is set),
/// deduplicated by identifier, sorted by identifier. The category
/// filter compares case-insensitively.
pub fn list_installed(
    installed: &[InstalledExtension],
    category: Option<&str>,
    show_versions: bool,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = installed
        .iter()
        .filter(|e| match category {
            Some(category) => e
                .manifest
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category)),
            None => true,
        })
        .filter(|e| seen.insert(e.identifier().normalized()))
        .map(|e| {
            if show_versions {
                format!("{}@{}", e.identifier(), e.manifest.version)
            } else {
                e.identifier().to_string()
            }
        })
        .collect();

    lines.sort_by_key(|line| line.to_lowercase());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use extman_core::{ExtensionKind, ExtensionManifest};
    use semver::Version;
    use url::Url;

    fn installed(id: &str, version: &str, categories: &[&str]) -> InstalledExtension {
        let (publisher, name) = id.split_once('.').unwrap();
        InstalledExtension {
            manifest: ExtensionManifest {
                name: name.to_string(),
                publisher: publisher.to_string(),
                version: Version::parse(version).unwrap(),
                display_name: None,
                description: None,
                categories: categories.iter().map(|c| c.to_string()).collect(),
            },
            kind: ExtensionKind::User,
            builtin: false,
            machine_scoped: false,
            location: Url::parse("file:///extensions/test").unwrap(),
        }
    }

    #[test]
    fn lists_sorted_and_deduplicated() {
        let extensions = vec![
            installed("zeta.tool", "1.0.0", &[]),
            installed("acme.tool", "1.0.0", &[]),
            installed("Acme.Tool", "2.0.0", &[]),
        ];

        let lines = list_installed(&extensions, None, false);
        assert_eq!(lines, vec!["acme.tool", "zeta.tool"]);
    }

    #[test]
    fn versions_are_shown_on_request() {
        let extensions = vec![installed("acme.tool", "1.2.3", &[])];
        let lines = list_installed(&extensions, None, true);
        assert_eq!(lines, vec!["acme.tool@1.2.3"]);
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let extensions = vec![
            installed("acme.theme", "1.0.0", &["Themes"]),
            installed("acme.tool", "1.0.0", &["Other"]),
        ];

        let lines = list_installed(&extensions, Some("themes"), false);
        assert_eq!(lines, vec!["acme.theme"]);
    }
}
