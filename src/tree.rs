//! Requirement tree for `emu-recipe requires`.
//!
//! ```text
//! emu v1.0.0
//! ├── fmt/10.2.1 (transitive headers)
//! └── open62541/1.3.9 (transitive headers)
//! ```

use colored::*;

use crate::descriptor::PackageDescriptor;

pub fn render(descriptor: &PackageDescriptor) -> Vec<String> {
    let id = descriptor.identity();
    let mut lines = vec![format!("{} v{}", id.name.bold().cyan(), id.version)];

    let requirements = descriptor.requirements().resolve();
    if requirements.is_empty() {
        lines.push("└── (no dependencies)".to_string());
        return lines;
    }

    let count = requirements.len();
    for (i, req) in requirements.iter().enumerate() {
        let prefix = if i == count - 1 { "└──" } else { "├──" };
        let visibility = if req.transitive_headers {
            "transitive headers".green()
        } else {
            "private headers".dimmed()
        };
        lines.push(format!(
            "{} {}/{} ({})",
            prefix,
            req.name.bold(),
            req.version,
            visibility
        ));
    }
    lines
}

pub fn print_tree(descriptor: &PackageDescriptor) {
    for line in render(descriptor) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::DependencyResolver;
    use crate::descriptor::PackageIdentity;

    fn identity() -> PackageIdentity {
        PackageIdentity {
            name: "demo".into(),
            version: "0.1.0".into(),
            license: "MIT".into(),
            author: "nobody".into(),
            url: "https://example.invalid".into(),
            description: "demo".into(),
        }
    }

    #[test]
    fn test_emu_tree() {
        colored::control::set_override(false);
        let lines = render(&PackageDescriptor::emu());
        assert_eq!(
            lines,
            [
                "emu v1.0.0",
                "├── fmt/10.2.1 (transitive headers)",
                "└── open62541/1.3.9 (transitive headers)",
            ]
        );
    }

    #[test]
    fn test_tree_without_dependencies() {
        colored::control::set_override(false);
        let d = PackageDescriptor::new(identity(), DependencyResolver::new());
        assert_eq!(render(&d)[1], "└── (no dependencies)");
    }

    #[test]
    fn test_private_headers_label() {
        colored::control::set_override(false);
        let mut deps = DependencyResolver::new();
        deps.declare("zlib", "1.3.1", false);
        let d = PackageDescriptor::new(identity(), deps);
        assert!(render(&d)[1].ends_with("(private headers)"));
    }
}
